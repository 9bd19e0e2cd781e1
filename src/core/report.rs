use crate::core::stats::{self, PriceSummary};
use crate::domain::model::{Observation, PriceReport, ProductDetail, SourceStats};
use std::collections::BTreeMap;

/// Groups valid observations by source and builds the structured report.
///
/// Per-source statistics are computed from each source's own valid prices,
/// not from the globally filtered set, so a source's numbers always match
/// the listings shown for it.
pub fn assemble_report(
    product_name: &str,
    valid: &[Observation],
    summary: &PriceSummary,
    suggested_price: u64,
    explanation: String,
    results_breakdown: BTreeMap<String, usize>,
    currency_label: &str,
) -> PriceReport {
    let mut sources: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    let mut detailed_products: BTreeMap<String, Vec<ProductDetail>> = BTreeMap::new();

    for observation in valid {
        sources
            .entry(observation.source.clone())
            .or_default()
            .push(observation.price);
        detailed_products
            .entry(observation.source.clone())
            .or_default()
            .push(ProductDetail {
                price: observation.price,
                title: observation.title.clone(),
                url: observation.url.clone(),
                image: observation.image.clone(),
                formatted_price: format_price(observation.price, currency_label),
                synthetic: observation.synthetic,
            });
    }

    let mut source_stats = BTreeMap::new();
    for (source, prices) in &sources {
        if let Some(source_summary) = stats::summarize(prices) {
            source_stats.insert(
                source.clone(),
                SourceStats {
                    count: prices.len(),
                    min: source_summary.min,
                    max: source_summary.max,
                    avg: source_summary.avg,
                },
            );
        }
    }

    PriceReport {
        success: true,
        product_name: product_name.to_string(),
        min_price: summary.min,
        max_price: summary.max,
        avg_price: summary.avg as u64,
        final_suggested_price: suggested_price,
        explanation,
        sources,
        source_stats,
        detailed_products,
        total_results: valid.len(),
        results_breakdown,
    }
}

pub fn format_price(price: u64, currency_label: &str) -> String {
    format!("{} {}", group_thousands(price), currency_label)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
