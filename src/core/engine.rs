use crate::adapters::synthetic::SyntheticCatalog;
use crate::core::normalize::VALIDITY_FLOOR;
use crate::core::{outliers, report, stats, strategy};
use crate::domain::model::{NoResults, Observation, SearchOutcome, SearchRequest};
use crate::domain::ports::ObservationSource;
use crate::utils::error::Result;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard deadline per source query. A source that misses it contributes
    /// nothing; the others are unaffected.
    pub source_timeout: Duration,
    /// Substitute clearly-flagged simulated listings for a source that
    /// returned nothing.
    pub synthetic_fallback: bool,
    pub currency_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(30),
            synthetic_fallback: true,
            currency_label: "Toman".to_string(),
        }
    }
}

/// The aggregation engine: queries every source concurrently, cleans the
/// collected prices and produces a structured suggestion.
pub struct PriceFinder {
    sources: Vec<Arc<dyn ObservationSource>>,
    config: EngineConfig,
}

impl PriceFinder {
    pub fn new(sources: Vec<Arc<dyn ObservationSource>>, config: EngineConfig) -> Self {
        Self { sources, config }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        request.validate()?;
        let product_name = request.product_name.trim();

        tracing::info!(
            "🔍 Searching {} sources for: {}",
            self.sources.len(),
            product_name
        );
        let collected = self.collect_observations(product_name).await;

        let mut results_breakdown = BTreeMap::new();
        let mut all_observations = Vec::new();
        for (label, observations) in collected {
            tracing::info!("✅ {}: {} listings", label, observations.len());
            results_breakdown.insert(label, observations.len());
            all_observations.extend(observations);
        }

        if all_observations.is_empty() {
            tracing::warn!("No listings found in any source");
            return Ok(SearchOutcome::NoEvidence(NoResults::new(
                "no products found in any source",
            )));
        }

        let valid: Vec<Observation> = all_observations
            .into_iter()
            .filter(|o| o.price > VALIDITY_FLOOR)
            .collect();
        if valid.is_empty() {
            tracing::warn!("All collected prices fell below the validity floor");
            return Ok(SearchOutcome::NoEvidence(NoResults::new(
                "no valid prices found",
            )));
        }

        let prices: Vec<u64> = valid.iter().map(|o| o.price).collect();
        let filtered = outliers::remove_outliers_or_keep(&prices);
        if filtered.len() < prices.len() {
            tracing::debug!(
                "Outlier filter dropped {} of {} prices",
                prices.len() - filtered.len(),
                prices.len()
            );
        }

        let summary = match stats::summarize(&filtered) {
            Some(summary) => summary,
            None => {
                return Ok(SearchOutcome::NoEvidence(NoResults::new(
                    "no valid prices found",
                )))
            }
        };

        let suggestion =
            strategy::suggest_price(summary.fair_price, request.calculated_price, request.strategy);

        let report = report::assemble_report(
            product_name,
            &valid,
            &summary,
            suggestion.price,
            suggestion.explanation,
            results_breakdown,
            &self.config.currency_label,
        );

        tracing::info!(
            "💰 Suggested price for {}: {} ({} listings)",
            product_name,
            report.final_suggested_price,
            report.total_results
        );
        Ok(SearchOutcome::Priced(Box::new(report)))
    }

    /// Queries all sources concurrently. Results come back in source order;
    /// a slow or failing source degrades to an empty list.
    async fn collect_observations(&self, product_name: &str) -> Vec<(String, Vec<Observation>)> {
        let queries = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let name = product_name.to_string();
            let deadline = self.config.source_timeout;
            async move {
                let label = source.label().to_string();
                let observations = match timeout(deadline, source.search(&name)).await {
                    Ok(observations) => observations,
                    Err(_) => {
                        tracing::warn!("⏱️ Source {} timed out after {:?}", label, deadline);
                        Vec::new()
                    }
                };
                (label, observations)
            }
        });

        let mut collected = join_all(queries).await;

        if self.config.synthetic_fallback {
            for (label, observations) in &mut collected {
                if observations.is_empty() {
                    tracing::warn!(
                        "🔄 Source {} returned nothing, substituting simulated listings",
                        label
                    );
                    *observations = SyntheticCatalog::for_source(label).generate(product_name);
                }
            }
        }

        collected
    }
}
