use crate::utils::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One price listing for the queried product from one marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub price: u64,
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub source: String,
    /// Set on simulated listings substituted for a source that returned
    /// nothing, so consumers can exclude or badge them.
    #[serde(default)]
    pub synthetic: bool,
}

/// Named weighting scheme blending the market fair price with the user's
/// own base price. Unrecognized tags fold into `Balanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum Strategy {
    Competitive,
    ValueBased,
    #[default]
    Balanced,
}

impl Strategy {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "competitive" => Strategy::Competitive,
            "value-based" => Strategy::ValueBased,
            _ => Strategy::Balanced,
        }
    }

    /// (market_weight, baseline_weight)
    pub fn weights(self) -> (f64, f64) {
        match self {
            Strategy::Competitive => (0.7, 0.3),
            Strategy::ValueBased => (0.3, 0.7),
            Strategy::Balanced => (0.5, 0.5),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Competitive => "competitive",
            Strategy::ValueBased => "value-based",
            Strategy::Balanced => "balanced",
        }
    }
}

impl From<String> for Strategy {
    fn from(tag: String) -> Self {
        Strategy::parse(&tag)
    }
}

/// One price-suggestion request: what to search for, an optional base price
/// the user calculated themselves, and the blending strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub product_name: String,
    pub calculated_price: Option<f64>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.product_name.trim().is_empty() {
            return Err(FinderError::RequestError {
                message: "product_name is required".to_string(),
            });
        }
        if let Some(base) = self.calculated_price {
            if !base.is_finite() || base <= 0.0 {
                return Err(FinderError::RequestError {
                    message: format!("calculated_price must be a positive number, got {}", base),
                });
            }
        }
        Ok(())
    }
}

/// Per-source statistics over that source's own valid prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub avg: f64,
}

/// Full listing detail as presented to the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub price: u64,
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub formatted_price: String,
    #[serde(default)]
    pub synthetic: bool,
}

/// Successful aggregation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceReport {
    pub success: bool,
    pub product_name: String,
    pub min_price: u64,
    pub max_price: u64,
    pub avg_price: u64,
    pub final_suggested_price: u64,
    pub explanation: String,
    pub sources: BTreeMap<String, Vec<u64>>,
    pub source_stats: BTreeMap<String, SourceStats>,
    pub detailed_products: BTreeMap<String, Vec<ProductDetail>>,
    pub total_results: usize,
    pub results_breakdown: BTreeMap<String, usize>,
}

/// Structured negative outcome: the search ran but produced no evidence to
/// price against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoResults {
    pub success: bool,
    pub message: String,
}

impl NoResults {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Priced(Box<PriceReport>),
    NoEvidence(NoResults),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Priced(_))
    }

    pub fn report(&self) -> Option<&PriceReport> {
        match self {
            SearchOutcome::Priced(report) => Some(report),
            SearchOutcome::NoEvidence(_) => None,
        }
    }
}
