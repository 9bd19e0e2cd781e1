use crate::domain::model::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub price: u64,
    pub explanation: String,
}

/// Computes the final suggested price from the market fair price, an
/// optional user-supplied base price and the selected strategy.
///
/// Truncation to an integer happens once, on the final blended value.
pub fn suggest_price(fair_price: f64, baseline: Option<f64>, strategy: Strategy) -> Suggestion {
    match baseline {
        Some(base) => {
            let (market_weight, baseline_weight) = strategy.weights();
            let blended = fair_price * market_weight + base * baseline_weight;
            Suggestion {
                price: blended.floor() as u64,
                explanation: format!(
                    "Suggested price blends the market fair price with your base price under the {} strategy.",
                    strategy.label()
                ),
            }
        }
        None => Suggestion {
            price: fair_price.floor() as u64,
            explanation: "Suggested price is based on market analysis of current listings."
                .to_string(),
        },
    }
}
