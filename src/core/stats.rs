/// Summary statistics over a non-empty set of observed prices.
///
/// `avg` and `fair_price` stay in floating precision here; truncation to
/// integers happens once, when the report is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub min: u64,
    pub max: u64,
    pub avg: f64,
    /// Median of the price set, the market's fair price. Fractional when the
    /// set has an even number of elements.
    pub fair_price: f64,
}

pub fn summarize(prices: &[u64]) -> Option<PriceSummary> {
    let min = *prices.iter().min()?;
    let max = *prices.iter().max()?;
    let avg = mean(prices)?;
    let fair_price = median(prices)?;
    Some(PriceSummary {
        min,
        max,
        avg,
        fair_price,
    })
}

pub fn mean(prices: &[u64]) -> Option<f64> {
    let count = prices.len() as f64;
    if count > 0.0 {
        let sum: f64 = prices.iter().map(|&p| p as f64).sum();
        Some(sum / count)
    } else {
        None
    }
}

pub fn median(prices: &[u64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();
    Some(median_of_sorted(&sorted))
}

/// Median of an already-sorted, non-empty slice.
pub(crate) fn median_of_sorted(sorted: &[u64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    } else {
        sorted[n / 2] as f64
    }
}
