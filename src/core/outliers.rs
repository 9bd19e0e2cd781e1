/// Removes statistically extreme prices using the 1.5·IQR rule.
///
/// Fewer than 4 samples is too small for quartile estimation, so the input
/// comes back unchanged. Quartiles are order statistics (inverted CDF):
/// Q1 = x⌈n/4⌉ and Q3 = x⌈3n/4⌉ of the sorted sample, which keeps both
/// quartiles inside the bulk of the data even for small n. Survivors keep
/// their original order.
pub fn remove_outliers(prices: &[u64]) -> Vec<u64> {
    if prices.len() < 4 {
        return prices.to_vec();
    }

    let mut sorted = prices.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let q1 = sorted[n.div_ceil(4) - 1] as f64;
    let q3 = sorted[(3 * n).div_ceil(4) - 1] as f64;
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    prices
        .iter()
        .copied()
        .filter(|&p| (p as f64) >= lower && (p as f64) <= upper)
        .collect()
}

/// Outlier removal with the pipeline invariant attached: a non-empty input
/// never filters down to an empty set, the unfiltered input is kept instead.
pub fn remove_outliers_or_keep(prices: &[u64]) -> Vec<u64> {
    let filtered = remove_outliers(prices);
    if filtered.is_empty() && !prices.is_empty() {
        prices.to_vec()
    } else {
        filtered
    }
}
