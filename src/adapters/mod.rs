// Adapters layer: one module per marketplace, plus the simulated-listing
// catalog substituted when a marketplace contributes nothing.

pub mod basalam;
pub mod digikala;
pub mod synthetic;
pub mod torob;

pub use basalam::BasalamSource;
pub use digikala::DigikalaSource;
pub use synthetic::SyntheticCatalog;
pub use torob::TorobSource;

pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Character-safe truncation for display titles coming from the APIs.
pub(crate) fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub(crate) fn encode_query(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Reads a JSON number as a positive integer price, truncating floats.
pub(crate) fn numeric_price(value: &serde_json::Value) -> Option<u64> {
    value
        .as_u64()
        .filter(|&p| p > 0)
        .or_else(|| value.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64))
}

/// Product ids arrive as numbers or strings depending on the endpoint.
pub(crate) fn id_string(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}
