use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum price treated as a real listing. Values at or below this are
/// parsing noise (truncated digits, misread fragments), not market prices.
pub const VALIDITY_FLOOR: u64 = 1000;

/// Minor-unit correction applied to a parsed price magnitude.
///
/// Marketplace feeds mix rial- and toman-denominated values; a magnitude
/// above `threshold` is taken to be quoted in the ten-times-smaller unit and
/// divided by `divisor`. This is a heuristic guard, not a currency-exponent
/// lookup, so it is a config value that can be tuned per source rather than
/// a hardcoded constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MinorUnitRule {
    #[serde(default = "default_threshold")]
    pub threshold: u64,
    #[serde(default = "default_divisor")]
    pub divisor: u64,
}

fn default_threshold() -> u64 {
    10_000_000
}

fn default_divisor() -> u64 {
    10
}

impl Default for MinorUnitRule {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            divisor: default_divisor(),
        }
    }
}

impl MinorUnitRule {
    pub fn apply(&self, value: u64) -> u64 {
        if value > self.threshold && self.divisor > 0 {
            value / self.divisor
        } else {
            value
        }
    }
}

/// Converts a raw price value of unknown encoding into a clean positive
/// integer, or `None` when it cannot be read as one.
///
/// Strings are reduced to their digits first, accepting Persian and
/// Arabic-Indic digit variants and their thousands separators.
pub fn normalize_price(raw: &Value, rule: MinorUnitRule) -> Option<u64> {
    let parsed = match raw {
        Value::Number(number) => {
            if let Some(integer) = number.as_u64() {
                Some(integer)
            } else {
                number.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64)
            }
        }
        Value::String(text) => parse_digits(text),
        _ => None,
    }?;

    let corrected = rule.apply(parsed);
    if corrected > 0 {
        Some(corrected)
    } else {
        None
    }
}

fn parse_digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter_map(to_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn to_ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        // Persian digits
        '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
        // Arabic-Indic digits
        '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
        _ => None,
    }
}
