use crate::core::engine::EngineConfig;
use crate::core::normalize::MinorUnitRule;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Marketplace and engine settings loaded from a TOML file. Every section
/// and field is optional; missing pieces fall back to the built-in defaults,
/// so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub digikala: SourceSettings,
    #[serde(default)]
    pub torob: SourceSettings,
    #[serde(default)]
    pub basalam: SourceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_source_timeout")]
    pub source_timeout_seconds: u64,
    #[serde(default = "default_synthetic_fallback")]
    pub synthetic_fallback: bool,
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Override for the primary API base URL. Used by tests and by
    /// deployments routing through a proxy.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Override for the alternative API base URL, for sources that have one.
    #[serde(default)]
    pub fallback_url: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Minor-unit correction applied to prices whose denomination the API
    /// does not state.
    #[serde(default)]
    pub minor_unit: MinorUnitRule,
}

fn default_source_timeout() -> u64 {
    30
}

fn default_synthetic_fallback() -> bool {
    true
}

fn default_currency_label() -> String {
    "Toman".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_results() -> usize {
    5
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            source_timeout_seconds: default_source_timeout(),
            synthetic_fallback: default_synthetic_fallback(),
            currency_label: default_currency_label(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: None,
            fallback_url: None,
            timeout_seconds: default_request_timeout(),
            max_results: default_max_results(),
            minor_unit: MinorUnitRule::default(),
        }
    }
}

impl SourcesConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values; unset
    /// variables are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number(
            "engine.source_timeout_seconds",
            self.engine.source_timeout_seconds,
            1,
        )?;

        for (name, source) in [
            ("digikala", &self.digikala),
            ("torob", &self.torob),
            ("basalam", &self.basalam),
        ] {
            if let Some(url) = &source.base_url {
                validate_url(&format!("{}.base_url", name), url)?;
            }
            if let Some(url) = &source.fallback_url {
                validate_url(&format!("{}.fallback_url", name), url)?;
            }
            validate_positive_number(
                &format!("{}.timeout_seconds", name),
                source.timeout_seconds,
                1,
            )?;
            validate_positive_number(
                &format!("{}.max_results", name),
                source.max_results as u64,
                1,
            )?;
            validate_positive_number(
                &format!("{}.minor_unit.divisor", name),
                source.minor_unit.divisor,
                1,
            )?;
        }

        Ok(())
    }
}

impl Validate for SourcesConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            source_timeout: Duration::from_secs(settings.source_timeout_seconds),
            synthetic_fallback: settings.synthetic_fallback,
            currency_label: settings.currency_label.clone(),
        }
    }
}
