use crate::adapters::{id_string, numeric_price, BROWSER_USER_AGENT};
use crate::config::sources::SourceSettings;
use crate::core::normalize::VALIDITY_FLOOR;
use crate::domain::model::Observation;
use crate::domain::ports::ObservationSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const SOURCE_LABEL: &str = "basalam";
const DEFAULT_SEARCH_BASE_URL: &str = "https://search.basalam.com";
const DEFAULT_API_BASE_URL: &str = "https://api.basalam.com";

pub struct BasalamSource {
    client: Client,
    settings: SourceSettings,
}

impl BasalamSource {
    pub fn new(settings: SourceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn search_base_url(&self) -> &str {
        self.settings
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_SEARCH_BASE_URL)
    }

    fn api_base_url(&self) -> &str {
        self.settings
            .fallback_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    async fn attempt_primary(&self, product_name: &str) -> Result<Vec<Observation>> {
        let url = format!("{}/ai-engine/api/v2.0/product/search", self.search_base_url());
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", "0"),
                ("q", product_name),
                ("dynamicFacets", "true"),
                ("size", "12"),
                ("enableNavigations", "true"),
            ])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await?;

        let body: Value = response.error_for_status()?.json().await?;
        Ok(self.extract_primary(&body))
    }

    async fn attempt_alternative(&self, product_name: &str) -> Result<Vec<Observation>> {
        let url = format!("{}/api/v2/product/search", self.api_base_url());
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("query", product_name)])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await?;

        let body: Value = response.error_for_status()?.json().await?;
        Ok(self.extract_alternative(&body))
    }

    fn extract_primary(&self, body: &Value) -> Vec<Observation> {
        let mut observations = Vec::new();
        let products = match body.get("products").and_then(Value::as_array) {
            Some(products) => products,
            None => return observations,
        };

        for product in products.iter().take(self.settings.max_results) {
            // The search engine quotes prices in rial.
            let price = match product.get("price").and_then(numeric_price) {
                Some(rial) => rial / 10,
                None => continue,
            };
            if price <= VALIDITY_FLOOR {
                continue;
            }

            let title = product
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("product");

            observations.push(Observation {
                price,
                title: title.to_string(),
                url: format!("https://basalam.com/p/{}/", id_string(product.get("id"))),
                image: product
                    .pointer("/photo/MEDIUM")
                    .and_then(Value::as_str)
                    .map(String::from),
                source: SOURCE_LABEL.to_string(),
                synthetic: false,
            });
        }

        observations
    }

    fn extract_alternative(&self, body: &Value) -> Vec<Observation> {
        let mut observations = Vec::new();
        let products = match body.get("products").and_then(Value::as_array) {
            Some(products) => products,
            None => return observations,
        };

        for product in products.iter().take(self.settings.max_results) {
            // Unlike the search engine, this endpoint already quotes toman.
            let price = match product.get("price").and_then(numeric_price) {
                Some(price) => price,
                None => continue,
            };
            if price <= VALIDITY_FLOOR {
                continue;
            }

            let title = product
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("product");

            observations.push(Observation {
                price,
                title: title.to_string(),
                url: format!("https://basalam.com/p/{}/", id_string(product.get("id"))),
                image: product
                    .get("image_url")
                    .and_then(Value::as_str)
                    .map(String::from),
                source: SOURCE_LABEL.to_string(),
                synthetic: false,
            });
        }

        observations
    }
}

#[async_trait]
impl ObservationSource for BasalamSource {
    fn label(&self) -> &str {
        SOURCE_LABEL
    }

    async fn search(&self, product_name: &str) -> Vec<Observation> {
        tracing::info!("🏪 Searching basalam for: {}", product_name);

        match self.attempt_primary(product_name).await {
            Ok(observations) if !observations.is_empty() => return observations,
            Ok(_) => tracing::debug!("basalam primary search empty, trying alternative"),
            Err(e) => tracing::warn!("basalam primary search failed: {}", e),
        }

        match self.attempt_alternative(product_name).await {
            Ok(observations) => {
                if observations.is_empty() {
                    tracing::warn!("basalam returned no listings");
                }
                observations
            }
            Err(e) => {
                tracing::warn!("❌ basalam alternative search failed: {}", e);
                Vec::new()
            }
        }
    }
}
