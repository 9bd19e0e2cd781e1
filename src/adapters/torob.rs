use crate::adapters::{clip, BROWSER_USER_AGENT};
use crate::config::sources::SourceSettings;
use crate::core::normalize::{normalize_price, VALIDITY_FLOOR};
use crate::domain::model::Observation;
use crate::domain::ports::ObservationSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const SOURCE_LABEL: &str = "torob";
const DEFAULT_BASE_URL: &str = "https://api.torob.com/v4";
const TITLE_LIMIT: usize = 100;
const DETAILS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct TorobSearchResponse {
    #[serde(default)]
    results: Vec<TorobListing>,
}

#[derive(Debug, Deserialize)]
struct TorobListing {
    name1: Option<String>,
    prk: Option<String>,
    search_id: Option<String>,
    /// Listing price with an unstated denomination; normalized with the
    /// source's minor-unit rule. The product-page price is preferred.
    price: Option<Value>,
    image_url: Option<String>,
}

pub struct TorobSource {
    client: Client,
    settings: SourceSettings,
}

impl TorobSource {
    pub fn new(settings: SourceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn base_url(&self) -> &str {
        self.settings
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
    }

    fn fallback_url(&self) -> &str {
        self.settings
            .fallback_url
            .as_deref()
            .unwrap_or_else(|| self.base_url())
    }

    async fn attempt_base_search(&self, product_name: &str) -> Result<TorobSearchResponse> {
        let url = format!("{}/base-search/", self.base_url());
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", product_name), ("page", "0"), ("size", "24")])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json")
            .header("Referer", "https://torob.com/")
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await?;

        Ok(response.error_for_status()?.json().await?)
    }

    async fn attempt_product_search(&self, product_name: &str) -> Result<TorobSearchResponse> {
        let url = format!("{}/product-search/", self.fallback_url());
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("query", product_name), ("page", "0")])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json")
            .header("Referer", "https://torob.com/")
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await?;

        Ok(response.error_for_status()?.json().await?)
    }

    /// Product-page lookup for the exact minimum shop price and image.
    async fn fetch_details(&self, prk: &str, search_id: &str) -> Result<Value> {
        let url = format!("{}/product-page/", self.base_url());

        let response = self
            .client
            .get(&url)
            .query(&[("prk", prk), ("search_id", search_id)])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json")
            .header("Referer", "https://torob.com/")
            .timeout(Duration::from_secs(DETAILS_TIMEOUT_SECS))
            .send()
            .await?;

        Ok(response.error_for_status()?.json().await?)
    }

    async fn collect(&self, listings: Vec<TorobListing>, product_name: &str) -> Vec<Observation> {
        let mut observations = Vec::new();

        for listing in listings.into_iter().take(self.settings.max_results) {
            let TorobListing {
                name1,
                prk,
                search_id,
                price,
                image_url,
            } = listing;

            let prk = match prk {
                Some(prk) if !prk.is_empty() => prk,
                _ => continue,
            };

            let details = match &search_id {
                Some(search_id) => match self.fetch_details(&prk, search_id).await {
                    Ok(details) => details,
                    Err(e) => {
                        tracing::debug!("torob details for {} failed: {}", prk, e);
                        Value::Null
                    }
                },
                None => Value::Null,
            };

            let price = details
                .get("min_price")
                .and_then(Value::as_u64)
                .filter(|&p| p > 0)
                .or_else(|| {
                    price
                        .as_ref()
                        .and_then(|raw| normalize_price(raw, self.settings.minor_unit))
                });
            let price = match price {
                Some(price) if price > VALIDITY_FLOOR => price,
                _ => continue,
            };

            let title = name1.unwrap_or_else(|| product_name.to_string());
            let image = details
                .get("image_url")
                .and_then(Value::as_str)
                .map(String::from)
                .or(image_url);

            observations.push(Observation {
                price,
                title: clip(&title, TITLE_LIMIT),
                url: format!("https://torob.com/p/{}/", prk),
                image,
                source: SOURCE_LABEL.to_string(),
                synthetic: false,
            });
        }

        observations
    }
}

#[async_trait]
impl ObservationSource for TorobSource {
    fn label(&self) -> &str {
        SOURCE_LABEL
    }

    async fn search(&self, product_name: &str) -> Vec<Observation> {
        tracing::info!("🛒 Searching torob for: {}", product_name);

        let mut listings = Vec::new();
        match self.attempt_base_search(product_name).await {
            Ok(response) => listings = response.results,
            Err(e) => tracing::warn!("torob base search failed: {}", e),
        }
        if listings.is_empty() {
            tracing::debug!("torob base search empty, trying product search");
            match self.attempt_product_search(product_name).await {
                Ok(response) => listings = response.results,
                Err(e) => tracing::warn!("torob product search failed: {}", e),
            }
        }
        if listings.is_empty() {
            tracing::warn!("torob returned no listings");
            return Vec::new();
        }

        self.collect(listings, product_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json_data = r#"{
            "results": [
                {
                    "name1": "Sample phone",
                    "prk": "abc123",
                    "search_id": "s-1",
                    "price": 1500000,
                    "image_url": "https://img.example/t.jpg"
                }
            ]
        }"#;
        let parsed: TorobSearchResponse = serde_json::from_str(json_data).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].prk.as_deref(), Some("abc123"));
        assert_eq!(parsed.results[0].name1.as_deref(), Some("Sample phone"));
    }

    #[test]
    fn test_parse_response_without_results_field() {
        let parsed: TorobSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_parse_listing_with_missing_fields() {
        let json_data = r#"{ "results": [ { "prk": "p1" }, { "name1": "no prk" } ] }"#;
        let parsed: TorobSearchResponse = serde_json::from_str(json_data).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert!(parsed.results[0].search_id.is_none());
        assert!(parsed.results[1].prk.is_none());
    }

    #[test]
    fn test_parse_listing_with_string_price() {
        let json_data = r#"{ "results": [ { "prk": "p1", "price": "۲۵۰٬۰۰۰" } ] }"#;
        let parsed: TorobSearchResponse = serde_json::from_str(json_data).unwrap();
        let raw = parsed.results[0].price.as_ref().unwrap();
        assert_eq!(
            normalize_price(raw, crate::core::normalize::MinorUnitRule::default()),
            Some(250_000)
        );
    }
}
