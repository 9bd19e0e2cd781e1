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

const SOURCE_LABEL: &str = "digikala";
const DEFAULT_BASE_URL: &str = "https://api.digikala.com";
/// The search endpoint returns more rows than we want listings; scan a few
/// extra so products without a priced variant don't shrink the result.
const SCAN_LIMIT: usize = 8;

pub struct DigikalaSource {
    client: Client,
    settings: SourceSettings,
}

impl DigikalaSource {
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

    async fn search_api(&self, product_name: &str) -> Result<Vec<Observation>> {
        let url = format!("{}/v1/search/", self.base_url());
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", product_name)])
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "application/json")
            .header("Referer", "https://www.digikala.com/")
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await?;
        tracing::debug!("API response status: {}", response.status());

        let body: Value = response.error_for_status()?.json().await?;
        Ok(self.extract_listings(&body))
    }

    fn extract_listings(&self, body: &Value) -> Vec<Observation> {
        let mut observations = Vec::new();
        let products = match body.pointer("/data/products").and_then(Value::as_array) {
            Some(products) => products,
            None => return observations,
        };

        for product in products.iter().take(SCAN_LIMIT) {
            let price_info = match product.pointer("/default_variant/price") {
                Some(info) => info,
                None => continue,
            };
            // This endpoint quotes prices in rial; listings carry toman.
            // A zero selling_price means "not on sale", fall back to the
            // recommended retail price.
            let rial = price_info
                .get("selling_price")
                .and_then(numeric_price)
                .or_else(|| price_info.get("rrp_price").and_then(numeric_price));
            let price = match rial {
                Some(rial) => rial / 10,
                None => continue,
            };
            if price <= VALIDITY_FLOOR {
                continue;
            }

            let title = product
                .get("title_fa")
                .and_then(Value::as_str)
                .unwrap_or("product");

            observations.push(Observation {
                price,
                title: title.to_string(),
                url: format!(
                    "https://www.digikala.com/product/dkp-{}/",
                    id_string(product.get("id"))
                ),
                image: main_image(product),
                source: SOURCE_LABEL.to_string(),
                synthetic: false,
            });

            if observations.len() >= self.settings.max_results {
                break;
            }
        }

        observations
    }
}

/// `images.main.url` is usually a list of renditions; take the first.
fn main_image(product: &Value) -> Option<String> {
    match product.pointer("/images/main/url") {
        Some(Value::Array(urls)) => urls.first().and_then(Value::as_str).map(String::from),
        Some(Value::String(url)) => Some(url.clone()),
        _ => None,
    }
}

#[async_trait]
impl ObservationSource for DigikalaSource {
    fn label(&self) -> &str {
        SOURCE_LABEL
    }

    async fn search(&self, product_name: &str) -> Vec<Observation> {
        tracing::info!("📱 Searching digikala for: {}", product_name);
        match self.search_api(product_name).await {
            Ok(observations) => {
                if observations.is_empty() {
                    tracing::warn!("digikala returned no usable listings");
                }
                observations
            }
            Err(e) => {
                tracing::warn!("❌ digikala search failed: {}", e);
                Vec::new()
            }
        }
    }
}
