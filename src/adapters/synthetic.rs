use crate::adapters::encode_query;
use crate::domain::model::Observation;
use rand::Rng;

/// Price shape for simulated listings, tuned per marketplace to resemble its
/// typical spread.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticProfile {
    pub base_range: (u64, u64),
    pub jitter: (i64, i64),
    pub count: usize,
}

/// Generates clearly-flagged simulated listings for a source that returned
/// nothing, so the rest of the pipeline still has something to work with.
/// Every generated observation carries `synthetic: true` and links to the
/// marketplace's search page rather than a product page.
pub struct SyntheticCatalog {
    label: String,
    search_url_template: Option<&'static str>,
    profile: SyntheticProfile,
}

impl SyntheticCatalog {
    pub fn for_source(label: &str) -> Self {
        let (profile, search_url_template) = match label {
            "digikala" => (
                SyntheticProfile {
                    base_range: (100_000, 1_000_000),
                    jitter: (-20_000, 20_000),
                    count: 5,
                },
                Some("https://www.digikala.com/search/?q="),
            ),
            "torob" => (
                SyntheticProfile {
                    base_range: (150_000, 1_500_000),
                    jitter: (-50_000, 100_000),
                    count: 4,
                },
                Some("https://torob.com/search/?query="),
            ),
            "basalam" => (
                SyntheticProfile {
                    base_range: (80_000, 800_000),
                    jitter: (-20_000, 20_000),
                    count: 4,
                },
                Some("https://basalam.com/search?q="),
            ),
            _ => (
                SyntheticProfile {
                    base_range: (100_000, 1_000_000),
                    jitter: (-20_000, 20_000),
                    count: 4,
                },
                None,
            ),
        };

        Self {
            label: label.to_string(),
            search_url_template,
            profile,
        }
    }

    pub fn generate(&self, product_name: &str) -> Vec<Observation> {
        let mut rng = rand::thread_rng();
        let base_price = rng.gen_range(self.profile.base_range.0..=self.profile.base_range.1);
        let url = self.search_url(product_name);

        (1..=self.profile.count)
            .map(|i| {
                let jitter = rng.gen_range(self.profile.jitter.0..=self.profile.jitter.1);
                Observation {
                    price: base_price.saturating_add_signed(jitter),
                    title: format!("{} - sample {}", product_name, i),
                    url: url.clone(),
                    image: None,
                    source: self.label.clone(),
                    synthetic: true,
                }
            })
            .collect()
    }

    fn search_url(&self, product_name: &str) -> String {
        match self.search_url_template {
            Some(template) => format!("{}{}", template, encode_query(product_name)),
            None => "#".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::VALIDITY_FLOOR;

    #[test]
    fn test_generated_listings_are_flagged_and_priced() {
        let catalog = SyntheticCatalog::for_source("digikala");
        let listings = catalog.generate("test widget");

        assert_eq!(listings.len(), 5);
        for listing in &listings {
            assert!(listing.synthetic);
            assert_eq!(listing.source, "digikala");
            assert!(listing.price > VALIDITY_FLOOR);
            assert!(listing.title.contains("test widget"));
        }
    }

    #[test]
    fn test_search_url_is_encoded() {
        let catalog = SyntheticCatalog::for_source("torob");
        let listings = catalog.generate("iPhone 13");

        assert_eq!(
            listings[0].url,
            "https://torob.com/search/?query=iPhone+13"
        );
    }

    #[test]
    fn test_unknown_source_gets_generic_profile() {
        let catalog = SyntheticCatalog::for_source("bazaar-x");
        let listings = catalog.generate("widget");

        assert_eq!(listings.len(), 4);
        assert_eq!(listings[0].url, "#");
        assert!(listings.iter().all(|l| l.source == "bazaar-x"));
    }
}
