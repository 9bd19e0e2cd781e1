use httpmock::prelude::*;
use price_finder::config::sources::SourceSettings;
use price_finder::{
    BasalamSource, DigikalaSource, EngineConfig, ObservationSource, PriceFinder, SearchRequest,
    Strategy, TorobSource,
};
use std::sync::Arc;

fn settings_for(server: &MockServer) -> SourceSettings {
    SourceSettings {
        base_url: Some(server.base_url()),
        fallback_url: Some(server.base_url()),
        ..SourceSettings::default()
    }
}

fn engine_config() -> EngineConfig {
    EngineConfig {
        synthetic_fallback: false,
        ..EngineConfig::default()
    }
}

fn request(product_name: &str) -> SearchRequest {
    SearchRequest {
        product_name: product_name.to_string(),
        calculated_price: None,
        strategy: Strategy::Balanced,
    }
}

fn mock_digikala<'a>(server: &'a MockServer, rial_prices: &[u64]) -> httpmock::Mock<'a> {
    let products: Vec<_> = rial_prices
        .iter()
        .enumerate()
        .map(|(i, &rial)| {
            serde_json::json!({
                "id": i + 1,
                "title_fa": format!("listing {}", i + 1),
                "default_variant": { "price": { "selling_price": rial } }
            })
        })
        .collect();

    server.mock(|when, then| {
        when.method(GET).path("/v1/search/").query_param("q", "widget");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "data": { "products": products } }));
    })
}

#[tokio::test]
async fn test_end_to_end_three_sources_with_outlier() {
    let digikala_server = MockServer::start();
    let torob_server = MockServer::start();
    let basalam_server = MockServer::start();

    // Two digikala listings at 100,000 and 102,000 toman (quoted in rial).
    let digikala_mock = mock_digikala(&digikala_server, &[1_000_000, 1_020_000]);

    // One torob listing whose product page reports 98,000 toman.
    let torob_search_mock = torob_server.mock(|when, then| {
        when.method(GET).path("/base-search/").query_param("q", "widget");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [
                    { "name1": "widget deluxe", "prk": "t1", "search_id": "s1" }
                ]
            }));
    });
    let torob_details_mock = torob_server.mock(|when, then| {
        when.method(GET).path("/product-page/").query_param("prk", "t1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "min_price": 98_000,
                "image_url": "https://img.example/t1.jpg"
            }));
    });

    // One absurd basalam listing at 5,000,000 toman (quoted in rial).
    let basalam_mock = basalam_server.mock(|when, then| {
        when.method(GET)
            .path("/ai-engine/api/v2.0/product/search")
            .query_param("q", "widget");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "products": [
                    { "id": 9, "name": "widget gold edition", "price": 50_000_000u64 }
                ]
            }));
    });

    let sources: Vec<Arc<dyn ObservationSource>> = vec![
        Arc::new(DigikalaSource::new(settings_for(&digikala_server))),
        Arc::new(TorobSource::new(settings_for(&torob_server))),
        Arc::new(BasalamSource::new(settings_for(&basalam_server))),
    ];
    let finder = PriceFinder::new(sources, engine_config());

    let outcome = finder.search(&request("widget")).await.unwrap();
    let report = outcome.report().expect("expected a priced outcome");

    digikala_mock.assert();
    torob_search_mock.assert();
    torob_details_mock.assert();
    basalam_mock.assert();

    // The 5,000,000 outlier is excluded from the aggregate statistics but
    // still listed under its source.
    assert!(report.success);
    assert_eq!(report.final_suggested_price, 100_000);
    assert_eq!(report.min_price, 98_000);
    assert_eq!(report.max_price, 102_000);
    assert_eq!(report.avg_price, 100_000);
    assert_eq!(report.total_results, 4);
    assert_eq!(report.sources["digikala"], vec![100_000, 102_000]);
    assert_eq!(report.sources["torob"], vec![98_000]);
    assert_eq!(report.sources["basalam"], vec![5_000_000]);
    assert_eq!(report.results_breakdown["digikala"], 2);
    assert_eq!(report.results_breakdown["torob"], 1);
    assert_eq!(report.results_breakdown["basalam"], 1);
    assert_eq!(
        report.detailed_products["torob"][0].formatted_price,
        "98,000 Toman"
    );
    assert_eq!(
        report.detailed_products["torob"][0].image.as_deref(),
        Some("https://img.example/t1.jpg")
    );
    assert_eq!(report.source_stats["digikala"].count, 2);
    assert_eq!(report.source_stats["digikala"].min, 100_000);
    assert_eq!(report.source_stats["digikala"].max, 102_000);
}

#[tokio::test]
async fn test_failing_source_does_not_poison_the_others() {
    let digikala_server = MockServer::start();
    let torob_server = MockServer::start();
    let basalam_server = MockServer::start();

    let digikala_mock = mock_digikala(
        &digikala_server,
        &[1_500_000, 1_520_000, 1_480_000, 1_510_000],
    );

    // torob is down entirely; both of its endpoints error.
    let torob_down_mock = torob_server.mock(|when, then| {
        when.method(GET).path("/base-search/");
        then.status(500);
    });
    let torob_fallback_down_mock = torob_server.mock(|when, then| {
        when.method(GET).path("/product-search/");
        then.status(500);
    });

    let basalam_mock = basalam_server.mock(|when, then| {
        when.method(GET).path("/ai-engine/api/v2.0/product/search");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "products": [
                    { "id": 1, "name": "widget", "price": 1_490_000u64 }
                ]
            }));
    });

    let sources: Vec<Arc<dyn ObservationSource>> = vec![
        Arc::new(DigikalaSource::new(settings_for(&digikala_server))),
        Arc::new(TorobSource::new(settings_for(&torob_server))),
        Arc::new(BasalamSource::new(settings_for(&basalam_server))),
    ];
    let finder = PriceFinder::new(sources, engine_config());

    let outcome = finder.search(&request("widget")).await.unwrap();
    let report = outcome.report().expect("expected a priced outcome");

    digikala_mock.assert();
    torob_down_mock.assert();
    torob_fallback_down_mock.assert();
    basalam_mock.assert();

    assert!(report.success);
    assert_eq!(report.results_breakdown["torob"], 0);
    assert_eq!(report.total_results, 5);
    assert!(!report.sources.contains_key("torob"));
}

#[tokio::test]
async fn test_no_listings_anywhere_is_a_structured_failure() {
    let digikala_server = MockServer::start();
    let torob_server = MockServer::start();
    let basalam_server = MockServer::start();

    let digikala_mock = mock_digikala(&digikala_server, &[]);

    // torob and basalam endpoints stay unmocked; the mock server answers
    // 404 and the adapters resolve to empty lists.
    let sources: Vec<Arc<dyn ObservationSource>> = vec![
        Arc::new(DigikalaSource::new(settings_for(&digikala_server))),
        Arc::new(TorobSource::new(settings_for(&torob_server))),
        Arc::new(BasalamSource::new(settings_for(&basalam_server))),
    ];
    let finder = PriceFinder::new(sources, engine_config());

    let outcome = finder.search(&request("widget")).await.unwrap();

    digikala_mock.assert();
    assert!(!outcome.is_success());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "no products found in any source");
}

#[tokio::test]
async fn test_baseline_and_strategy_shape_the_suggestion() {
    let torob_server = MockServer::start();

    torob_server.mock(|when, then| {
        when.method(GET).path("/base-search/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [{ "name1": "widget", "prk": "t1", "search_id": "s1" }]
            }));
    });
    torob_server.mock(|when, then| {
        when.method(GET).path("/product-page/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "min_price": 98_000 }));
    });

    let sources: Vec<Arc<dyn ObservationSource>> =
        vec![Arc::new(TorobSource::new(settings_for(&torob_server)))];
    let finder = PriceFinder::new(sources, engine_config());

    let request = SearchRequest {
        product_name: "widget".to_string(),
        calculated_price: Some(200_000.0),
        strategy: Strategy::Competitive,
    };

    let outcome = finder.search(&request).await.unwrap();
    let report = outcome.report().expect("expected a priced outcome");

    // floor(98,000 * 0.7 + 200,000 * 0.3)
    assert_eq!(report.final_suggested_price, 128_600);
    assert!(report.explanation.contains("competitive"));
}

#[tokio::test]
async fn test_synthetic_listings_fill_in_for_silent_sources() {
    let digikala_server = MockServer::start();
    let torob_server = MockServer::start();
    let basalam_server = MockServer::start();

    // Every marketplace is silent; with the fallback enabled the report is
    // built entirely from flagged simulated listings.
    let sources: Vec<Arc<dyn ObservationSource>> = vec![
        Arc::new(DigikalaSource::new(settings_for(&digikala_server))),
        Arc::new(TorobSource::new(settings_for(&torob_server))),
        Arc::new(BasalamSource::new(settings_for(&basalam_server))),
    ];
    let finder = PriceFinder::new(sources, EngineConfig::default());

    let outcome = finder.search(&request("widget")).await.unwrap();
    let report = outcome.report().expect("expected a priced outcome");

    assert!(report.success);
    assert_eq!(report.total_results, 13);
    assert_eq!(report.results_breakdown["digikala"], 5);
    assert_eq!(report.results_breakdown["torob"], 4);
    assert_eq!(report.results_breakdown["basalam"], 4);
    for products in report.detailed_products.values() {
        assert!(products.iter().all(|p| p.synthetic));
    }
}
