/// End-to-end tests: catalog -> rows -> calculation endpoint -> rendered results
use cost_estimator::{
    app::EstimatorApp,
    catalog::{CatalogLoader, CatalogSource},
    client::CalculationClient,
    results::{ResultsView, NO_SUMMARY_PLACEHOLDER},
    rows::{ResourceType, RowManager},
    EstimatorError,
};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_default_row_priced_and_rendered() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/pricing.json");
            then.status(200).json_body(json!({
                "vm": {"b1s": {"display": "B1s"}},
                "region_multipliers": {"eastus": 1}
            }));
        })
        .await;
    let calc = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/calc")
                .header("content-type", "application/json")
                .json_body(json!({"resources": [{
                    "type": "vm",
                    "sku": "b1s",
                    "region": "eastus",
                    "quantity": 1,
                    "hours_per_month": 720
                }]}));
            then.status(200).json_body(json!({"items": [{
                "type": "vm",
                "sku": "b1s",
                "region": "eastus",
                "quantity": 1,
                "hours_per_month": 720,
                "cost": 12.3456
            }]}));
        })
        .await;

    let catalog = CatalogLoader::new(CatalogSource::Http(server.url("/data/pricing.json")))
        .load()
        .await
        .map(Arc::new);
    let mut rows = RowManager::new(catalog);
    let id = rows.add_row();

    let row = rows.get(id).unwrap();
    assert_eq!(row.resource_type(), ResourceType::Vm);
    assert_eq!(row.sku(), Some("b1s"));
    assert_eq!(row.region(), Some("eastus"));

    let client = CalculationClient::new(server.url("/api/calc"), None).unwrap();
    let result = client.submit(&rows.collect_rows().unwrap()).await.unwrap();
    calc.assert_async().await;

    let mut view = ResultsView::new();
    view.apply(&result);

    assert_eq!(view.table()[0].cost, "$12.35");
    let chart = view.chart().unwrap();
    assert_eq!(chart.slices.len(), 1);
    assert_eq!(chart.slices[0].value, 12.35);
    assert_eq!(chart.slices[0].label, "b1s (vm)");
    assert_eq!(view.summary(), Some(NO_SUMMARY_PLACEHOLDER));
}

#[tokio::test]
async fn test_row_without_catalog_sends_empty_sku() {
    let server = MockServer::start_async().await;
    let calc = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/calc").json_body(json!({"resources": [{
                "type": "vm",
                "sku": "",
                "region": "eastus",
                "quantity": 1,
                "hours_per_month": 720
            }]}));
            then.status(200).json_body(json!({
                "items": [{
                    "type": "vm", "sku": "", "region": "eastus",
                    "quantity": 1.0, "hours_per_month": 720.0, "cost": 0.0
                }],
                "total": 0.0,
                "hints": [],
                "savings_estimate": 0.0,
                "ai_summary": "Nothing to optimize."
            }));
        })
        .await;

    let mut rows = RowManager::new(None);
    rows.add_row();

    let client = CalculationClient::new(server.url("/api/calc"), None).unwrap();
    let result = client.submit(&rows.collect_rows().unwrap()).await.unwrap();
    calc.assert_async().await;

    let mut view = ResultsView::new();
    view.apply(&result);
    assert_eq!(view.table()[0].cost, "$0.00");
    assert_eq!(view.total(), Some("$0.00"));
    assert!(view.savings_estimate().is_none());
    assert_eq!(view.summary(), Some("Nothing to optimize."));
}

#[tokio::test]
async fn test_second_submit_while_pending_is_refused() {
    let server = MockServer::start_async().await;
    let calc = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/calc");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(json!({"items": []}));
        })
        .await;

    let client = CalculationClient::new(server.url("/api/calc"), None).unwrap();
    let mut rows = RowManager::new(None);
    rows.add_row();
    let request = rows.collect_rows().unwrap();

    let (first, second) = tokio::join!(client.submit(&request), client.submit(&request));

    assert!(first.is_ok());
    assert!(matches!(second, Err(EstimatorError::SubmitInFlight)));
    calc.assert_async().await;

    // Flag is released once the first request completes
    assert!(!client.is_in_flight());
    assert!(client.submit(&request).await.is_ok());
}

#[tokio::test]
async fn test_backend_error_leaves_results_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/calc");
            then.status(502).body("bad gateway");
        })
        .await;

    let client = CalculationClient::new(server.url("/api/calc"), None).unwrap();
    let mut app = EstimatorApp::new(None);

    let request = app.request_calculation().unwrap();
    let outcome = client.submit(&request).await;
    assert!(matches!(
        outcome,
        Err(EstimatorError::UpstreamStatus { ref body, .. }) if body == "bad gateway"
    ));

    app.finish_calculation(outcome);
    assert!(!app.is_pending());
    assert!(!app.results().has_results());
    assert!(app.results().chart().is_none());
}

#[tokio::test]
async fn test_invalid_response_body_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/calc");
            then.status(200).body("{\"items\": \"nope\"}");
        })
        .await;

    let client = CalculationClient::new(server.url("/api/calc"), None).unwrap();
    let outcome = client.submit(&Default::default()).await;
    assert!(matches!(outcome, Err(EstimatorError::Json(_))));
}
