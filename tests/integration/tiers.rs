//! Tier metadata endpoint integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::TestHarness;

#[tokio::test]
async fn test_list_tiers_in_display_order() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/api/tiers").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let entries = body.as_array().unwrap();

    let tiers: Vec<&str> = entries.iter().map(|e| e["tier"].as_str().unwrap()).collect();
    assert_eq!(tiers, vec!["ultra", "pro", "fast", "normal", "slow"]);

    for entry in entries {
        assert!(!entry["label"].as_str().unwrap().is_empty());
        assert!(!entry["description"].as_str().unwrap().is_empty());
    }
    assert_eq!(entries[4]["label"], "Standard");
}
