//! Chat endpoint integration tests
//!
//! Tests for POST /api/chat: request relaying, reply shaping, credential
//! resolution and upstream error surfacing.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants, test_data, TestHarness};

#[tokio::test]
async fn test_chat_relays_completion() {
    let harness = TestHarness::new().await;
    harness
        .provider
        .mock_chat_completion("Doing well!", "meta-llama/llama-3.1-8b-instruct", 12, 4)
        .await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&test_data::chat_request())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["content"], "Doing well!");
    assert_eq!(body["model"], "meta-llama/llama-3.1-8b-instruct");
    assert_eq!(body["usage"]["prompt_tokens"], 12);
    assert_eq!(body["usage"]["completion_tokens"], 4);
    assert_eq!(body["usage"]["total_tokens"], 16);

    // upstream sees only model and role/content turns
    assert_eq!(
        harness.upstream_body("/chat/completions").await,
        test_data::chat_request()
    );
    assert_eq!(
        harness.upstream_auth("/chat/completions").await,
        format!("Bearer {}", constants::TEST_POOL_KEY)
    );
}

#[tokio::test]
async fn test_chat_without_content_says_no_response() {
    let harness = TestHarness::new().await;
    harness
        .provider
        .mock_chat_completion_raw(json!({"model": "vendor/model", "choices": []}))
        .await;

    let body: Value = harness
        .server
        .post("/api/chat")
        .json(&test_data::chat_request())
        .await
        .json();

    assert_eq!(body["content"], "No response");
    assert!(body.get("usage").is_none());
}

#[tokio::test]
async fn test_chat_missing_model() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&json!({"messages": [{"role": "user", "content": "Hi"}]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Missing required fields");
    assert!(harness.provider.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_chat_missing_messages() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&json!({"model": "vendor/model"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_invalid_json() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/api/chat")
        .text("{not json")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_chat_relays_provider_error() {
    let harness = TestHarness::new().await;
    harness
        .provider
        .mock_chat_error(402, "Insufficient credits")
        .await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&test_data::chat_request())
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert_eq!(body["error"]["message"], "Insufficient credits");
}

#[tokio::test]
async fn test_chat_provider_error_without_message() {
    let harness = TestHarness::new().await;
    harness
        .provider
        .mock_chat_error_text(500, "internal failure")
        .await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&test_data::chat_request())
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "API request failed");
}

#[tokio::test]
async fn test_chat_uses_caller_key_when_allowed() {
    let harness = TestHarness::with_config(|config| config.allow_user_api_keys = true).await;
    harness
        .provider
        .mock_chat_completion("Hi", "vendor/model", 1, 1)
        .await;

    let mut request = test_data::chat_request();
    request["apiKey"] = json!(constants::TEST_USER_KEY);

    let response = harness.server.post("/api/chat").json(&request).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    assert_eq!(
        harness.upstream_auth("/chat/completions").await,
        format!("Bearer {}", constants::TEST_USER_KEY)
    );
    // the caller key itself is not forwarded in the body
    assert!(harness
        .upstream_body("/chat/completions")
        .await
        .get("apiKey")
        .is_none());
}

#[tokio::test]
async fn test_chat_ignores_caller_key_when_disallowed() {
    let harness = TestHarness::new().await;
    harness
        .provider
        .mock_chat_completion("Hi", "vendor/model", 1, 1)
        .await;

    let mut request = test_data::chat_request();
    request["apiKey"] = json!(constants::TEST_USER_KEY);

    let response = harness.server.post("/api/chat").json(&request).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        harness.upstream_auth("/chat/completions").await,
        format!("Bearer {}", constants::TEST_POOL_KEY)
    );
}

#[tokio::test]
async fn test_chat_rejects_malformed_caller_key() {
    let harness = TestHarness::with_config(|config| config.allow_user_api_keys = true).await;

    let mut request = test_data::chat_request();
    request["apiKey"] = json!("definitely-not-a-key");

    let response = harness.server.post("/api/chat").json(&request).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid API key format");
}

#[tokio::test]
async fn test_chat_without_any_key() {
    let harness = TestHarness::with_config(|config| config.api_keys.clear()).await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&test_data::chat_request())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(harness.provider.received_requests().await.is_empty());
}
