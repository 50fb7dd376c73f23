//! Mock OpenRouter API for testing
//!
//! Provides wiremock-based mocks for the provider endpoints:
//! - GET /models - Model catalog
//! - POST /chat/completions - Chat completions
//! - POST /images/generations - Image generation
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::mocks::openrouter::{MockOpenRouter, CatalogFixtures};
//!
//! #[tokio::test]
//! async fn test_with_openrouter_mock() {
//!     let provider = MockOpenRouter::start().await;
//!     provider.mock_models(CatalogFixtures::mixed()).await;
//!
//!     // Use provider.uri() as the provider base URL
//! }
//! ```

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock OpenRouter server wrapper
pub struct MockOpenRouter {
    server: MockServer,
}

impl MockOpenRouter {
    /// Start a new mock provider server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// All requests received so far
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received on `request_path`
    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.received_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    // =========================================================================
    // GET /models - Model catalog
    // =========================================================================

    /// Serve `entries` as the catalog for any credential
    pub async fn mock_models(&self, entries: Value) {
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": entries })))
            .mount(&self.server)
            .await;
    }

    /// Serve `entries` only to requests bearing `api_key`
    pub async fn mock_models_for_key(&self, api_key: &str, entries: Value) {
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("Authorization", format!("Bearer {}", api_key).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": entries })))
            .mount(&self.server)
            .await;
    }

    /// Catalog request fails with `status`
    pub async fn mock_models_error(&self, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body(message)))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // POST /chat/completions - Chat completions
    // =========================================================================

    /// Successful completion with the given text and usage
    pub async fn mock_chat_completion(
        &self,
        content: &str,
        model: &str,
        prompt_tokens: u64,
        completion_tokens: u64,
    ) {
        self.mock_chat_completion_raw(json!({
            "id": "gen-test-1",
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": prompt_tokens,
                "completion_tokens": completion_tokens,
                "total_tokens": prompt_tokens + completion_tokens
            }
        }))
        .await;
    }

    /// Completion with an arbitrary body
    pub async fn mock_chat_completion_raw(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Completion fails with the provider's error payload
    pub async fn mock_chat_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body(message)))
            .mount(&self.server)
            .await;
    }

    /// Completion fails with a non-JSON body
    pub async fn mock_chat_error_text(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // POST /images/generations - Image generation
    // =========================================================================

    /// Successful generation returning one image URL
    pub async fn mock_image(&self, url: &str) {
        self.mock_image_raw(json!({ "data": [{ "url": url }] })).await;
    }

    /// Generation with an arbitrary body
    pub async fn mock_image_raw(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Generation fails with an empty error object
    pub async fn mock_image_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": {} })))
            .mount(&self.server)
            .await;
    }
}

/// Provider error payload
pub fn error_body(message: &str) -> Value {
    json!({ "error": { "message": message, "code": 400 } })
}

/// Catalog fixtures
pub struct CatalogFixtures;

impl CatalogFixtures {
    /// Four free models (one per non-empty tier) plus two priced ones
    ///
    /// Free entries classify as: ultra gpt-5-mini, fast llama-3.1-8b,
    /// normal vision-model, slow tiny-chat.
    pub fn mixed() -> Value {
        json!([
            {
                "id": "openai/gpt-5-mini:free",
                "name": "GPT-5 Mini (free)",
                "context_length": 128000,
                "architecture": {"modality": "text->text"},
                "pricing": {"prompt": "0", "completion": "0"}
            },
            {
                "id": "anthropic/claude-sonnet-4",
                "name": "Claude Sonnet 4",
                "context_length": 200000,
                "pricing": {"prompt": "0.000003", "completion": "0.000015"}
            },
            {
                "id": "meta-llama/llama-3.1-8b-instruct:free",
                "name": "Llama 3.1 8B Instruct (free)",
                "context_length": 131072,
                "architecture": {"modality": "text->text"},
                "pricing": {"prompt": "0", "completion": "0"},
                "created": 1721692800
            },
            {
                "id": "vendor/half-price",
                "name": "Half Price",
                "pricing": {"prompt": "0", "completion": "0.000001"}
            },
            {
                "id": "vendor/vision-model:free",
                "name": "Vision Model",
                "context_length": 64000,
                "architecture": {"modality": "text+image->text"},
                "pricing": {"prompt": "0", "completion": "0"}
            },
            {
                "id": "vendor/tiny-chat:free",
                "name": "Tiny Chat",
                "pricing": {"prompt": "0", "completion": "0"}
            }
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_models_serves_catalog() {
        let provider = MockOpenRouter::start().await;
        provider.mock_models(CatalogFixtures::mixed()).await;

        let body: Value = reqwest::get(format!("{}/models", provider.uri()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["data"].as_array().unwrap().len(), 6);
        assert_eq!(provider.requests_to("/models").await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_models_error() {
        let provider = MockOpenRouter::start().await;
        provider.mock_models_error(503, "Overloaded").await;

        let response = reqwest::get(format!("{}/models", provider.uri()))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 503);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["message"], "Overloaded");
    }
}
