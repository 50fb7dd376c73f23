//! OpenRouter provider client
//!
//! HTTP client for the hosted model-routing API.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{
    catalog::{parse_catalog_entries, CatalogModel},
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        headers::{build_default_headers, key_fingerprint},
        provider::{
            ChatCompletion, ChatProvider, ChatRequest, ImageRequest, ImageResponse, ModelList,
        },
    },
};

/// Provider error payload, `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
struct ProviderErrorPayload {
    error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Pull `error.message` out of a provider error body, if there is one
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ProviderErrorPayload>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.is_empty())
}

/// OpenRouter API client
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openrouter_api_url.clone(),
        }
    }

    /// Make a GET request to the provider
    async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        api_key: &str,
        fallback: &str,
    ) -> AppResult<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending GET to provider");

        let response = self
            .client
            .get(&url)
            .headers(build_default_headers(api_key)?)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Failed to send request to provider");
                e
            })?;

        Self::read_json(response, &url, fallback).await
    }

    /// Make a POST request to the provider
    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        api_key: &str,
        body: &T,
        fallback: &str,
    ) -> AppResult<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending POST to provider");

        let response = self
            .client
            .post(&url)
            .headers(build_default_headers(api_key)?)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Failed to send request to provider");
                e
            })?;

        Self::read_json(response, &url, fallback).await
    }

    /// Turn a provider response into a typed body or an upstream error
    ///
    /// Non-2xx statuses are relayed with the provider's `error.message`,
    /// or `fallback` when the payload carries none.
    async fn read_json<R: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
        fallback: &str,
    ) -> AppResult<R> {
        let status = response.status();
        debug!(url = %url, status = %status, "Provider response status");

        let body = response.text().await?;

        if !status.is_success() {
            error!(url = %url, status = %status, body = %body, "Provider request failed");
            return Err(AppError::Upstream {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                message: extract_error_message(&body).unwrap_or_else(|| fallback.to_string()),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(url = %url, error = %e, "Failed to parse provider response");
            AppError::from(e)
        })
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    #[instrument(skip(self, api_key), fields(key = %key_fingerprint(api_key)))]
    async fn list_models(&self, api_key: &str) -> AppResult<Vec<CatalogModel>> {
        let list: ModelList = self
            .get("/models", api_key, "Failed to fetch models")
            .await?;

        let received = list.data.len();
        let models = parse_catalog_entries(list.data);
        debug!(received, parsed = models.len(), "Fetched model catalog");
        Ok(models)
    }

    #[instrument(
        skip(self, api_key, request),
        fields(key = %key_fingerprint(api_key), model = %request.model, turns = request.messages.len())
    )]
    async fn chat_completion(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> AppResult<ChatCompletion> {
        self.post("/chat/completions", api_key, request, "API request failed")
            .await
    }

    #[instrument(
        skip(self, api_key, request),
        fields(key = %key_fingerprint(api_key), model = %request.model)
    )]
    async fn generate_image(
        &self,
        api_key: &str,
        request: &ImageRequest,
    ) -> AppResult<ImageResponse> {
        self.post(
            "/images/generations",
            api_key,
            request,
            "Image generation failed",
        )
        .await
    }
}
