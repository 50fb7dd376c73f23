//! Provider abstraction layer
//!
//! Defines the trait interface for the hosted model-routing API and the
//! request/response shapes exchanged with it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogModel;
use crate::error::AppResult;

/// Image size requested from the provider
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role/content turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Chat completion request sent upstream
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
}

/// Token usage reported by the provider
///
/// Unknown fields (cost, cache statistics) are kept so they can be relayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Chat completion response from the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Text of the first choice, if it has any
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Image generation request sent upstream
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
}

impl ImageRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
}

/// Image generation response from the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

impl ImageResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.data.first().and_then(|d| d.url.as_deref())
    }
}

/// Model catalog listing as returned by the provider
///
/// Entries stay untyped here so one malformed entry cannot sink the list;
/// see [`crate::catalog::parse_catalog_entries`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

/// Trait defining the interface for the upstream provider
///
/// Every call carries the credential explicitly; implementations hold no
/// per-caller state.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Get the provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Fetch the full model catalog
    async fn list_models(&self, api_key: &str) -> AppResult<Vec<CatalogModel>>;

    /// Chat completion (non-streaming)
    async fn chat_completion(&self, api_key: &str, request: &ChatRequest)
        -> AppResult<ChatCompletion>;

    /// Image generation
    async fn generate_image(&self, api_key: &str, request: &ImageRequest)
        -> AppResult<ImageResponse>;
}
