//! Chat endpoint
//!
//! Relays a conversation to the provider and returns the first completion.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    proxy::provider::{ChatRequest, ChatTurn, Usage},
    routes::{
        metrics::{record_request, record_tokens},
        non_empty, parse_body, resolve_api_key,
    },
    AppState,
};

/// Placeholder returned when the provider sends no text
pub const EMPTY_COMPLETION: &str = "No response";

/// Chat request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatTurn>>,
}

/// Chat reply
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Handle chat requests
///
/// Upstream failures are terminal and surface with the provider's status.
pub async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Json<ChatReply>> {
    let start_time = Instant::now();
    let body: ChatBody = parse_body(&body)?;

    let missing = || AppError::BadRequest("Missing required fields".to_string());
    let model = non_empty(body.model).ok_or_else(missing)?;
    let messages = body.messages.ok_or_else(missing)?;
    let api_key = resolve_api_key(&state.config, body.api_key)?.ok_or_else(missing)?;

    info!(model = %model, turns = messages.len(), "Processing chat request");

    let request = ChatRequest {
        model: model.clone(),
        messages,
    };

    let completion = match state.provider.chat_completion(&api_key, &request).await {
        Ok(completion) => completion,
        Err(e) => {
            warn!(model = %model, error = %e, "Chat request failed");
            record_request("chat", "error", &model, start_time.elapsed().as_secs_f64());
            return Err(e);
        }
    };

    let duration = start_time.elapsed().as_secs_f64();
    record_request("chat", "success", &model, duration);

    if let Some(ref usage) = completion.usage {
        record_tokens("prompt", usage.prompt_tokens, &model);
        record_tokens("completion", usage.completion_tokens, &model);
    }

    info!(
        model = %model,
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Chat request completed"
    );

    let content = completion
        .content()
        .unwrap_or(EMPTY_COMPLETION)
        .to_string();

    Ok(Json(ChatReply {
        content,
        model: completion.model,
        usage: completion.usage,
    }))
}
