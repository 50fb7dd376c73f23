//! Image generation endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    proxy::provider::ImageRequest,
    routes::{metrics::record_request, non_empty, parse_body, resolve_api_key},
    AppState,
};

/// Image request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Prompt text
    #[serde(default)]
    pub message: Option<String>,
}

/// Image reply; `content` is the first image URL or empty
#[derive(Debug, Serialize)]
pub struct ImageReply {
    pub content: String,
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<ImageReply>> {
    if !state.config.image_generation_enabled {
        return Err(AppError::Forbidden(
            "Image generation is disabled".to_string(),
        ));
    }

    let start_time = Instant::now();
    let body: ImageBody = parse_body(&body)?;

    let missing = || AppError::BadRequest("Missing required fields".to_string());
    let model = non_empty(body.model).ok_or_else(missing)?;
    let prompt = non_empty(body.message).ok_or_else(missing)?;
    let api_key = resolve_api_key(&state.config, body.api_key)?.ok_or_else(missing)?;

    info!(model = %model, prompt_len = prompt.len(), "Processing image request");

    let request = ImageRequest::new(model.clone(), prompt);
    let result = state.provider.generate_image(&api_key, &request).await;

    let duration = start_time.elapsed().as_secs_f64();
    let images = match result {
        Ok(images) => images,
        Err(e) => {
            warn!(model = %model, error = %e, "Image request failed");
            record_request("image", "error", &model, duration);
            return Err(e);
        }
    };
    record_request("image", "success", &model, duration);

    Ok(Json(ImageReply {
        content: images.first_url().unwrap_or_default().to_string(),
    }))
}
