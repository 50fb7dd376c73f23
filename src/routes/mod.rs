//! HTTP routes for Tiergate
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod health;
pub mod images;
pub mod metrics;
pub mod models;
pub mod tiers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{is_valid_api_key, Config},
    error::{AppError, AppResult},
    AppState,
};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/generate-image", post(images::generate_image))
        .route("/api/models", post(models::list_for_key))
        .route("/api/models/all", get(models::list_all))
        .route("/api/models/free", get(models::list_free))
        .route("/api/tiers", get(tiers::list_tiers));

    // Public routes (health checks, metrics)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Parse a JSON request body, reporting failures as 400
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Treat empty strings as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pick the credential for an upstream call
///
/// A caller-supplied key is honored only when user keys are allowed, and
/// must then look like a provider key. Otherwise a key is drawn from the
/// configured pool. `Ok(None)` means no credential is available.
pub(crate) fn resolve_api_key(config: &Config, supplied: Option<String>) -> AppResult<Option<String>> {
    if config.allow_user_api_keys {
        if let Some(key) = non_empty(supplied) {
            if !is_valid_api_key(&key) {
                return Err(AppError::BadRequest("Invalid API key format".to_string()));
            }
            return Ok(Some(key));
        }
    }

    Ok(config.random_api_key().map(str::to_string))
}
