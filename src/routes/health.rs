//! Health check endpoints
//!
//! Provides endpoints for monitoring and container orchestration:
//! - `/health` - Full health check with credential status
//! - `/health/ready` - Readiness probe
//! - `/health/live` - Liveness probe

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{config::Config, AppState};

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Credential availability
#[derive(Debug, Serialize)]
pub struct CredentialCheck {
    pub status: HealthStatus,
    pub configured_keys: usize,
    pub user_keys_allowed: bool,
}

/// Dependency checks collection
#[derive(Debug, Serialize)]
pub struct DependencyChecks {
    pub credentials: CredentialCheck,
}

/// Application statistics
#[derive(Debug, Serialize)]
pub struct HealthStats {
    pub uptime_seconds: u64,
    pub custom_models: usize,
    pub image_generation_enabled: bool,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub checks: DependencyChecks,
    pub stats: HealthStats,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Pool keys make the relay healthy; caller keys alone leave it degraded
fn check_credentials(config: &Config) -> CredentialCheck {
    let configured_keys = config.enabled_api_keys().len();

    let status = if configured_keys > 0 {
        HealthStatus::Healthy
    } else if config.allow_user_api_keys {
        HealthStatus::Degraded
    } else {
        HealthStatus::Unhealthy
    };

    CredentialCheck {
        status,
        configured_keys,
        user_keys_allowed: config.allow_user_api_keys,
    }
}

fn status_code(status: &HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Full health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let credentials = check_credentials(&state.config);
    let overall_status = credentials.status.clone();
    let uptime = state.start_time.elapsed().as_secs();

    let response = HealthResponse {
        status: overall_status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: DependencyChecks { credentials },
        stats: HealthStats {
            uptime_seconds: uptime,
            custom_models: state.config.enabled_custom_models().len(),
            image_generation_enabled: state.config.image_generation_enabled,
        },
    };

    (status_code(&overall_status), Json(response))
}

/// Readiness probe endpoint
///
/// Returns 200 OK when some credential source is available.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    let status = check_credentials(&state.config).status;
    (status_code(&status), Json(SimpleHealthResponse { status }))
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
