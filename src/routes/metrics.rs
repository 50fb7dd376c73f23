//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

use crate::tiers::TierBucketing;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "tiergate_requests_total",
        "Total number of relayed requests"
    );
    metrics::describe_histogram!(
        "tiergate_request_duration_seconds",
        "Upstream round-trip duration in seconds"
    );
    metrics::describe_counter!(
        "tiergate_tokens_processed_total",
        "Total tokens reported by the provider"
    );
    metrics::describe_gauge!(
        "tiergate_tier_models",
        "Number of free models per tier in the last listing"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a relayed request
pub fn record_request(route: &str, status: &str, model: &str, duration_secs: f64) {
    metrics::counter!(
        "tiergate_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string(),
        "model" => model.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "tiergate_request_duration_seconds",
        "route" => route.to_string(),
        "model" => model.to_string()
    )
    .record(duration_secs);
}

/// Record tokens processed
pub fn record_tokens(token_type: &str, count: u64, model: &str) {
    metrics::counter!(
        "tiergate_tokens_processed_total",
        "type" => token_type.to_string(),
        "model" => model.to_string()
    )
    .increment(count);
}

/// Publish bucket sizes of the latest listing
pub fn record_tier_sizes(buckets: &TierBucketing) {
    for (tier, models) in buckets.iter() {
        metrics::gauge!("tiergate_tier_models", "tier" => tier.as_str())
            .set(models.len() as f64);
    }
}
