//! Models endpoints
//!
//! Lists the provider's free models, bucketed by performance tier.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    catalog::{CatalogModel, CategorizedCatalog, LegacyModel, ListedModel},
    config::ConfiguredModel,
    error::{AppError, AppResult},
    routes::{metrics::record_tier_sizes, non_empty, parse_body},
    tiers::TierBucketing,
    AppState,
};

/// Query parameters for the categorized listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter on id or name
    #[serde(default)]
    pub q: Option<String>,
}

/// Categorized listing response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedResponse {
    pub models: Vec<ListedModel>,
    pub categorized_models: TierBucketing,
    pub custom_models: Vec<ConfiguredModel>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategorizedResponse {
    fn new(catalog: CategorizedCatalog, custom_models: Vec<ConfiguredModel>) -> Self {
        Self {
            total: catalog.models.len() + custom_models.len(),
            models: catalog.models,
            categorized_models: catalog.buckets,
            custom_models,
            error: None,
        }
    }

    /// Empty listing carrying only the operator's custom models
    fn degraded(custom_models: Vec<ConfiguredModel>, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(CategorizedCatalog::default(), custom_models)
        }
    }
}

/// Free model listing response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeModelsResponse {
    pub models: Vec<CatalogModel>,
    pub total: usize,
    pub last_updated: String,
}

/// User-key picker request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBody {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// User-key picker response
#[derive(Debug, Serialize)]
pub struct LegacyModelsResponse {
    pub models: Vec<LegacyModel>,
}

/// List free models grouped by tier
///
/// Always answers 200: catalog failures degrade to the custom models with
/// an `error` message.
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<CategorizedResponse> {
    let custom_models = state.config.enabled_custom_models();

    let Some(api_key) = state.config.random_api_key() else {
        warn!("Categorized listing requested without configured API keys");
        return Json(CategorizedResponse::degraded(
            custom_models,
            "No API keys configured".to_string(),
        ));
    };

    let catalog = match state.catalog.categorized(api_key).await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, "Failed to fetch models, returning custom models only");
            return Json(CategorizedResponse::degraded(custom_models, e.public_message()));
        }
    };
    record_tier_sizes(&catalog.buckets);

    let catalog = match non_empty(query.q) {
        Some(q) => catalog.filter(&q),
        None => catalog,
    };

    info!(
        models = catalog.models.len(),
        custom_models = custom_models.len(),
        "Listed categorized models"
    );

    Json(CategorizedResponse::new(catalog, custom_models))
}

/// List free catalog entries verbatim
pub async fn list_free(State(state): State<Arc<AppState>>) -> AppResult<Json<FreeModelsResponse>> {
    let api_key = state
        .config
        .random_api_key()
        .ok_or_else(|| AppError::Configuration("No API key configured".to_string()))?;

    let models = state.catalog.free_models(api_key).await?;

    Ok(Json(FreeModelsResponse {
        total: models.len(),
        models,
        last_updated: Utc::now().to_rfc3339(),
    }))
}

/// List models for a caller-supplied key
pub async fn list_for_key(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<LegacyModelsResponse>> {
    let body: KeyBody = parse_body(&body)?;
    let api_key = non_empty(body.api_key)
        .ok_or_else(|| AppError::BadRequest("API key required".to_string()))?;

    let models = state
        .catalog
        .legacy_models(&api_key)
        .await
        .map_err(|e| match e {
            AppError::Upstream { status, .. } => AppError::Upstream {
                status,
                message: "Failed to fetch models".to_string(),
            },
            other => other,
        })?;

    Ok(Json(LegacyModelsResponse { models }))
}
