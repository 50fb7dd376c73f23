//! Provider model catalog
//!
//! Fetches the provider's model list, keeps the zero-cost entries and maps
//! them into descriptors for tier classification.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    error::AppResult,
    proxy::ChatProvider,
    tiers::{classifier::matches_query, ModelDescriptor, TierBucketing, TierClassifier},
};

/// Context length assumed when the catalog omits one
pub const DEFAULT_CONTEXT_LENGTH: u32 = 8192;

/// Number of entries offered by the legacy picker when nothing is free
pub const LEGACY_FALLBACK_COUNT: usize = 10;

/// Price marker for zero-cost models
const FREE_PRICE: &str = "0";

/// Per-token pricing as reported by the provider (decimal strings)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Model architecture block; only `modality` is interpreted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the provider catalog
///
/// Fields the relay does not interpret are kept in `extra` and
/// re-serialized unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogModel {
    fn prompt_price(&self) -> Option<&str> {
        self.pricing.as_ref()?.prompt.as_deref()
    }

    fn completion_price(&self) -> Option<&str> {
        self.pricing.as_ref()?.completion.as_deref()
    }

    /// Both prompt and completion are priced at zero
    pub fn is_free(&self) -> bool {
        self.prompt_price() == Some(FREE_PRICE) && self.completion_price() == Some(FREE_PRICE)
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    /// "vision" when the declared modality mentions images, else "text"
    pub fn capability(&self) -> &'static str {
        let is_vision = self
            .architecture
            .as_ref()
            .and_then(|a| a.modality.as_deref())
            .is_some_and(|m| m.contains("image"));

        if is_vision {
            "vision"
        } else {
            "text"
        }
    }

    /// Map into a classifier descriptor, applying defaults
    pub fn to_descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            id: self.id.clone(),
            name: self.display_name().to_string(),
            provider: self.capability().to_string(),
            context_length: self
                .context_length
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_CONTEXT_LENGTH),
        }
    }
}

/// Convert raw catalog entries one by one
///
/// Entries that do not fit [`CatalogModel`] are skipped with a warning
/// instead of failing the whole listing.
pub fn parse_catalog_entries(raw: Vec<Value>) -> Vec<CatalogModel> {
    raw.into_iter()
        .filter_map(|entry| {
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("<missing id>")
                .to_string();
            match serde_json::from_value::<CatalogModel>(entry) {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping malformed catalog entry");
                    None
                }
            }
        })
        .collect()
}

/// A free model as listed by the categorized endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedModel {
    #[serde(flatten)]
    pub model: ModelDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
}

/// Free models and their tier bucketing
#[derive(Debug, Clone, Default)]
pub struct CategorizedCatalog {
    pub models: Vec<ListedModel>,
    pub buckets: TierBucketing,
}

impl CategorizedCatalog {
    /// Keep only models whose id or name contains `query`, ignoring case
    pub fn filter(self, query: &str) -> Self {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }

        Self {
            buckets: self.buckets.filter(&needle),
            models: self
                .models
                .into_iter()
                .filter(|m| matches_query(&m.model, &needle))
                .collect(),
        }
    }
}

/// Entry of the user-key model picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyModel {
    pub id: String,
    pub name: String,
    pub architecture: Architecture,
}

impl From<&CatalogModel> for LegacyModel {
    fn from(model: &CatalogModel) -> Self {
        Self {
            id: model.id.clone(),
            name: model.display_name().to_string(),
            architecture: model.architecture.clone().unwrap_or_default(),
        }
    }
}

/// Select models for the user-key picker
///
/// Keeps entries with a zero prompt or completion price, skipping ids that
/// mention "free" or "gpt-4". When nothing qualifies, the head of the
/// catalog is offered instead.
pub fn select_legacy_models(entries: &[CatalogModel]) -> Vec<LegacyModel> {
    let selected: Vec<LegacyModel> = entries
        .iter()
        .filter(|m| {
            (m.prompt_price() == Some(FREE_PRICE) || m.completion_price() == Some(FREE_PRICE))
                && !m.id.contains("free")
                && !m.id.contains("gpt-4")
        })
        .map(LegacyModel::from)
        .collect();

    if !selected.is_empty() {
        return selected;
    }

    entries
        .iter()
        .take(LEGACY_FALLBACK_COUNT)
        .map(LegacyModel::from)
        .collect()
}

/// Listing service over the provider catalog
pub struct ModelCatalog {
    provider: Arc<dyn ChatProvider>,
    classifier: Arc<TierClassifier>,
}

impl ModelCatalog {
    pub fn new(provider: Arc<dyn ChatProvider>, classifier: Arc<TierClassifier>) -> Self {
        Self {
            provider,
            classifier,
        }
    }

    /// Zero-cost catalog entries, as returned by the provider
    pub async fn free_models(&self, api_key: &str) -> AppResult<Vec<CatalogModel>> {
        let entries = self.provider.list_models(api_key).await?;
        let total = entries.len();

        let free: Vec<CatalogModel> = entries.into_iter().filter(CatalogModel::is_free).collect();
        debug!(total, free = free.len(), "Filtered catalog to free models");
        Ok(free)
    }

    /// Zero-cost models mapped to descriptors and bucketed by tier
    pub async fn categorized(&self, api_key: &str) -> AppResult<CategorizedCatalog> {
        let free = self.free_models(api_key).await?;

        let models: Vec<ListedModel> = free
            .iter()
            .map(|m| ListedModel {
                model: m.to_descriptor(),
                pricing: m.pricing.clone(),
            })
            .collect();

        let buckets = self
            .classifier
            .classify_all(models.iter().map(|m| m.model.clone()));

        Ok(CategorizedCatalog { models, buckets })
    }

    /// Models for the user-key picker
    pub async fn legacy_models(&self, api_key: &str) -> AppResult<Vec<LegacyModel>> {
        let entries = self.provider.list_models(api_key).await?;
        Ok(select_legacy_models(&entries))
    }
}
