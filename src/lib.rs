//! Tiergate - Chat relay with performance-tier model listings
//!
//! This library provides the core functionality for the Tiergate server.
//! It relays chat and image requests to a hosted model-routing API and
//! groups the provider's free models into display tiers.

pub mod catalog;
pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod tiers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

pub use crate::catalog::ModelCatalog;
pub use crate::config::Config;
pub use crate::proxy::{ChatProvider, OpenRouterClient};
pub use crate::tiers::{KeywordTables, TierClassifier};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Upstream provider for chat, image and catalog calls
    pub provider: Arc<dyn ChatProvider>,
    /// Free-model listing and tier bucketing
    pub catalog: ModelCatalog,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        let provider: Arc<dyn ChatProvider> =
            Arc::new(OpenRouterClient::new(http_client, &config));

        let tables = match &config.tier_keywords_path {
            Some(path) => {
                info!(path = %path.display(), "Loading tier keyword tables");
                KeywordTables::from_json_file(path)?
            }
            None => KeywordTables::default(),
        };

        Ok(Self::with_provider(config, provider, TierClassifier::new(tables)))
    }

    /// Create application state around an existing provider
    pub fn with_provider(
        config: Config,
        provider: Arc<dyn ChatProvider>,
        classifier: TierClassifier,
    ) -> Self {
        let catalog = ModelCatalog::new(provider.clone(), Arc::new(classifier));

        Self {
            config,
            start_time: Instant::now(),
            provider,
            catalog,
        }
    }
}
