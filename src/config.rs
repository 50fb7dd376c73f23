//! Configuration management for Tiergate
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Prefix every provider key is expected to carry
pub const API_KEY_PREFIX: &str = "sk-or-";

/// A model configured by the operator in addition to the provider catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredModel {
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Provider API base URL
    pub openrouter_api_url: String,
    /// Operator-provided provider keys
    pub api_keys: Vec<String>,

    /// Extra models listed next to the provider catalog
    pub custom_models: Vec<ConfiguredModel>,

    /// Accept keys supplied by callers instead of the configured pool
    pub allow_user_api_keys: bool,
    /// Enable the image generation endpoint
    pub image_generation_enabled: bool,

    /// Upstream request timeout (in seconds)
    pub request_timeout_seconds: u64,

    /// Optional JSON file replacing the built-in tier keyword tables
    pub tier_keywords_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(default)
        };

        let custom_models = match lookup("TIERGATE_CUSTOM_MODELS") {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .context("Invalid TIERGATE_CUSTOM_MODELS")?,
            _ => Vec::new(),
        };

        Ok(Self {
            host: lookup("TIERGATE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("TIERGATE_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid TIERGATE_PORT")?,

            openrouter_api_url: lookup("OPENROUTER_API_URL")
                .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            api_keys: lookup("OPENROUTER_API_KEYS")
                .map(|raw| parse_key_list(&raw))
                .unwrap_or_default(),

            custom_models,

            allow_user_api_keys: flag("TIERGATE_ALLOW_USER_API_KEYS", false),
            image_generation_enabled: flag("TIERGATE_IMAGE_GENERATION", true),

            request_timeout_seconds: lookup("TIERGATE_REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "120".to_string())
                .parse()
                .context("Invalid TIERGATE_REQUEST_TIMEOUT_SECONDS")?,

            tier_keywords_path: lookup("TIERGATE_TIER_KEYWORDS")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Keys that are actually usable
    pub fn enabled_api_keys(&self) -> Vec<&str> {
        self.api_keys
            .iter()
            .map(String::as_str)
            .filter(|k| !k.is_empty())
            .collect()
    }

    pub fn has_configured_api_keys(&self) -> bool {
        !self.enabled_api_keys().is_empty()
    }

    /// Pick a configured key uniformly at random to spread load
    pub fn random_api_key(&self) -> Option<&str> {
        self.enabled_api_keys().choose(&mut rand::rng()).copied()
    }

    pub fn enabled_custom_models(&self) -> Vec<ConfiguredModel> {
        self.custom_models
            .iter()
            .filter(|m| m.enabled)
            .cloned()
            .collect()
    }
}

/// Split a comma separated key list, dropping blanks
fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cheap format check for provider keys
pub fn is_valid_api_key(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX) && key.len() > 10
}
