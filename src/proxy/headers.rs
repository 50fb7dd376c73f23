//! Header utilities for provider requests
//!
//! Builds the outbound header set and a log-safe fingerprint for
//! provider credentials.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Build default headers for provider requests
///
/// Only the credential and content type are sent; nothing from the
/// incoming client request is forwarded.
pub fn build_default_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|_| AppError::BadRequest("Invalid API key".to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

/// Short SHA-256 fingerprint of a credential, safe to log
pub fn key_fingerprint(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}
