//! Proxy module
//!
//! Handles request forwarding to the upstream provider.

pub mod headers;
pub mod openrouter;
pub mod provider;

pub use openrouter::OpenRouterClient;
pub use provider::ChatProvider;
