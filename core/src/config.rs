//! Client configuration.

use std::time::Duration;

/// API root of the public crates.io registry.
pub const DEFAULT_BASE_URL: &str = "https://crates.io/api/v1/";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Global per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("registry-check/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}
