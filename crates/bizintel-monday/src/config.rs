//! monday.com client configuration

use serde::{Deserialize, Serialize};

/// Default GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

/// Largest page `items_page` accepts.
pub const MAX_PAGE_SIZE: u32 = 500;

/// monday.com API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MondayConfig {
    /// GraphQL endpoint URL
    pub api_url: String,
    /// Personal or app API token
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Items requested per page (capped at [`MAX_PAGE_SIZE`])
    pub page_size: u32,
}

impl Default for MondayConfig {
    fn default() -> Self {
        MondayConfig {
            api_url: std::env::var("MONDAY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var("MONDAY_API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            timeout_secs: std::env::var("MONDAY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl MondayConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific endpoint
    pub fn new(api_url: &str) -> Self {
        MondayConfig {
            api_url: api_url.to_string(),
            token: None,
            timeout_secs: 30,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set page size; clamped to `1..=MAX_PAGE_SIZE`
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = MondayConfig::new("http://localhost:8080/v2").with_token("abc");
        assert_eq!(config.api_url, "http://localhost:8080/v2");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let config = MondayConfig::new(DEFAULT_API_URL).with_page_size(10_000);
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        let config = config.with_page_size(0);
        assert_eq!(config.page_size, 1);
    }
}
