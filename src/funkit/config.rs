use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.fun.xyz/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Funkit asset API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the asset API
    pub api_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
