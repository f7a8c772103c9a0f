//! Client configuration

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the backend base URL
pub const ENV_BACKEND_URL: &str = "STOCK_BACKEND_URL";
/// Environment variable holding the public (anon) API key
pub const ENV_ANON_KEY: &str = "STOCK_ANON_KEY";
/// Environment variable holding a pre-issued access token
pub const ENV_ACCESS_TOKEN: &str = "STOCK_ACCESS_TOKEN";
/// Environment variable overriding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "STOCK_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the inventory backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://project.example.co")
    pub base_url: String,

    /// Public API key sent as `apikey` on every request
    pub anon_key: String,

    /// Access token of the signed-in user
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// `STOCK_BACKEND_URL` and `STOCK_ANON_KEY` are required;
    /// `STOCK_ACCESS_TOKEN` and `STOCK_TIMEOUT_SECS` are optional.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, file, test map)
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BACKEND_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Config(format!("{ENV_BACKEND_URL} is not set")))?;
        let anon_key = lookup(ENV_ANON_KEY)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Config(format!("{ENV_ANON_KEY} is not set")))?;

        let mut config = Self::new(base_url, anon_key);

        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.trim().is_empty()) {
            config = config.with_token(token);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let seconds = raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got {raw:?}"))
            })?;
            config = config.with_timeout(seconds);
        }

        Ok(config)
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_rest_client(&self) -> ClientResult<super::RestClient> {
        super::RestClient::new(self)
    }
}
