//! Client configuration.
//!
//! A `ClientConfig` can be built in code or loaded from environment
//! variables. Loading `.env` files is left to the binary.

use std::fmt;
use std::time::Duration;

/// Production endpoint of the personalization service.
pub const DEFAULT_BASE_URL: &str = "https://api.xayn.com";

pub const ENV_API_KEY: &str = "XAYN_API_KEY";
pub const ENV_USER_ID: &str = "XAYN_USER_ID";
pub const ENV_BASE_URL: &str = "XAYN_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "XAYN_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Everything needed to construct a `XaynClient`.
#[derive(Clone)]
pub struct ClientConfig {
    pub user_id: String,
    pub api_key: String,
    pub base_url: String,
    /// Request timeout handed to the transport. `None` keeps its default.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("user_id", &self.user_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
        };

        let api_key = required(ENV_API_KEY)?;
        let user_id = required(ENV_USER_ID)?;
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue(ENV_TIMEOUT_SECS.to_string(), e.to_string())
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            user_id,
            api_key,
            base_url,
            timeout,
        })
    }
}
