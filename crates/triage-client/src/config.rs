//! Service configuration shared by all collaborator calls.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default service base address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default development credential
pub const DEFAULT_API_KEY: &str = "dev-key-change";

/// Header carrying the static credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Immutable connection settings, loaded once and passed to the client
///
/// # Examples
///
/// ```
/// use triage_client::ServiceConfig;
///
/// let config = ServiceConfig::new("http://triage.local:8000/", "secret");
/// assert_eq!(config.endpoint("/asr"), "http://triage.local:8000/asr");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base address of the services (e.g., "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Static credential sent in the `X-API-Key` header
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Request timeout in seconds; unset means the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

impl ServiceConfig {
    /// Create a configuration with no timeout override
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: None,
        }
    }

    /// Set a request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Full URL for a service path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.api_key.is_empty() {
            return Err(ClientError::Config("api_key must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_API_KEY)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
