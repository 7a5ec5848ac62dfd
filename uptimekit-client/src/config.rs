//! Client configuration.
//!
//! A [`ClientConfig`] is built once and handed to the
//! [`RequestExecutor`](crate::RequestExecutor), which owns it read-only for
//! the rest of its life. Concurrent calls share it without locking.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ClientError;
use crate::retry::BackoffPolicy;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.uptimerobot.com/v3";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent identifying this integration and its version.
pub const USER_AGENT: &str = concat!("uptimekit/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Client Config
// ============================================================================

/// Everything the executor needs to reach the API.
#[derive(Clone)]
pub struct ClientConfig {
    /// API root; resource paths are appended to it.
    pub base_url: Url,
    api_key: String,
    /// Extra headers sent on every request, in order.
    pub default_headers: Vec<(String, String)>,
    /// Per-exchange timeout enforced by the transport.
    pub timeout: Duration,
    /// Retry policy for idempotent calls.
    pub backoff: BackoffPolicy,
}

impl ClientConfig {
    /// Creates a builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the credential sent as a bearer token.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .field("backoff", &self.backoff)
            .finish()
    }
}

// ============================================================================
// Client Config Builder
// ============================================================================

/// Builder for constructing a `ClientConfig`.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    api_key: Option<String>,
    user_agent: String,
    default_headers: Vec<(String, String)>,
    timeout: Duration,
    backoff: BackoffPolicy,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            user_agent: USER_AGENT.to_string(),
            default_headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            backoff: BackoffPolicy::default(),
        }
    }

    /// Sets the API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the credential.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replaces the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Appends a default header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Sets the per-exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the total attempt cap for idempotent calls.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.backoff.max_attempts = attempts.max(1);
        self
    }

    /// Sets the base backoff delay.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.backoff.base_delay = delay;
        self
    }

    /// Sets the whole backoff policy.
    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Validates and builds the config.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let base_url = Url::parse(self.base_url.trim())
            .map_err(|e| ClientError::InvalidConfig(format!("base URL {:?}: {e}", self.base_url)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must be http or https, got {}",
                base_url.scheme()
            )));
        }

        let api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClientError::InvalidConfig("API key is required".to_string()))?;

        let mut default_headers = Vec::with_capacity(self.default_headers.len() + 1);
        if !self
            .default_headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
        {
            default_headers.push(("User-Agent".to_string(), self.user_agent));
        }
        default_headers.extend(self.default_headers);

        Ok(ClientConfig {
            base_url,
            api_key,
            default_headers,
            timeout: self.timeout,
            backoff: self.backoff,
        })
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
