//! Layered CLI settings.
//!
//! Precedence, lowest first: built-in defaults, `settings.json` in the
//! platform config dir, environment variables, command-line flags. The last
//! two are resolved by clap before they get here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uptimekit_client::{ClientConfig, DEFAULT_BASE_URL};
use uptimekit_core::{REDACTION_MARKER, is_sensitive_key};

// ============================================================================
// Paths
// ============================================================================

/// Returns the default config directory.
///
/// - macOS: `~/Library/Application Support/UptimeKit`
/// - Linux: `~/.config/uptimekit`
/// - Windows: `%APPDATA%\uptimekit`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("UptimeKit"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("uptimekit"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

// ============================================================================
// Settings
// ============================================================================

/// Persisted client settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// API credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API root URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-exchange timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Attempts per idempotent call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Base backoff delay in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_delay_ms: Option<u64>,
    /// Extra headers sent on every request.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Settings {
    /// Loads settings from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Applies values from the environment or the command line.
    pub fn with_overrides(mut self, api_key: Option<&str>, base_url: Option<&str>) -> Self {
        if let Some(key) = api_key {
            self.api_key = Some(key.to_string());
        }
        if let Some(url) = base_url {
            self.base_url = Some(url.to_string());
        }
        self
    }

    /// Returns the base URL in effect.
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Returns a copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api_key.is_some() {
            copy.api_key = Some(REDACTION_MARKER.to_string());
        }
        for (name, value) in &mut copy.headers {
            if is_sensitive_key(name) {
                *value = REDACTION_MARKER.to_string();
            }
        }
        copy
    }

    /// Builds a validated client config.
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let api_key = self.api_key.as_deref().context(
            "No API key configured. Pass --api-key, set UPTIMEKIT_API_KEY, or add api_key to settings.json",
        )?;

        let mut builder = ClientConfig::builder()
            .api_key(api_key)
            .base_url(self.effective_base_url());

        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = self.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        if let Some(ms) = self.base_delay_ms {
            builder = builder.base_delay(Duration::from_millis(ms));
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_settings(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_settings(
            r#"{"api_key": "u1-abc", "base_url": "http://localhost:9000/v3", "max_attempts": 2, "headers": {"X-Team": "ops"}}"#,
        );
        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.api_key.as_deref(), Some("u1-abc"));
        assert_eq!(settings.effective_base_url(), "http://localhost:9000/v3");
        assert_eq!(settings.max_attempts, Some(2));
        assert_eq!(settings.headers.get("X-Team").map(String::as_str), Some("ops"));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let file = write_settings(r#"{"api_key": 12"#);
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid settings file"));
    }

    #[test]
    fn test_unknown_field_is_error() {
        let file = write_settings(r#"{"apikey": "typo"}"#);
        assert!(Settings::load_from(file.path()).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let file = write_settings(r#"{"api_key": "from-file", "base_url": "http://file.example"}"#);
        let settings = Settings::load_from(file.path())
            .unwrap()
            .with_overrides(Some("from-flag"), None);

        assert_eq!(settings.api_key.as_deref(), Some("from-flag"));
        assert_eq!(settings.effective_base_url(), "http://file.example");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(Settings::default().effective_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let mut settings = Settings::default().with_overrides(Some("u1-secret"), None);
        settings.headers.insert("X-Auth-Token".to_string(), "t0k3n".to_string());
        settings.headers.insert("X-Team".to_string(), "ops".to_string());

        let shown = serde_json::to_string(&settings.redacted()).unwrap();
        assert!(!shown.contains("u1-secret"));
        assert!(!shown.contains("t0k3n"));
        assert!(shown.contains("ops"));
    }

    #[test]
    fn test_client_config_requires_key() {
        let err = Settings::default().to_client_config().unwrap_err();
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn test_client_config_applies_settings() {
        let settings = Settings {
            api_key: Some("k".to_string()),
            timeout_secs: Some(5),
            max_attempts: Some(2),
            base_delay_ms: Some(50),
            ..Settings::default()
        };
        let config = settings.to_client_config().unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.backoff.max_attempts, 2);
        assert_eq!(config.backoff.base_delay, Duration::from_millis(50));
        assert_eq!(config.base_url.as_str(), "https://api.uptimerobot.com/v3");
    }
}
