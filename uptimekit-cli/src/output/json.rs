//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Result of a delete command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutput {
    pub kind: String,
    pub id: String,
    pub deleted: bool,
    /// Whether deletion was confirmed by polling.
    pub confirmed: bool,
}

/// Configuration paths.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsOutput {
    pub config_dir: String,
    pub settings_file: String,
    pub settings_exists: bool,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
