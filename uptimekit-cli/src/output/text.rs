//! Text output formatting with colors.

use serde_json::Value;
use uptimekit_core::{Monitor, Record, ResourceKind};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Fields tried, in order, for a record's display name.
const NAME_FIELDS: [&str; 3] = ["friendlyName", "name", "title"];

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats one record as `key: value` lines.
    pub fn format_record(&self, kind: ResourceKind, record: &Record) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.bold(kind.display_name()),
            record.id
        )];

        let width = record.fields.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in &record.fields {
            lines.push(format!("  {:<width$}  {}", key, self.value(value)));
        }

        lines.join("\n")
    }

    /// Formats a list of records as an ID/name table.
    pub fn format_record_list(&self, kind: ResourceKind, records: &[Record]) -> String {
        if records.is_empty() {
            return self.dim(&format!("No {} resources found", kind.cli_name()));
        }

        let id_width = records
            .iter()
            .map(|r| r.id.len())
            .max()
            .unwrap_or(0)
            .max(2);

        let mut lines = vec![self.bold(&format!("{:<id_width$}  Name", "ID"))];
        for record in records {
            let name = record_name(record).unwrap_or("-");
            lines.push(format!("{:<id_width$}  {}", record.id.as_str(), name));
        }
        lines.push(self.dim(&format!("{} {}", records.len(), kind.cli_name())));

        lines.join("\n")
    }

    /// Formats a monitor summary.
    pub fn format_monitor(&self, monitor: &Monitor) -> String {
        let name = monitor.friendly_name.as_deref().unwrap_or("(unnamed)");
        let mut lines = vec![format!("{} ({})", self.bold(name), monitor.id)];

        if let Some(status) = &monitor.status {
            lines.push(format!("Status:   {}", self.status(status)));
        }
        if let Some(url) = &monitor.url {
            lines.push(format!("URL:      {url}"));
        }
        if let Some(kind) = &monitor.monitor_type {
            lines.push(format!("Type:     {kind}"));
        }
        if let Some(interval) = monitor.interval {
            lines.push(format!("Interval: {interval}s"));
        }

        lines.join("\n")
    }

    /// Formats the result of a delete.
    pub fn format_deleted(&self, kind: ResourceKind, id: &str, confirmed: bool) -> String {
        let suffix = if confirmed { " (confirmed)" } else { "" };
        format!("Deleted {} {id}{}", kind.cli_name(), self.dim(suffix))
    }

    fn value(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => self.dim("null"),
            other => other.to_string(),
        }
    }

    fn status(&self, status: &str) -> String {
        let color = match status.to_ascii_uppercase().as_str() {
            "UP" => GREEN,
            "DOWN" => RED,
            "PAUSED" => YELLOW,
            _ => return status.to_string(),
        };
        self.paint(color, status)
    }

    fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn dim(&self, s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }
        self.paint(DIM, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_colors {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

fn record_name(record: &Record) -> Option<&str> {
    NAME_FIELDS
        .iter()
        .find_map(|field| record.field(field).and_then(Value::as_str))
}
