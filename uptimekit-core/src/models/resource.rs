//! Resource collections and their decoded shapes.
//!
//! The API exposes a fixed set of collections, each under its own path
//! prefix. Field schemas differ per collection and per API version, so
//! the generic shape here is [`Record`]: a tolerant identifier plus the
//! remaining fields untouched.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::flex::{FlexBool, FlexId};
use crate::error::CoreError;

// ============================================================================
// Resource Kind
// ============================================================================

/// Resource collections served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Uptime monitors.
    Monitor,
    /// Public status pages.
    StatusPage,
    /// Alert contact integrations (webhooks, chat, email).
    Integration,
    /// Scheduled maintenance windows.
    MaintenanceWindow,
}

impl ResourceKind {
    /// Returns all resource kinds.
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Monitor,
            ResourceKind::StatusPage,
            ResourceKind::Integration,
            ResourceKind::MaintenanceWindow,
        ]
    }

    /// Returns the collection path relative to the API base URL.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            Self::Monitor => "/monitors",
            Self::StatusPage => "/psps",
            Self::Integration => "/integrations",
            Self::MaintenanceWindow => "/maintenance-windows",
        }
    }

    /// Returns the name used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Monitor => "monitor",
            Self::StatusPage => "status-page",
            Self::Integration => "integration",
            Self::MaintenanceWindow => "maintenance-window",
        }
    }

    /// Returns a human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Monitor => "Monitor",
            Self::StatusPage => "Status Page",
            Self::Integration => "Integration",
            Self::MaintenanceWindow => "Maintenance Window",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monitor" | "monitors" => Ok(Self::Monitor),
            "status-page" | "status-pages" | "psp" | "psps" => Ok(Self::StatusPage),
            "integration" | "integrations" => Ok(Self::Integration),
            "maintenance-window" | "maintenance-windows" | "mw" => Ok(Self::MaintenanceWindow),
            _ => Err(CoreError::UnknownResource(s.to_string())),
        }
    }
}

// ============================================================================
// Resource Trait
// ============================================================================

/// A decoded resource that knows its own identifier.
///
/// Needed wherever a resource has to be found inside a list response.
pub trait Resource: DeserializeOwned {
    /// Returns the server-assigned identifier.
    fn resource_id(&self) -> &str;
}

// ============================================================================
// Record
// ============================================================================

/// Schema-free resource: the identifier plus every other field as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: FlexId,
    /// All remaining fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Returns a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Resource for Record {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Monitor
// ============================================================================

/// A monitor with the fields callers commonly inspect.
///
/// Everything else lands in `extra`, so unknown fields round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Monitor {
    /// Server-assigned identifier.
    pub id: FlexId,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Checked URL or host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Monitor type (HTTP, KEYWORD, PING, PORT, HEARTBEAT, DNS).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub monitor_type: Option<String>,
    /// Check interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    /// Current status (UP, DOWN, PAUSED, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether SSL expiry reminders are on.
    pub ssl_expiration_reminder: FlexBool,
    /// Whether domain expiry reminders are on.
    pub domain_expiration_reminder: FlexBool,
    /// Whether redirects are followed when checking.
    pub follow_redirections: FlexBool,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Monitor {
    /// Returns true if the monitor is paused.
    pub fn is_paused(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("paused"))
    }
}

impl Resource for Monitor {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// List Page
// ============================================================================

/// Body of a list endpoint.
///
/// Older endpoints return a bare array, newer ones wrap it in `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPage<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ "data": [ ... ], ... }`
    Wrapped {
        /// Items on this page.
        data: Vec<T>,
    },
}

impl<T> ListPage<T> {
    /// Returns the items regardless of wire shape.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

impl<T: Resource> ListPage<T> {
    /// Finds the item with the given identifier.
    pub fn find(self, id: &str) -> Option<T> {
        self.into_items()
            .into_iter()
            .find(|item| item.resource_id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_parse() {
        assert_eq!("monitor".parse::<ResourceKind>().unwrap(), ResourceKind::Monitor);
        assert_eq!("PSP".parse::<ResourceKind>().unwrap(), ResourceKind::StatusPage);
        assert_eq!(
            "maintenance-windows".parse::<ResourceKind>().unwrap(),
            ResourceKind::MaintenanceWindow
        );
        assert!("dashboard".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_path_prefixes_are_rooted() {
        for kind in ResourceKind::all() {
            assert!(kind.path_prefix().starts_with('/'), "{kind}");
            assert!(!kind.path_prefix().ends_with('/'), "{kind}");
        }
    }

    #[test]
    fn test_monitor_paused() {
        let monitor: Monitor = serde_json::from_str(r#"{"id":1,"status":"PAUSED"}"#).unwrap();
        assert!(monitor.is_paused());
        assert_eq!(monitor.resource_id(), "1");
    }
}
