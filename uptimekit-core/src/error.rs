//! Core error types for `UptimeKit`.

use thiserror::Error;

/// Core error type for `UptimeKit` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Resource collection name not recognized.
    #[error("Unknown resource kind: {0}")]
    UnknownResource(String),
}
