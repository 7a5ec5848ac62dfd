//! Client error types.

use std::time::Duration;

use thiserror::Error;
use uptimekit_core::redact_json;

/// Byte budget for a response body rendered inside an error message.
const STATUS_BODY_DISPLAY_LIMIT: usize = 1024;

/// Renders a response body for an error message without leaking secrets.
fn display_body(body: &str) -> String {
    redact_json(body.as_bytes(), STATUS_BODY_DISPLAY_LIMIT)
}

// ============================================================================
// Client Error
// ============================================================================

/// Error type for every client operation.
///
/// `Display` never includes a secret: status bodies are redacted and clipped
/// before formatting. The raw body stays available on the variant.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure before a response was obtained.
    #[error("Transport error during {method}: {source}")]
    Transport {
        /// HTTP method of the failed exchange.
        method: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response that was not (or no longer) eligible for retry.
    #[error("HTTP {status}: {}", display_body(.body))]
    Status {
        /// Response status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Every attempt failed; wraps the last observed error.
    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: Box<ClientError>,
    },

    /// Server redirected to a different origin; not followed.
    #[error("Refusing to follow cross-origin redirect to {location}")]
    CrossOriginRedirect {
        /// Resolved redirect target.
        location: String,
    },

    /// Redirect chain longer than the hop limit.
    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    /// Request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body did not match the expected shape.
    #[error("Failed to decode {context}: {source}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be constructed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Single-resource fetch failed server-side and the list fallback failed too.
    #[error("Fetching {id} failed ({primary}); list fallback also failed ({fallback})")]
    FallbackFailed {
        /// Requested identifier.
        id: String,
        /// Error from the single-resource fetch.
        primary: Box<ClientError>,
        /// Error from the list fetch.
        fallback: Box<ClientError>,
    },

    /// List fallback succeeded but did not contain the identifier.
    #[error("Fetching {id} failed ({primary}); list fallback succeeded but {id} was not found")]
    FallbackNotFound {
        /// Requested identifier.
        id: String,
        /// Error from the single-resource fetch.
        primary: Box<ClientError>,
    },

    /// Deletion was not confirmed before the deadline.
    #[error("Timed out after {timeout:?} waiting for {id} to be deleted")]
    DeleteTimeout {
        /// Resource identifier.
        id: String,
        /// Configured wait budget.
        timeout: Duration,
    },

    /// Waiting for deletion was cancelled.
    #[error("Cancelled while waiting for {id} to be deleted")]
    Cancelled {
        /// Resource identifier.
        id: String,
    },
}

impl ClientError {
    /// Returns the HTTP status behind this error, looking through retry wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns true for 404 Not Found and 410 Gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404 | 410))
    }

    /// Returns true for any 5xx status.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status >= 500)
    }

    /// Returns true if no response was obtained.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::RetriesExhausted { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Returns the raw response body, if this error carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            Self::RetriesExhausted { source, .. } => source.body(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_is_redacted() {
        let err = ClientError::Status {
            status: 400,
            body: r#"{"error":"bad","echo":{"apiKey":"u123-secret"}}"#.to_string(),
        };

        let text = err.to_string();
        assert!(text.starts_with("HTTP 400"));
        assert!(!text.contains("u123-secret"));
        assert!(err.body().unwrap().contains("u123-secret"));
    }

    #[test]
    fn test_classification_sees_through_retries() {
        let err = ClientError::RetriesExhausted {
            attempts: 4,
            source: Box::new(ClientError::Status {
                status: 503,
                body: String::new(),
            }),
        };

        assert_eq!(err.status(), Some(503));
        assert!(err.is_server_error());
        assert!(!err.is_not_found());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_not_found_statuses() {
        for status in [404, 410] {
            let err = ClientError::Status {
                status,
                body: String::new(),
            };
            assert!(err.is_not_found());
        }
        let err = ClientError::Status {
            status: 403,
            body: String::new(),
        };
        assert!(!err.is_not_found());
    }
}
