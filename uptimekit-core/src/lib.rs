// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `UptimeKit` Core
//!
//! Wire-level types shared by every `UptimeKit` crate.
//!
//! This crate has no network code. It provides:
//!
//! - Tolerant decoders for fields whose JSON shape differs between API
//!   versions
//! - The resource catalogue (which collections exist and where they live)
//! - A structure-agnostic redaction engine for diagnostic logging
//! - Error types
//!
//! ## Key Types
//!
//! ### Tolerant Decoders
//! - [`FlexBool`] - Boolean that also accepts `"true"`/`"false"` strings and `null`
//! - [`FlexId`] - Identifier that accepts either a JSON string or a JSON number
//!
//! ### Resources
//! - [`ResourceKind`] - Monitors, status pages, integrations, maintenance windows
//! - [`Resource`] - Trait for decoded resources that expose their identifier
//! - [`Record`] - Schema-free resource (identifier plus raw fields)
//! - [`Monitor`] - Typed monitor with the commonly used fields
//! - [`ListPage`] - Body of a list endpoint
//!
//! ### Redaction
//! - [`redact`] - Scrub a parsed JSON value in place
//! - [`redact_json`] - Scrub and clip a raw JSON body for logs

pub mod error;
pub mod models;
pub mod redact;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Tolerant decoders
    FlexBool,
    FlexId,
    // Resources
    ListPage,
    Monitor,
    Record,
    Resource,
    ResourceKind,
};

// Re-export redaction
pub use redact::{REDACTION_MARKER, is_sensitive_key, redact, redact_json, redact_value};
