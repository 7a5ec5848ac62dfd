// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # UptimeKit Client
//!
//! Resilient HTTP client for an uptime-monitoring REST API.
//!
//! ## Request Execution
//!
//! - [`executor::RequestExecutor`] - Bearer auth, retries with jittered
//!   backoff, `Retry-After`, same-origin redirects
//! - [`retry::BackoffPolicy`] - Attempt budget and delay schedule
//! - [`request::EndpointCall`] - Method, path and a reusable payload
//!
//! ## Resources
//!
//! - [`crud::Crud`] - Typed create/get/update/delete/list per collection
//! - [`poll::DeletionPoller`] - Waits for eventually-consistent deletes
//! - [`resources::ApiClient`] - Entry point with monitor and status page
//!   modules
//!
//! ## Example
//!
//! ```ignore
//! use uptimekit_client::{ApiClient, ClientConfig};
//!
//! let config = ClientConfig::builder().api_key("u123-abc").build()?;
//! let client = ApiClient::new(config)?;
//!
//! let monitor = client.monitors().get("800123").await?;
//! client.monitors().pause(monitor.id.as_str()).await?;
//! ```

// Core modules
pub mod config;
pub mod crud;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod poll;
mod redirect;
pub mod request;
pub mod resources;
pub mod retry;

// Re-export key types at crate root

pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, USER_AGENT};
pub use crud::Crud;
pub use error::ClientError;
pub use executor::RequestExecutor;
pub use poll::{DeletionPoller, DeletionState, PollPolicy, PollSummary};
pub use request::{EndpointCall, MultipartForm, Payload, is_idempotent};
pub use resources::{ApiClient, Monitors, StatusPages};
pub use retry::{BackoffPolicy, JitterSource, NoJitter, SeededJitter, ThreadJitter};

// Resource types, re-exported for callers that only depend on this crate.
pub use uptimekit_core::{FlexBool, FlexId, ListPage, Monitor, Record, Resource, ResourceKind};
