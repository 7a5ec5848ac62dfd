//! Domain models for `UptimeKit`.
//!
//! ## Submodules
//!
//! - [`flex`] - Tolerant decoders (`FlexBool`, `FlexId`)
//! - [`resource`] - Resource collections and decoded shapes

mod flex;
mod resource;

// Re-export everything at the models level
pub use flex::{FlexBool, FlexId};
pub use resource::{ListPage, Monitor, Record, Resource, ResourceKind};
#[cfg(test)]
mod serde_tests;
