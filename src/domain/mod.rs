//! Domain layer for the VPS data service
//!
//! Core data model, error taxonomy and the port traits the cache layer
//! depends on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CacheError, UpstreamError};
