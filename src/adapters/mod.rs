//! Adapters for external systems: the HTTP API and the disk snapshot.

pub mod http;
pub mod snapshot;
