//! Application layer: wires configuration, cache and HTTP server together.

pub mod service_runner;

pub use service_runner::{build_cache, run};
