//! HTTP surface of the service.

pub mod games_http;

pub use games_http::{build_router, GamesHttpConfig, GamesHttpServer};
