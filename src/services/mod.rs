//! Service layer: the tiered game cache and the queries served from it.

pub mod games_cache;
pub mod query_service;

pub use games_cache::{GamesCache, DEFAULT_TTL};
pub use query_service::{filter_by_name, filter_by_table_id, QueryService};
