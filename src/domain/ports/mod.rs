//! Port trait definitions (Hexagonal Architecture)
//!
//! - GamesSource: the authoritative upstream feed of game records
//!
//! Keeping the source behind a trait lets the cache layer be driven by
//! test doubles without a network.

pub mod games_source;

pub use games_source::GamesSource;
