//! Upstream feed client
//!
//! HTTP implementation of the [`GamesSource`](crate::domain::ports::GamesSource)
//! port backed by a pooled `reqwest` client.

pub mod client;

pub use client::HttpGamesSource;
