//! Shared types for the bhasa transliteration ecosystem.
//!
//! These types are used across bhasa-lib and bhasa-cli. Keeping them here
//! means consumers can depend on queries, wire shapes, and payload parsing
//! without pulling in tokio, reqwest, or other heavy deps.

pub mod payload;
pub mod query;
pub mod types;
