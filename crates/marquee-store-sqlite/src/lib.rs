//! SQLite backend for the Marquee show catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Owns the schema, the plain-text column
//! encodings, transactional show-graph commits, and collision-safe slug
//! assignment.

mod encode;
mod schema;
mod slug;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{BilledArtist, RowCounts, SqliteStore};

#[cfg(test)]
mod pipeline_tests;
