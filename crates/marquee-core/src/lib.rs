//! Core types and trait definitions for the Marquee show catalog.
//!
//! This crate holds the import reconciliation engine — venue registry,
//! date/time resolution, title billing extraction, duplicate classification,
//! and the batch reconciler — and the `CatalogStore` trait that storage
//! backends implement. It is deliberately free of database dependencies.

pub mod billing;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod event;
pub mod reconcile;
pub mod registry;
pub mod schedule;
pub mod store;
pub mod timezone;

pub use error::{Error, Result};
