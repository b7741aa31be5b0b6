//! Error types for `marquee-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The event cited a venue identifier the registry does not know.
  #[error("unknown venue identifier: {0:?}")]
  UnknownVenue(String),

  /// The event's date string matched none of the accepted formats.
  #[error("unparseable event date: {0:?}")]
  UnparseableDate(String),

  /// A required event field was missing or empty.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  /// The top-level feed document was neither an array of events nor an
  /// object whose values are arrays of events. Fatal for the whole batch.
  #[error("malformed event feed: {0}")]
  MalformedFeed(#[source] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
