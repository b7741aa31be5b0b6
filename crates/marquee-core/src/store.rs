//! The `CatalogStore` trait and supporting input/output types.
//!
//! The trait is implemented by storage backends (e.g.
//! `marquee-store-sqlite`). The reconciler depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  catalog::{ShowStatus, SourceKey},
  registry::VenueInfo,
};

// ─── Read types ──────────────────────────────────────────────────────────────

/// A lightweight handle to an existing show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowRef {
  pub show_id: Uuid,
  pub status:  ShowStatus,
}

/// An existing show at a venue on a given day, with its headliner (when the
/// bill has one) for fuzzy duplicate matching.
#[derive(Debug, Clone)]
pub struct DayCandidate {
  pub show_id:   Uuid,
  pub status:    ShowStatus,
  pub headliner: Option<String>,
}

/// One row of the companion batch-status query.
#[derive(Debug, Clone)]
pub struct SourceEventStatus {
  pub key:  SourceKey,
  /// `Some` when a show already exists for this source key.
  pub show: Option<ShowRef>,
}

// ─── Write types ─────────────────────────────────────────────────────────────

/// Everything needed to commit one imported show and its links atomically.
#[derive(Debug, Clone)]
pub struct NewShowGraph {
  pub title:                String,
  pub starts_at:            DateTime<Utc>,
  /// `Approved` for fresh imports, `Pending` for review-flagged ones.
  pub status:               ShowStatus,
  pub source_key:           SourceKey,
  pub duplicate_of_show_id: Option<Uuid>,
  pub ticket_url:           Option<String>,
  pub image_url:            Option<String>,
  /// Registry metadata; the venue row is resolved or created from this.
  pub venue:                VenueInfo,
  /// Ordered billing; the first entry is the headliner.
  pub artists:              Vec<String>,
}

/// Result of a show-graph commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
  Created(Uuid),
  /// The natural-key uniqueness constraint fired: a show with this source
  /// key already exists. Authoritative duplicate signal under concurrent
  /// imports.
  SourceKeyExists(Uuid),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Marquee catalog backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Find a discovery-sourced show by its crawler natural key.
  fn find_show_by_source_key<'a>(
    &'a self,
    key: &'a SourceKey,
  ) -> impl Future<Output = Result<Option<ShowRef>, Self::Error>> + Send + 'a;

  /// All shows at a case-insensitively name-matched venue whose start falls
  /// within the UTC calendar day `[day_start, day_start + 24h)`.
  fn shows_at_venue_on_day<'a>(
    &'a self,
    venue_name: &'a str,
    day_start: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<DayCandidate>, Self::Error>> + Send + 'a;

  /// Create a show with its venue and artist links in one transaction,
  /// assigning collision-free slugs to every created row. Either the whole
  /// graph commits or none of it does.
  fn create_show_graph(
    &self,
    graph: NewShowGraph,
  ) -> impl Future<Output = Result<CommitOutcome, Self::Error>> + Send + '_;

  /// Batch-status query for the upstream crawler: per source key, whether a
  /// show already exists and with what status.
  fn source_event_statuses<'a>(
    &'a self,
    keys: &'a [SourceKey],
  ) -> impl Future<Output = Result<Vec<SourceEventStatus>, Self::Error>> + Send + 'a;
}
