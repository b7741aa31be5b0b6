//! Batch import reconciliation — the orchestrator tying registry, schedule
//! resolution, classification, and persistence together.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
  billing::split_billing,
  catalog::{ShowStatus, SourceKey},
  classify::{Classification, classify},
  error::Error,
  event::DiscoveredEvent,
  registry::VenueRegistry,
  schedule::resolve_start_time,
  store::{CatalogStore, CommitOutcome, NewShowGraph},
};

// ─── Per-event outcome ───────────────────────────────────────────────────────

/// What happened (or would happen, in dry-run) to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDisposition {
  Imported { show_id: Uuid },
  WouldImport,
  Duplicate { existing: Uuid },
  Rejected { existing: Uuid },
  FlaggedForReview { show_id: Uuid, duplicate_of: Uuid },
  WouldFlagForReview { duplicate_of: Uuid },
  Skipped { reason: String },
  Error { reason: String },
}

/// One event's outcome plus the context needed to render a diagnostic line.
#[derive(Debug, Clone)]
pub struct EventReport {
  pub title:       String,
  /// Display name of the venue, or the raw venue identifier when the
  /// registry lookup failed.
  pub venue:       String,
  pub starts_at:   Option<DateTime<Utc>>,
  pub disposition: EventDisposition,
}

impl EventReport {
  /// Render the fixed-tag diagnostic line for this event.
  pub fn line(&self) -> String {
    let title = &self.title;
    let venue = &self.venue;
    let when = self
      .starts_at
      .map(|t| t.to_rfc3339())
      .unwrap_or_else(|| "unresolved".to_string());

    match &self.disposition {
      EventDisposition::Imported { .. } => {
        format!("IMPORTED: {title} at {venue}, {when}")
      }
      EventDisposition::WouldImport => {
        format!("WOULD IMPORT: {title} at {venue}, {when}")
      }
      EventDisposition::Duplicate { existing } => {
        format!(
          "DUPLICATE: {title} at {venue}, {when} (existing show {existing})"
        )
      }
      EventDisposition::Rejected { existing } => {
        format!(
          "REJECTED: {title} at {venue}, {when} (rejected show {existing})"
        )
      }
      EventDisposition::FlaggedForReview { duplicate_of, .. } => {
        format!(
          "FLAGGED FOR REVIEW: {title} at {venue}, {when} (possible \
           duplicate of show {duplicate_of})"
        )
      }
      EventDisposition::WouldFlagForReview { duplicate_of } => {
        format!(
          "WOULD FLAG FOR REVIEW: {title} at {venue}, {when} (possible \
           duplicate of show {duplicate_of})"
        )
      }
      EventDisposition::Skipped { reason } => {
        format!("SKIP: {title} at {venue}: {reason}")
      }
      EventDisposition::Error { reason } => {
        format!("ERROR: {title} at {venue}: {reason}")
      }
    }
  }
}

// ─── Batch summary ───────────────────────────────────────────────────────────

/// Aggregated outcome of one import run.
#[derive(Debug, Default)]
pub struct BatchSummary {
  pub total:          usize,
  pub imported:       usize,
  pub duplicates:     usize,
  pub rejected:       usize,
  pub pending_review: usize,
  pub skipped:        usize,
  pub errors:         usize,
  pub reports:        Vec<EventReport>,
}

impl BatchSummary {
  fn record(&mut self, report: EventReport) {
    self.total += 1;
    match &report.disposition {
      EventDisposition::Imported { .. } | EventDisposition::WouldImport => {
        self.imported += 1;
      }
      EventDisposition::Duplicate { .. } => self.duplicates += 1,
      EventDisposition::Rejected { .. } => self.rejected += 1,
      EventDisposition::FlaggedForReview { .. }
      | EventDisposition::WouldFlagForReview { .. } => {
        self.pending_review += 1;
      }
      EventDisposition::Skipped { .. } => self.skipped += 1,
      EventDisposition::Error { .. } => self.errors += 1,
    }
    self.reports.push(report);
  }
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

/// Reconciles a batch of discovered events against the catalog.
pub struct ImportReconciler<'a, S> {
  store:    &'a S,
  registry: &'a VenueRegistry,
  dry_run:  bool,
}

impl<'a, S: CatalogStore> ImportReconciler<'a, S> {
  pub fn new(store: &'a S, registry: &'a VenueRegistry, dry_run: bool) -> Self {
    Self { store, registry, dry_run }
  }

  /// Process every event in order, accumulating per-event outcomes. One
  /// event's failure never aborts its siblings.
  pub async fn run(&self, events: Vec<DiscoveredEvent>) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for event in &events {
      summary.record(self.reconcile_event(event).await);
    }
    summary
  }

  /// Resolve, classify, and (outside dry-run) persist a single event.
  pub async fn reconcile_event(&self, event: &DiscoveredEvent) -> EventReport {
    let title = event.title.trim().to_string();

    if let Some(missing) = first_missing_field(event) {
      return EventReport {
        title,
        venue: event.venue_id.clone(),
        starts_at: None,
        disposition: EventDisposition::Skipped {
          reason: Error::MissingField(missing).to_string(),
        },
      };
    }

    let Some(venue) = self.registry.lookup(&event.venue_id) else {
      return EventReport {
        title,
        venue: event.venue_id.clone(),
        starts_at: None,
        disposition: EventDisposition::Error {
          reason: Error::UnknownVenue(event.venue_id.clone()).to_string(),
        },
      };
    };
    let venue = venue.clone();

    let starts_at = match resolve_start_time(
      &event.date,
      event.start_time_text(),
      &venue.state,
    ) {
      Ok(instant) => instant,
      Err(e) => {
        return EventReport {
          title,
          venue: venue.name,
          starts_at: None,
          disposition: EventDisposition::Error { reason: e.to_string() },
        };
      }
    };

    let report = |disposition| EventReport {
      title: title.clone(),
      venue: venue.name.clone(),
      starts_at: Some(starts_at),
      disposition,
    };

    let key = SourceKey {
      venue_id: event.venue_id.clone(),
      event_id: event.external_id.clone(),
    };

    let exact = match self.store.find_show_by_source_key(&key).await {
      Ok(found) => found,
      Err(e) => {
        return report(EventDisposition::Error { reason: e.to_string() });
      }
    };

    let candidates = match self
      .store
      .shows_at_venue_on_day(&venue.name, start_of_utc_day(starts_at))
      .await
    {
      Ok(found) => found,
      Err(e) => {
        return report(EventDisposition::Error { reason: e.to_string() });
      }
    };

    // Normalised once; the classifier and the writer must see the same
    // names or a padded artist would persist but never fuzzy-match.
    let explicit = explicit_artists(event);
    let first_artist = explicit.first().map(String::as_str);

    match classify(first_artist, exact, &candidates) {
      Classification::Duplicate(existing) => {
        report(EventDisposition::Duplicate { existing })
      }
      Classification::Rejected(existing) => {
        report(EventDisposition::Rejected { existing })
      }
      Classification::PendingReview(duplicate_of) => {
        if self.dry_run {
          return report(EventDisposition::WouldFlagForReview {
            duplicate_of,
          });
        }
        match self
          .commit(event, starts_at, &venue, key, Some(duplicate_of), &explicit)
          .await
        {
          Ok(CommitOutcome::Created(show_id)) => {
            report(EventDisposition::FlaggedForReview {
              show_id,
              duplicate_of,
            })
          }
          Ok(CommitOutcome::SourceKeyExists(existing)) => {
            report(EventDisposition::Duplicate { existing })
          }
          Err(reason) => report(EventDisposition::Error { reason }),
        }
      }
      Classification::Fresh => {
        if self.dry_run {
          return report(EventDisposition::WouldImport);
        }
        match self.commit(event, starts_at, &venue, key, None, &explicit).await
        {
          Ok(CommitOutcome::Created(show_id)) => {
            report(EventDisposition::Imported { show_id })
          }
          Ok(CommitOutcome::SourceKeyExists(existing)) => {
            report(EventDisposition::Duplicate { existing })
          }
          Err(reason) => report(EventDisposition::Error { reason }),
        }
      }
    }
  }

  async fn commit(
    &self,
    event: &DiscoveredEvent,
    starts_at: DateTime<Utc>,
    venue: &crate::registry::VenueInfo,
    source_key: SourceKey,
    duplicate_of_show_id: Option<Uuid>,
    explicit_artists: &[String],
  ) -> Result<CommitOutcome, String> {
    let status = if duplicate_of_show_id.is_some() {
      ShowStatus::Pending
    } else {
      ShowStatus::Approved
    };

    let graph = NewShowGraph {
      title: event.title.trim().to_string(),
      starts_at,
      status,
      source_key,
      duplicate_of_show_id,
      ticket_url: event.ticket_url.clone(),
      image_url: event.image_url.clone(),
      venue: venue.clone(),
      artists: if explicit_artists.is_empty() {
        split_billing(&event.title)
      } else {
        explicit_artists.to_vec()
      },
    };

    self
      .store
      .create_show_graph(graph)
      .await
      .map_err(|e| e.to_string())
  }
}

/// The event's explicit artist list, trimmed, with empty names dropped.
fn explicit_artists(event: &DiscoveredEvent) -> Vec<String> {
  event
    .artists
    .as_deref()
    .unwrap_or_default()
    .iter()
    .map(|a| a.trim().to_string())
    .filter(|a| !a.is_empty())
    .collect()
}

fn first_missing_field(event: &DiscoveredEvent) -> Option<&'static str> {
  if event.external_id.trim().is_empty() {
    return Some("external_id");
  }
  if event.venue_id.trim().is_empty() {
    return Some("venue_id");
  }
  if event.title.trim().is_empty() {
    return Some("title");
  }
  if event.date.trim().is_empty() {
    return Some("date");
  }
  None
}

/// Truncate an instant to the start of its UTC calendar day.
pub fn start_of_utc_day(instant: DateTime<Utc>) -> DateTime<Utc> {
  Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
