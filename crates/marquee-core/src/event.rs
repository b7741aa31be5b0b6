//! Discovered-event input types — the crawler's data contract.
//!
//! Events are ephemeral: they are consumed to produce shows and never stored
//! as-is. Field-level validation is deliberately deferred to the reconciler
//! so a single bad event skips rather than failing the whole feed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};

// ─── DiscoveredEvent ─────────────────────────────────────────────────────────

/// One event record produced by the external crawler.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveredEvent {
  /// The crawler's identifier for this event at this venue.
  #[serde(default)]
  pub external_id: String,
  /// The crawler's venue identifier; resolved via the venue registry.
  #[serde(default)]
  pub venue_id:    String,
  #[serde(default)]
  pub title:       String,
  /// ISO calendar date, or a full timestamp whose date part is used.
  #[serde(default)]
  pub date:        String,
  /// Free text, e.g. "7:00 PM". Unparseable values fall back to midnight.
  pub doors_time:  Option<String>,
  pub show_time:   Option<String>,
  pub image_url:   Option<String>,
  pub ticket_url:  Option<String>,
  /// Explicit ordered artist list; when absent, artists are extracted from
  /// the title.
  pub artists:     Option<Vec<String>>,
  /// When the crawler scraped this event; RFC 3339, lenient.
  #[serde(default, deserialize_with = "lenient_instant")]
  pub scraped_at:  Option<DateTime<Utc>>,
}

impl DiscoveredEvent {
  /// The time string used for schedule resolution: show time when present,
  /// doors time otherwise.
  pub fn start_time_text(&self) -> Option<&str> {
    self.show_time.as_deref().or(self.doors_time.as_deref())
  }
}

/// Accept an RFC 3339 timestamp, treating anything unparseable as absent.
fn lenient_instant<'de, D>(
  deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  Ok(raw.as_deref().and_then(|s| {
    DateTime::parse_from_rfc3339(s)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
  }))
}

// ─── EventFeed ───────────────────────────────────────────────────────────────

/// The top-level shape of a feed document: either a flat array of events, or
/// an object whose values are arrays of events (typically keyed by venue).
/// Anything else is a fatal batch error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EventFeed {
  Flat(Vec<DiscoveredEvent>),
  /// A `BTreeMap` so grouped feeds flatten in deterministic key order.
  Grouped(BTreeMap<String, Vec<DiscoveredEvent>>),
}

impl EventFeed {
  /// Parse a feed document, detecting its shape.
  pub fn from_json(raw: &str) -> Result<Self> {
    serde_json::from_str(raw).map_err(Error::MalformedFeed)
  }

  /// Flatten into a single ordered event list.
  pub fn into_events(self) -> Vec<DiscoveredEvent> {
    match self {
      Self::Flat(events) => events,
      Self::Grouped(groups) => groups.into_values().flatten().collect(),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
