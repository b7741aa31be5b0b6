//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings truncated to whole seconds,
//! so the string ordering matches the instant ordering and day-window range
//! scans can compare lexicographically. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use marquee_core::{
  catalog::{SetType, Show, ShowSource, ShowStatus, SourceKey},
  store::DayCandidate,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ShowStatus ──────────────────────────────────────────────────────────────

pub fn encode_show_status(s: ShowStatus) -> &'static str {
  match s {
    ShowStatus::Pending => "pending",
    ShowStatus::Approved => "approved",
    ShowStatus::Rejected => "rejected",
    ShowStatus::Private => "private",
  }
}

pub fn decode_show_status(s: &str) -> Result<ShowStatus> {
  match s {
    "pending" => Ok(ShowStatus::Pending),
    "approved" => Ok(ShowStatus::Approved),
    "rejected" => Ok(ShowStatus::Rejected),
    "private" => Ok(ShowStatus::Private),
    other => Err(Error::UnknownDiscriminant {
      column: "status",
      value:  other.to_string(),
    }),
  }
}

// ─── ShowSource ──────────────────────────────────────────────────────────────

pub fn encode_show_source(s: ShowSource) -> &'static str {
  match s {
    ShowSource::UserSubmitted => "user_submitted",
    ShowSource::DiscoveryImported => "discovery_imported",
  }
}

pub fn decode_show_source(s: &str) -> Result<ShowSource> {
  match s {
    "user_submitted" => Ok(ShowSource::UserSubmitted),
    "discovery_imported" => Ok(ShowSource::DiscoveryImported),
    other => Err(Error::UnknownDiscriminant {
      column: "source",
      value:  other.to_string(),
    }),
  }
}

// ─── SetType ─────────────────────────────────────────────────────────────────

pub fn encode_set_type(s: SetType) -> &'static str {
  match s {
    SetType::Headliner => "headliner",
    SetType::Opener => "opener",
  }
}

pub fn decode_set_type(s: &str) -> Result<SetType> {
  match s {
    "headliner" => Ok(SetType::Headliner),
    "opener" => Ok(SetType::Opener),
    other => Err(Error::UnknownDiscriminant {
      column: "set_type",
      value:  other.to_string(),
    }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `shows` row.
pub struct RawShow {
  pub show_id:              String,
  pub title:                String,
  pub starts_at:            String,
  pub city:                 Option<String>,
  pub state:                Option<String>,
  pub description:          Option<String>,
  pub price:                Option<String>,
  pub age_requirement:      Option<String>,
  pub ticket_url:           Option<String>,
  pub image_url:            Option<String>,
  pub status:               String,
  pub source:               String,
  pub source_venue_id:      Option<String>,
  pub source_event_id:      Option<String>,
  pub duplicate_of_show_id: Option<String>,
  pub slug:                 String,
  pub created_at:           String,
}

impl RawShow {
  pub fn into_show(self) -> Result<Show> {
    let source_key = match (self.source_venue_id, self.source_event_id) {
      (Some(venue_id), Some(event_id)) => {
        Some(SourceKey { venue_id, event_id })
      }
      _ => None,
    };

    Ok(Show {
      show_id: decode_uuid(&self.show_id)?,
      title: self.title,
      starts_at: decode_dt(&self.starts_at)?,
      city: self.city,
      state: self.state,
      description: self.description,
      price: self.price,
      age_requirement: self.age_requirement,
      ticket_url: self.ticket_url,
      image_url: self.image_url,
      status: decode_show_status(&self.status)?,
      source: decode_show_source(&self.source)?,
      source_key,
      duplicate_of_show_id: self
        .duplicate_of_show_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      slug: self.slug,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings for one same-day candidate row.
pub struct RawDayCandidate {
  pub show_id:   String,
  pub status:    String,
  pub headliner: Option<String>,
}

impl RawDayCandidate {
  pub fn into_candidate(self) -> Result<DayCandidate> {
    Ok(DayCandidate {
      show_id:   decode_uuid(&self.show_id)?,
      status:    decode_show_status(&self.status)?,
      headliner: self.headliner,
    })
  }
}
