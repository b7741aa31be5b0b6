//! Persisted catalog entities — shows, venues, artists, and their links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Show ────────────────────────────────────────────────────────────────────

/// Review status of a show. Imported content starts `Approved` unless the
/// classifier flags it as a probable duplicate, in which case it starts
/// `Pending` for an admin to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowStatus {
  Pending,
  Approved,
  Rejected,
  Private,
}

/// How a show entered the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowSource {
  UserSubmitted,
  DiscoveryImported,
}

/// The external crawler's compound natural key for one scraped event.
/// Unique among discovery-sourced shows; the backstop for idempotent
/// re-imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
  /// The crawler's identifier for the venue the event was scraped from.
  pub venue_id: String,
  /// The crawler's identifier for the event itself.
  pub event_id: String,
}

/// A show in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
  pub show_id:              Uuid,
  pub title:                String,
  /// When the show starts, in UTC.
  pub starts_at:            DateTime<Utc>,
  pub city:                 Option<String>,
  pub state:                Option<String>,
  pub description:          Option<String>,
  pub price:                Option<String>,
  pub age_requirement:      Option<String>,
  pub ticket_url:           Option<String>,
  pub image_url:            Option<String>,
  pub status:               ShowStatus,
  pub source:               ShowSource,
  /// Present only for discovery-sourced shows.
  pub source_key:           Option<SourceKey>,
  /// Set when the classifier flagged this show as a probable duplicate of
  /// another; pending admin resolution. Not confirmed.
  pub duplicate_of_show_id: Option<Uuid>,
  /// Globally unique, URL-safe; derived from date + headliner + venue name.
  pub slug:                 String,
  pub created_at:           DateTime<Utc>,
}

// ─── Venue ───────────────────────────────────────────────────────────────────

/// A venue in the catalog. Identity for lookup/creation is the
/// case-insensitive (name, city) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
  pub venue_id:   Uuid,
  pub name:       String,
  pub city:       String,
  pub state:      String,
  pub address:    Option<String>,
  /// `false` for venues auto-created during import.
  pub verified:   bool,
  pub slug:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Artist ──────────────────────────────────────────────────────────────────

/// An artist in the catalog. Identity is the case-insensitive name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
  pub artist_id:  Uuid,
  pub name:       String,
  pub slug:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Billing ─────────────────────────────────────────────────────────────────

/// Billing slot for an artist on a show. Position 0 is always the headliner;
/// every other position is an opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
  Headliner,
  Opener,
}

/// One artist's slot on a show's bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowArtist {
  pub show_id:   Uuid,
  pub artist_id: Uuid,
  pub position:  u32,
  pub set_type:  SetType,
}
