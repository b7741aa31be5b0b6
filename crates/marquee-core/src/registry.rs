//! Venue registry — the crawler's venue identifiers mapped to real venues.
//!
//! The registry is an explicitly constructed value passed into the
//! reconciler, never global state, so tests can run against synthetic venue
//! sets. Adding a venue is an out-of-band configuration change; this core
//! only reads.

use std::collections::HashMap;

use serde::Deserialize;

/// Display metadata for a registered venue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VenueInfo {
  pub name:    String,
  pub city:    String,
  /// Two-letter state/region code; drives timezone resolution.
  pub state:   String,
  pub address: Option<String>,
}

/// Static lookup from a crawler venue identifier to venue metadata.
#[derive(Debug, Clone, Default)]
pub struct VenueRegistry {
  venues: HashMap<String, VenueInfo>,
}

impl VenueRegistry {
  /// Build a registry from explicit entries.
  pub fn from_entries(
    entries: impl IntoIterator<Item = (String, VenueInfo)>,
  ) -> Self {
    Self { venues: entries.into_iter().collect() }
  }

  /// The compiled-in venue set used when no registry file is supplied.
  pub fn builtin() -> Self {
    let entry = |id: &str, name: &str, city: &str, state: &str, addr: &str| {
      (id.to_string(), VenueInfo {
        name:    name.to_string(),
        city:    city.to_string(),
        state:   state.to_string(),
        address: Some(addr.to_string()),
      })
    };

    Self::from_entries([
      entry(
        "the-echo",
        "The Echo",
        "Los Angeles",
        "CA",
        "1822 Sunset Blvd",
      ),
      entry(
        "lodge-room",
        "Lodge Room",
        "Los Angeles",
        "CA",
        "104 N Avenue 56",
      ),
      entry(
        "valley-bar",
        "Valley Bar",
        "Phoenix",
        "AZ",
        "130 N Central Ave",
      ),
      entry(
        "crescent-ballroom",
        "Crescent Ballroom",
        "Phoenix",
        "AZ",
        "308 N 2nd Ave",
      ),
      entry(
        "bowery-ballroom",
        "Bowery Ballroom",
        "New York",
        "NY",
        "6 Delancey St",
      ),
      entry(
        "empty-bottle",
        "Empty Bottle",
        "Chicago",
        "IL",
        "1035 N Western Ave",
      ),
    ])
  }

  /// Look up a venue by its crawler identifier. `None` is terminal for the
  /// event — the reconciler reports an error rather than inventing a venue.
  pub fn lookup(&self, venue_id: &str) -> Option<&VenueInfo> {
    self.venues.get(venue_id)
  }

  pub fn len(&self) -> usize {
    self.venues.len()
  }

  pub fn is_empty(&self) -> bool {
    self.venues.is_empty()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
