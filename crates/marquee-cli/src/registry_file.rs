//! Venue registry TOML loading.
//!
//! ```toml
//! [venues.the-echo]
//! name    = "The Echo"
//! city    = "Los Angeles"
//! state   = "CA"
//! address = "1822 Sunset Blvd"
//! ```

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use marquee_core::registry::{VenueInfo, VenueRegistry};
use serde::Deserialize;

#[derive(Deserialize)]
struct RegistryFile {
  venues: BTreeMap<String, VenueInfo>,
}

/// Load a venue registry from a TOML file.
pub fn load(path: &Path) -> Result<VenueRegistry> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let file: RegistryFile =
    toml::from_str(&raw).context("parsing venue registry TOML")?;
  Ok(VenueRegistry::from_entries(file.venues))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
