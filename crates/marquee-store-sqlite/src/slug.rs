//! Slug derivation. Collision resolution against existing rows happens
//! inside the commit transaction in [`crate::store`].

use chrono::NaiveDate;

/// Lowercase, URL-safe slug: alphanumerics kept, every other run of
/// characters collapsed to a single hyphen.
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_hyphen = false;

  for c in text.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      pending_hyphen = true;
    }
  }

  if slug.is_empty() { "untitled".to_string() } else { slug }
}

/// Base slug for a show: date + headliner + venue name.
pub fn show_slug_base(date: NaiveDate, headliner: &str, venue: &str) -> String {
  slugify(&format!("{date} {headliner} {venue}"))
}

/// Base slug for a venue: name + city + state.
pub fn venue_slug_base(name: &str, city: &str, state: &str) -> String {
  slugify(&format!("{name} {city} {state}"))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
