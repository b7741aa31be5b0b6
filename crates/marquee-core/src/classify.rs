//! Duplicate classification — the tiered decision at the heart of import.
//!
//! A pure function over the incoming event and pre-fetched catalog state;
//! the reconciler performs the store reads and feeds the results in, which
//! keeps every tier unit-testable without a database.

use uuid::Uuid;

use crate::{
  catalog::ShowStatus,
  store::{DayCandidate, ShowRef},
};

/// The classifier's verdict for one incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  /// No tier matched; create the show with status approved.
  Fresh,
  /// A show with the same source key already exists.
  Duplicate(Uuid),
  /// An admin previously rejected a show at this venue on this day; stay
  /// rejected rather than silently re-entering the catalog.
  Rejected(Uuid),
  /// Same venue, same day, same headliner — probably the same event. The
  /// show is still created, status pending, pointing at the match.
  PendingReview(Uuid),
}

/// Apply the ordered duplicate tiers. Short-circuits on the first match.
///
/// - `first_artist` is the event's first *explicit* artist, when the crawler
///   supplied a structured list; the headliner tier never fires on
///   title-extracted names.
/// - `exact` is the show matching the event's source key, if any.
/// - `candidates` are existing shows at the same venue on the same UTC day.
pub fn classify(
  first_artist: Option<&str>,
  exact: Option<ShowRef>,
  candidates: &[DayCandidate],
) -> Classification {
  if let Some(existing) = exact {
    return Classification::Duplicate(existing.show_id);
  }

  if let Some(rejected) = candidates
    .iter()
    .find(|c| c.status == ShowStatus::Rejected)
  {
    return Classification::Rejected(rejected.show_id);
  }

  if let Some(artist) = first_artist {
    let headliner_match = candidates.iter().find(|c| {
      !matches!(c.status, ShowStatus::Rejected | ShowStatus::Private)
        && c
          .headliner
          .as_deref()
          .is_some_and(|h| h.eq_ignore_ascii_case(artist))
    });
    if let Some(matched) = headliner_match {
      return Classification::PendingReview(matched.show_id);
    }
  }

  Classification::Fresh
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate(status: ShowStatus, headliner: Option<&str>) -> DayCandidate {
    DayCandidate {
      show_id: Uuid::new_v4(),
      status,
      headliner: headliner.map(str::to_string),
    }
  }

  #[test]
  fn exact_source_key_match_wins() {
    let existing = ShowRef {
      show_id: Uuid::new_v4(),
      status:  ShowStatus::Approved,
    };
    // Even a rejected same-day show cannot outrank the exact tier.
    let candidates = vec![candidate(ShowStatus::Rejected, None)];
    assert_eq!(
      classify(Some("Band A"), Some(existing), &candidates),
      Classification::Duplicate(existing.show_id)
    );
  }

  #[test]
  fn rejection_memory_fires_regardless_of_title_or_artist() {
    let rejected = candidate(ShowStatus::Rejected, Some("Someone Else"));
    let id = rejected.show_id;
    assert_eq!(
      classify(None, None, &[rejected]),
      Classification::Rejected(id)
    );
  }

  #[test]
  fn headliner_match_flags_for_review() {
    let shown = candidate(ShowStatus::Approved, Some("band a"));
    let id = shown.show_id;
    assert_eq!(
      classify(Some("Band A"), None, &[shown]),
      Classification::PendingReview(id)
    );
  }

  #[test]
  fn headliner_tier_requires_an_explicit_artist_list() {
    let shown = candidate(ShowStatus::Approved, Some("Band A"));
    assert_eq!(classify(None, None, &[shown]), Classification::Fresh);
  }

  #[test]
  fn headliner_tier_skips_private_shows() {
    let hidden = candidate(ShowStatus::Private, Some("Band A"));
    assert_eq!(
      classify(Some("Band A"), None, &[hidden]),
      Classification::Fresh
    );
  }

  #[test]
  fn different_headliner_same_day_is_fresh() {
    let shown = candidate(ShowStatus::Approved, Some("Band B"));
    assert_eq!(
      classify(Some("Band A"), None, &[shown]),
      Classification::Fresh
    );
  }

  #[test]
  fn empty_catalog_is_fresh() {
    assert_eq!(classify(Some("Band A"), None, &[]), Classification::Fresh);
  }
}
