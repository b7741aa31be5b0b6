//! Title billing extraction — deriving an ordered artist list from an event
//! title when the crawler supplies no structured list.
//!
//! These are deliberately simple text heuristics; anything smarter belongs
//! upstream in the crawler.

/// Ampersand halves shorter than this are assumed to be a single act's name
/// ("Tom & Jerry"), not two artists.
const AMPERSAND_MIN_LEN: usize = 10;

/// Split an event title into an ordered artist list. The first entry is the
/// headliner. Always returns at least one entry — the whole trimmed title
/// when no separator matches.
///
/// Rules, first match wins:
/// 1. a case-insensitive `" with "` splits headliner from openers; the
///    opener side is further comma-split ("A with B, C" → A, B, C);
/// 2. commas;
/// 3. `" / "`, `" | "`, `" + "`, in that order;
/// 4. `" & "`, only when both halves are long enough to be distinct acts;
/// 5. the whole title.
pub fn split_billing(title: &str) -> Vec<String> {
  let title = title.trim();

  if let Some(at) = title.to_ascii_lowercase().find(" with ") {
    let headliner = &title[..at];
    let openers = &title[at + " with ".len()..];
    let mut artists = vec![headliner.trim().to_string()];
    artists.extend(split_on_commas(openers));
    return dedup_empty(artists, title);
  }

  if title.contains(',') {
    return dedup_empty(split_on_commas(title), title);
  }

  for sep in [" / ", " | ", " + "] {
    if title.contains(sep) {
      let artists =
        title.split(sep).map(|a| a.trim().to_string()).collect();
      return dedup_empty(artists, title);
    }
  }

  if let Some((left, right)) = title.split_once(" & ") {
    let (left, right) = (left.trim(), right.trim());
    if left.len() > AMPERSAND_MIN_LEN && right.len() > AMPERSAND_MIN_LEN {
      return vec![left.to_string(), right.to_string()];
    }
  }

  vec![title.to_string()]
}

fn split_on_commas(text: &str) -> Vec<String> {
  text
    .split(',')
    .map(|a| a.trim().to_string())
    .filter(|a| !a.is_empty())
    .collect()
}

/// Never return an empty list or empty names; fall back to the whole title.
fn dedup_empty(mut artists: Vec<String>, title: &str) -> Vec<String> {
  artists.retain(|a| !a.is_empty());
  if artists.is_empty() {
    artists.push(title.to_string());
  }
  artists
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comma_separated_billing() {
    assert_eq!(split_billing("Band A, Band B"), vec!["Band A", "Band B"]);
  }

  #[test]
  fn with_splits_headliner_and_comma_separated_openers() {
    assert_eq!(
      split_billing("Band A with Band B, Band C"),
      vec!["Band A", "Band B", "Band C"]
    );
  }

  #[test]
  fn with_is_case_insensitive() {
    assert_eq!(
      split_billing("Band A WITH Band B"),
      vec!["Band A", "Band B"]
    );
  }

  #[test]
  fn slash_pipe_and_plus_separators() {
    assert_eq!(split_billing("Band A / Band B"), vec!["Band A", "Band B"]);
    assert_eq!(split_billing("Band A | Band B"), vec!["Band A", "Band B"]);
    assert_eq!(split_billing("Band A + Band B"), vec!["Band A", "Band B"]);
  }

  #[test]
  fn short_ampersand_halves_stay_one_artist() {
    assert_eq!(split_billing("Tom & Jerry"), vec!["Tom & Jerry"]);
  }

  #[test]
  fn long_ampersand_halves_split() {
    assert_eq!(
      split_billing("The Mountain Goats & Destroyer of Worlds"),
      vec!["The Mountain Goats", "Destroyer of Worlds"]
    );
  }

  #[test]
  fn no_separator_returns_whole_title() {
    assert_eq!(split_billing("  Solo Act  "), vec!["Solo Act"]);
  }

  #[test]
  fn empty_opener_side_falls_back_to_headliner_only() {
    assert_eq!(split_billing("Band A with ,"), vec!["Band A"]);
  }
}
