//! State-code to timezone resolution.
//!
//! Venue coverage is assumed complete enough that an unknown state should
//! still produce a usable (if imprecise) timestamp, so unmatched codes
//! resolve to [`DEFAULT_TZ`] rather than failing.

use chrono_tz::Tz;

/// The fallback timezone for unrecognised state codes.
pub const DEFAULT_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Resolve a two-letter state/region code to an IANA timezone.
///
/// States that span multiple zones map to the zone covering the bulk of
/// their population.
pub fn timezone_for_state(state: &str) -> Tz {
  match state.to_ascii_uppercase().as_str() {
    "CT" | "DC" | "DE" | "FL" | "GA" | "IN" | "KY" | "MA" | "MD" | "ME"
    | "MI" | "NC" | "NH" | "NJ" | "NY" | "OH" | "PA" | "RI" | "SC" | "VA"
    | "VT" | "WV" => chrono_tz::America::New_York,
    "AL" | "AR" | "IA" | "IL" | "KS" | "LA" | "MN" | "MO" | "MS" | "ND"
    | "NE" | "OK" | "SD" | "TN" | "TX" | "WI" => chrono_tz::America::Chicago,
    "CO" | "ID" | "MT" | "NM" | "UT" | "WY" => chrono_tz::America::Denver,
    // Arizona does not observe DST.
    "AZ" => chrono_tz::America::Phoenix,
    "CA" | "NV" | "OR" | "WA" => chrono_tz::America::Los_Angeles,
    "AK" => chrono_tz::America::Anchorage,
    "HI" => chrono_tz::Pacific::Honolulu,
    _ => DEFAULT_TZ,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
