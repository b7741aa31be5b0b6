//! Date/time resolution — combining a calendar date and a free-text show
//! time into a single UTC instant in the venue's local timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::{
  error::{Error, Result},
  timezone::timezone_for_state,
};

/// Resolve an event's start instant.
///
/// The date cascade tries, in order: a bare calendar date (`%Y-%m-%d`), an
/// RFC 3339 timestamp, then `%Y-%m-%dT%H:%M:%S`; timestamp forms contribute
/// only their calendar date. A time that is absent or unparseable silently
/// resolves to midnight UTC on that date — lenient by policy, since many
/// venues publish dates without reliable times. An unparseable date is a
/// hard error.
pub fn resolve_start_time(
  date: &str,
  time: Option<&str>,
  state: &str,
) -> Result<DateTime<Utc>> {
  let day = parse_event_date(date)
    .ok_or_else(|| Error::UnparseableDate(date.to_string()))?;

  let Some((hour, minute)) = time.and_then(parse_show_time) else {
    return Ok(midnight_utc(day));
  };

  let clock = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
  let local = day.and_time(clock);
  let tz = timezone_for_state(state);

  // `earliest` picks the first wall-clock occurrence across a DST fold; a
  // time skipped by a DST gap falls back to midnight UTC like an
  // unparseable one.
  match tz.from_local_datetime(&local).earliest() {
    Some(resolved) => Ok(resolved.with_timezone(&Utc)),
    None => Ok(midnight_utc(day)),
  }
}

fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
  Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

fn parse_event_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Some(day);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
    return Some(dt.date());
  }
  None
}

/// Parse a free-text show time of the shape `H:MM` followed immediately by a
/// meridiem marker, case-insensitive, ignoring internal whitespace
/// ("7:00 pm", "11:30PM", "7 : 00 pm"). Returns a 24-hour (hour, minute).
fn parse_show_time(raw: &str) -> Option<(u32, u32)> {
  let compact: String = raw
    .chars()
    .filter(|c| !c.is_whitespace())
    .collect::<String>()
    .to_ascii_lowercase();

  let (clock, pm) = compact
    .strip_suffix("am")
    .map(|c| (c, false))
    .or_else(|| compact.strip_suffix("pm").map(|c| (c, true)))?;

  let (hour, minute) = clock.split_once(':')?;
  let hour: u32 = hour.parse().ok()?;
  let minute: u32 = minute.parse().ok()?;
  if !(1..=12).contains(&hour) || minute > 59 {
    return None;
  }

  let hour = match (hour, pm) {
    (12, false) => 0,
    (12, true) => 12,
    (h, false) => h,
    (h, true) => h + 12,
  };
  Some((hour, minute))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn evening_show_in_arizona_converts_to_utc() {
    // Phoenix is UTC-7 year-round.
    let instant =
      resolve_start_time("2026-01-25", Some("7:00 pm"), "AZ").unwrap();
    assert_eq!(instant.to_rfc3339(), "2026-01-26T02:00:00+00:00");
  }

  #[test]
  fn missing_time_resolves_to_midnight_utc() {
    let instant = resolve_start_time("2026-01-25", None, "AZ").unwrap();
    assert_eq!(instant.to_rfc3339(), "2026-01-25T00:00:00+00:00");
  }

  #[test]
  fn unparseable_time_falls_back_to_midnight_utc() {
    let instant =
      resolve_start_time("2026-01-25", Some("doors at dusk"), "AZ").unwrap();
    assert_eq!(instant.to_rfc3339(), "2026-01-25T00:00:00+00:00");
  }

  #[test]
  fn rfc3339_date_contributes_only_its_calendar_date() {
    let instant =
      resolve_start_time("2026-01-25T19:00:00-07:00", None, "AZ").unwrap();
    assert_eq!(instant.to_rfc3339(), "2026-01-25T00:00:00+00:00");
  }

  #[test]
  fn naive_timestamp_date_accepted() {
    let instant =
      resolve_start_time("2026-01-25T19:00:00", None, "CA").unwrap();
    assert_eq!(instant.to_rfc3339(), "2026-01-25T00:00:00+00:00");
  }

  #[test]
  fn unparseable_date_is_a_hard_error() {
    let err = resolve_start_time("next friday", None, "CA").unwrap_err();
    assert!(matches!(err, Error::UnparseableDate(_)));
  }

  #[test]
  fn midnight_and_noon_meridiem_handling() {
    assert_eq!(parse_show_time("12:00 am"), Some((0, 0)));
    assert_eq!(parse_show_time("12:30 pm"), Some((12, 30)));
    assert_eq!(parse_show_time("1:00 pm"), Some((13, 0)));
    assert_eq!(parse_show_time("11:59PM"), Some((23, 59)));
  }

  #[test]
  fn internal_whitespace_is_ignored() {
    assert_eq!(parse_show_time("7 : 00 PM"), Some((19, 0)));
  }

  #[test]
  fn out_of_range_times_rejected() {
    assert_eq!(parse_show_time("13:00 pm"), None);
    assert_eq!(parse_show_time("0:30 am"), None);
    assert_eq!(parse_show_time("7:75 pm"), None);
    assert_eq!(parse_show_time("7:00"), None);
  }
}
