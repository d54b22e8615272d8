use chrono::{DateTime as ZonedDateTime, NaiveDate};

use crate::prelude::*;

const DATE_TIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses the date strings clients send: RFC 3339 (normalized to UTC), ISO
/// date-times with or without seconds, or a bare date taken as midnight.
pub fn parse_date(input: &str) -> Option<DateTime> {
  let input = input.trim();

  if let Ok(zoned) = ZonedDateTime::parse_from_rfc3339(input) {
    return Some(zoned.naive_utc());
  }

  DATE_TIME_FORMATS
    .iter()
    .find_map(|fmt| DateTime::parse_from_str(input, fmt).ok())
    .or_else(|| {
      DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Lenient boolean for query strings.
pub fn parse_bool(input: &str) -> Option<bool> {
  match input.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" | "on" => Some(true),
    "false" | "0" | "no" | "off" => Some(false),
    _ => None,
  }
}
