//! Canonical calendar-day keys.
//!
//! Every store operation normalizes its date input to a [`DateKey`] before
//! lookup or mutation, so lookups never depend on a time-of-day component.
//!
//! All inputs are treated as naive calendar dates: a timestamp contributes
//! the date written in it (in its own offset), never a date shifted into UTC
//! or the host's local zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Canonical key format.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Naive timestamp formats accepted when parsing a key from text.
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Errors produced while normalizing a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateKeyError {
    /// The input is not a recognizable date.
    #[error("invalid date: {0:?}")]
    Invalid(String),
}

/// A calendar day, formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Creates a key from year, month and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Every calendar day from `start` to `end`, both inclusive.
    ///
    /// An inverted range (`start > end`) yields nothing.
    pub fn range_inclusive(start: DateKey, end: DateKey) -> impl Iterator<Item = DateKey> {
        let days = (end.0 - start.0).num_days();
        (0..=days).map(move |offset| DateKey(start.0 + Duration::days(offset)))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(input, DATE_KEY_FORMAT) {
            return Ok(Self(date));
        }

        parse_naive_datetime(input)
            .map(|datetime| Self(datetime.date()))
            .ok_or_else(|| DateKeyError::Invalid(s.to_string()))
    }
}

/// Parses a timestamp, keeping the wall-clock date and time as written.
///
/// Naive formats are tried first, then RFC 3339. An offset (including `Z`)
/// is dropped rather than applied; converting to UTC would move late-evening
/// timestamps onto the next day.
pub(crate) fn parse_naive_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|datetime| datetime.naive_local())
        })
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for DateKey {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateKey {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self(datetime.date_naive())
    }
}

impl From<&DateKey> for DateKey {
    fn from(key: &DateKey) -> Self {
        *key
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn parses_plain_date() {
        let k = key("2026-01-10");
        assert_eq!(k.date(), NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert_eq!(k.to_string(), "2026-01-10");
    }

    #[test]
    fn strips_time_of_day() {
        assert_eq!(key("2026-01-10T09:34:00"), key("2026-01-10"));
        assert_eq!(key("2026-01-10T23:59"), key("2026-01-10"));
        assert_eq!(key("2026-01-10 00:00:01"), key("2026-01-10"));
        assert_eq!(key("2026-01-10T08:00:00.250"), key("2026-01-10"));
    }

    #[test]
    fn rfc3339_keeps_written_date() {
        // 23:30 at -05:00 is already the 11th in UTC; the key stays on the 10th.
        assert_eq!(key("2026-01-10T23:30:00-05:00"), key("2026-01-10"));
        assert_eq!(key("2026-01-10T00:15:00+09:00"), key("2026-01-10"));
    }

    #[test]
    fn timestamps_keep_wall_clock_time() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert_eq!(parse_naive_datetime("2026-01-10T09:30:00"), Some(expected));
        assert_eq!(
            parse_naive_datetime("2026-01-10T09:30:00.000Z"),
            Some(expected)
        );
        assert_eq!(
            parse_naive_datetime("2026-01-10T09:30:00-05:00"),
            Some(expected)
        );
        assert_eq!(parse_naive_datetime("2026-01-10"), None);
        assert_eq!(parse_naive_datetime("09:30"), None);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("".parse::<DateKey>().is_err());
        assert!("10/01/2026".parse::<DateKey>().is_err());
        assert!("2026-13-01".parse::<DateKey>().is_err());
        assert!("2026-02-30".parse::<DateKey>().is_err());

        let err = "tomorrow".parse::<DateKey>().unwrap_err();
        assert_eq!(err, DateKeyError::Invalid("tomorrow".to_string()));
    }

    #[test]
    fn from_chrono_values() {
        let naive = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(DateKey::from(naive), key("2026-03-01"));

        let datetime = naive.and_hms_opt(17, 45, 0).unwrap();
        assert_eq!(DateKey::from(datetime), key("2026-03-01"));

        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let zoned = offset.from_local_datetime(&datetime).unwrap();
        assert_eq!(DateKey::from(zoned), key("2026-03-01"));
    }

    #[test]
    fn range_is_inclusive() {
        let days: Vec<String> = DateKey::range_inclusive(key("2026-01-05"), key("2026-01-07"))
            .map(|d| d.to_string())
            .collect();
        assert_eq!(days, vec!["2026-01-05", "2026-01-06", "2026-01-07"]);
    }

    #[test]
    fn range_single_day() {
        let days: Vec<DateKey> =
            DateKey::range_inclusive(key("2026-01-05"), key("2026-01-05")).collect();
        assert_eq!(days, vec![key("2026-01-05")]);
    }

    #[test]
    fn range_inverted_is_empty() {
        let days: Vec<DateKey> =
            DateKey::range_inclusive(key("2026-01-07"), key("2026-01-05")).collect();
        assert!(days.is_empty());
    }

    #[test]
    fn range_crosses_month_and_leap_day() {
        let days: Vec<String> = DateKey::range_inclusive(key("2028-02-28"), key("2028-03-01"))
            .map(|d| d.to_string())
            .collect();
        assert_eq!(days, vec!["2028-02-28", "2028-02-29", "2028-03-01"]);
    }

    #[test]
    fn ordering_follows_calendar() {
        assert!(key("2025-12-31") < key("2026-01-01"));
        assert!(key("2026-01-09") < key("2026-01-10T00:00:00"));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&key("2026-01-10")).unwrap();
        assert_eq!(json, "\"2026-01-10\"");

        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key("2026-01-10"));

        assert!(serde_json::from_str::<DateKey>("\"not a date\"").is_err());
    }
}
