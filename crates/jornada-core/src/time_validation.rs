//! Time-of-day validation for activity entries.
//!
//! Pure functions over a day's activity list: overlap detection between
//! `HH:mm` ranges, logged/remaining hours, and free-slot suggestions inside
//! the working day.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::Activity;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Start of the working day used for suggestions (08:00).
pub const WORKDAY_START_MINUTES: u16 = 8 * 60;

/// End of the working day used for suggestions (18:00).
pub const WORKDAY_END_MINUTES: u16 = 18 * 60;

/// Default length of a suggested slot.
pub const DEFAULT_SLOT_MINUTES: u16 = 60;

/// Maximum number of suggested slots.
pub const MAX_SUGGESTIONS: usize = 3;

/// Malformed `HH:mm` input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    /// Not two digits, a colon, two digits.
    #[error("time must be HH:mm, got {0:?}")]
    Format(String),

    /// Hour or minute outside the clock.
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

fn hh_mm() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("valid HH:mm pattern"))
}

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Creates a clock time, or `None` if outside 00:00..=23:59.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Creates a clock time from minutes since midnight, wrapping past 24:00.
    pub fn from_minutes(minutes: u16) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    /// Creates a clock time from a chrono time, dropping seconds.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn to_minutes(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = hh_mm()
            .captures(s)
            .ok_or_else(|| TimeFormatError::Format(s.to_string()))?;

        let hour: u8 = caps[1]
            .parse()
            .map_err(|_| TimeFormatError::Format(s.to_string()))?;
        let minute: u8 = caps[2]
            .parse()
            .map_err(|_| TimeFormatError::Format(s.to_string()))?;

        Self::new(hour, minute).ok_or_else(|| TimeFormatError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// A time-of-day span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    /// Creates a range.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Whether this range overlaps `other`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        time_ranges_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Outcome of checking a candidate range against a day's activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_activity: Option<Activity>,
}

/// Parses `HH:mm` into minutes since midnight.
pub fn time_to_minutes(time: &str) -> Result<u16, TimeFormatError> {
    time.parse::<ClockTime>().map(|t| t.to_minutes())
}

/// Formats minutes since midnight as zero-padded `HH:mm`.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Whether range 1 overlaps range 2.
///
/// True when range 1 starts inside `[start2, end2)`, ends inside
/// `(start2, end2]`, or contains range 2. Touching boundaries do not overlap.
pub fn time_ranges_overlap(
    start1: ClockTime,
    end1: ClockTime,
    start2: ClockTime,
    end2: ClockTime,
) -> bool {
    let (s1, e1) = (start1.to_minutes(), end1.to_minutes());
    let (s2, e2) = (start2.to_minutes(), end2.to_minutes());

    (s1 >= s2 && s1 < e2) || (e1 > s2 && e1 <= e2) || (s1 <= s2 && e1 >= e2)
}

/// Time-of-day span of each activity, in input order. The date is ignored.
pub fn occupied_time_ranges(activities: &[Activity]) -> Vec<TimeRange> {
    activities
        .iter()
        .map(|activity| {
            TimeRange::new(
                ClockTime::from_naive_time(activity.start_date.time()),
                ClockTime::from_naive_time(activity.end_date.time()),
            )
        })
        .collect()
}

/// Checks a candidate range against existing activities.
///
/// Activities are checked in list order and the first conflict is reported.
pub fn validate_time_range(
    start: ClockTime,
    end: ClockTime,
    existing: &[Activity],
) -> TimeRangeValidation {
    let conflict = occupied_time_ranges(existing)
        .iter()
        .position(|range| time_ranges_overlap(start, end, range.start, range.end));

    match conflict {
        Some(index) => TimeRangeValidation {
            is_valid: false,
            conflicting_activity: Some(existing[index].clone()),
        },
        None => TimeRangeValidation {
            is_valid: true,
            conflicting_activity: None,
        },
    }
}

/// Total logged hours, from the actual timestamp differences.
pub fn calculate_total_hours(activities: &[Activity]) -> f64 {
    let minutes: f64 = activities.iter().map(Activity::duration_minutes).sum();
    minutes / 60.0
}

/// Hours still to log against `required_hours`. Never negative.
pub fn remaining_hours(activities: &[Activity], required_hours: f64) -> f64 {
    (required_hours - calculate_total_hours(activities)).max(0.0)
}

/// Up to [`MAX_SUGGESTIONS`] free slots of `duration_minutes` between 08:00 and 18:00.
///
/// Walks occupied ranges by start time with a cursor that only moves forward,
/// offering the cursor position whenever the slot fits before the next range,
/// then once more after the last range if the slot ends by 18:00.
pub fn suggested_time_slots(activities: &[Activity], duration_minutes: u16) -> Vec<TimeRange> {
    let mut occupied = occupied_time_ranges(activities);
    occupied.sort_by_key(|range| range.start);

    let duration = u32::from(duration_minutes);
    let mut cursor = u32::from(WORKDAY_START_MINUTES);
    let mut suggestions = Vec::new();

    let slot = |from: u32| {
        TimeRange::new(
            ClockTime::from_minutes(from as u16),
            ClockTime::from_minutes((from + duration) as u16),
        )
    };

    for range in &occupied {
        if cursor + duration <= u32::from(range.start.to_minutes()) {
            suggestions.push(slot(cursor));
        }
        cursor = cursor.max(u32::from(range.end.to_minutes()));
    }

    if cursor + duration <= u32::from(WORKDAY_END_MINUTES) {
        suggestions.push(slot(cursor));
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
