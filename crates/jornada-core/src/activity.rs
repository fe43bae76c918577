//! Logged activities and supervisor review.
//!
//! Activities are owned by the activity API; this crate only reads their
//! start and end timestamps for quota and overlap checks, plus the status
//! for summary statistics.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::date_key::{parse_naive_datetime, DateKey};

/// Lifecycle status of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// Logged, not yet finished.
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    /// Finished.
    #[serde(rename = "Completada")]
    Completed,
    /// Cancelled.
    #[serde(rename = "Cancelada")]
    Cancelled,
}

/// An activity a worker logged.
///
/// Both timestamps fall on the same calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Identifier assigned by the activity API.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// When the activity started.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_date: NaiveDateTime,
    /// When the activity ended.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end_date: NaiveDateTime,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ActivityStatus,
    /// Owner, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Activity {
    /// Creates a pending activity.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            start_date,
            end_date,
            status: ActivityStatus::Pending,
            user_id: None,
        }
    }

    /// Sets the owner.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ActivityStatus) -> Self {
        self.status = status;
        self
    }

    /// Duration in minutes, including fractions from seconds.
    pub fn duration_minutes(&self) -> f64 {
        (self.end_date - self.start_date).num_seconds() as f64 / 60.0
    }

    /// Calendar day the activity starts on.
    pub fn date(&self) -> DateKey {
        DateKey::from(self.start_date)
    }
}

/// Accepts naive timestamps and the browser's `toISOString` form
/// (`2026-01-10T09:30:00.000Z`), keeping the time as written.
fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_naive_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw:?}")))
}

/// Formats fractional hours as `Xh Ym`.
pub fn format_hours(hours: f64) -> String {
    let whole = hours.floor();
    let mut h = whole as i64;
    let mut m = ((hours - whole) * 60.0).round() as i64;
    if m == 60 {
        h += 1;
        m = 0;
    }
    format!("{h}h {m}m")
}

/// Groups activities by the calendar day they start on.
pub fn group_by_date(activities: &[Activity]) -> BTreeMap<DateKey, Vec<&Activity>> {
    let mut grouped: BTreeMap<DateKey, Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        grouped.entry(activity.date()).or_default().push(activity);
    }
    grouped
}

/// Summary of a list of activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_hours: f64,
    pub total_activities: usize,
    pub completed_activities: usize,
    pub pending_activities: usize,
    pub formatted_hours: String,
}

impl ActivityStats {
    /// Computes the summary.
    pub fn from_activities(activities: &[Activity]) -> Self {
        let total_minutes: f64 = activities.iter().map(Activity::duration_minutes).sum();
        let total_hours = total_minutes / 60.0;
        let count = |status| activities.iter().filter(|a| a.status == status).count();

        Self {
            total_hours,
            total_activities: activities.len(),
            completed_activities: count(ActivityStatus::Completed),
            pending_activities: count(ActivityStatus::Pending),
            formatted_hours: format_hours(total_hours),
        }
    }
}

/// Supervisor decision on an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Review errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// A rejection must say why.
    #[error("a rejection requires an observation")]
    MissingObservation,
}

/// A supervisor's review of one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReview {
    pub activity_id: String,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl ActivityReview {
    /// Starts a pending review.
    pub fn new(activity_id: impl Into<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            status: ReviewStatus::Pending,
            observation: None,
        }
    }

    /// Approves the activity.
    pub fn approve(&mut self) {
        self.status = ReviewStatus::Approved;
        self.observation = None;
    }

    /// Rejects the activity with a non-blank observation.
    pub fn reject(&mut self, observation: &str) -> Result<(), ReviewError> {
        let observation = observation.trim();
        if observation.is_empty() {
            return Err(ReviewError::MissingObservation);
        }
        self.status = ReviewStatus::Rejected;
        self.observation = Some(observation.to_string());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::time_validation::{occupied_time_ranges, TimeRange};

    /// Activity on 2026-01-10 between two `HH:mm` times.
    pub(crate) fn activity_at(id: &str, start: &str, end: &str) -> Activity {
        activity_on("2026-01-10", id, start, end)
    }

    pub(crate) fn activity_on(date: &str, id: &str, start: &str, end: &str) -> Activity {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let at = |t: &str| {
            let (h, m) = t.split_once(':').unwrap();
            day.and_hms_opt(h.parse().unwrap(), m.parse().unwrap(), 0)
                .unwrap()
        };
        Activity::new(id, format!("Activity {id}"), at(start), at(end))
    }

    #[test]
    fn duration_in_minutes() {
        assert_eq!(activity_at("1", "09:00", "10:30").duration_minutes(), 90.0);
        assert_eq!(activity_at("2", "09:34", "13:27").duration_minutes(), 233.0);
    }

    #[test]
    fn format_hours_rounds_minutes() {
        assert_eq!(format_hours(0.0), "0h 0m");
        assert_eq!(format_hours(2.5), "2h 30m");
        assert_eq!(format_hours(8.0 + 50.0 / 60.0), "8h 50m");
        assert_eq!(format_hours(1.9999), "2h 0m");
    }

    #[test]
    fn stats_summary() {
        let activities = vec![
            activity_at("1", "09:00", "10:30").with_status(ActivityStatus::Completed),
            activity_at("2", "11:00", "12:00"),
            activity_at("3", "13:00", "13:45").with_status(ActivityStatus::Cancelled),
        ];

        let stats = ActivityStats::from_activities(&activities);
        assert_eq!(stats.total_hours, 3.25);
        assert_eq!(stats.total_activities, 3);
        assert_eq!(stats.completed_activities, 1);
        assert_eq!(stats.pending_activities, 1);
        assert_eq!(stats.formatted_hours, "3h 15m");
    }

    #[test]
    fn stats_empty() {
        let stats = ActivityStats::from_activities(&[]);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.total_activities, 0);
        assert_eq!(stats.formatted_hours, "0h 0m");
    }

    #[test]
    fn groups_by_start_day() {
        let activities = vec![
            activity_on("2026-01-11", "b", "08:00", "09:00"),
            activity_on("2026-01-10", "a", "08:00", "09:00"),
            activity_on("2026-01-11", "c", "10:00", "11:00"),
        ];

        let grouped = group_by_date(&activities);
        let days: Vec<String> = grouped.keys().map(ToString::to_string).collect();
        assert_eq!(days, vec!["2026-01-10", "2026-01-11"]);

        let ids: Vec<&str> = grouped[&"2026-01-11".parse().unwrap()]
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn wire_format() {
        let activity = activity_at("1", "09:34", "13:27").with_user("u1");
        let json = serde_json::to_value(&activity).unwrap();

        assert_eq!(json["startDate"], "2026-01-10T09:34:00");
        assert_eq!(json["endDate"], "2026-01-10T13:27:00");
        assert_eq!(json["status"], "Pendiente");
        assert_eq!(json["userId"], "u1");

        let back: Activity = serde_json::from_value(json).unwrap();
        assert_eq!(back, activity);
    }

    #[test]
    fn reads_minimal_activity() {
        let raw = r#"{"id":"7","title":"Standup","startDate":"2026-01-10T09:00:00","endDate":"2026-01-10T09:15:00"}"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.status, ActivityStatus::Pending);
        assert!(activity.user_id.is_none());
        assert_eq!(activity.duration_minutes(), 15.0);
    }

    #[test]
    fn reads_browser_timestamps() {
        let raw = r#"{"id":"8","title":"Review","startDate":"2026-01-10T09:30:00.000Z","endDate":"2026-01-10T11:00:00.000Z"}"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();

        assert_eq!(activity.date().to_string(), "2026-01-10");
        assert_eq!(activity.duration_minutes(), 90.0);

        let ranges = occupied_time_ranges(std::slice::from_ref(&activity));
        let expected = TimeRange::new("09:30".parse().unwrap(), "11:00".parse().unwrap());
        assert_eq!(ranges, vec![expected]);
    }

    #[test]
    fn rejects_unparseable_timestamp() {
        let raw = r#"{"id":"9","title":"Bad","startDate":"yesterday","endDate":"2026-01-10T11:00:00"}"#;
        assert!(serde_json::from_str::<Activity>(raw).is_err());
    }

    #[test]
    fn approve_review() {
        let mut review = ActivityReview::new("1");
        assert_eq!(review.status, ReviewStatus::Pending);

        review.approve();
        assert_eq!(review.status, ReviewStatus::Approved);
        assert!(review.observation.is_none());
    }

    #[test]
    fn reject_requires_observation() {
        let mut review = ActivityReview::new("1");

        assert_eq!(review.reject("   "), Err(ReviewError::MissingObservation));
        assert_eq!(review.status, ReviewStatus::Pending);

        review.reject(" Duplicated entry ").unwrap();
        assert_eq!(review.status, ReviewStatus::Rejected);
        assert_eq!(review.observation.as_deref(), Some("Duplicated entry"));
    }
}
