//! API request and response models.
//!
//! Dates and times arrive as strings and are parsed in the handlers, so a
//! malformed value is reported as a 400 with the offending input.

use jornada_core::activity::Activity;
use jornada_core::date_key::DateKey;
use jornada_core::day_config::{DayConfig, DayType};
use jornada_core::time_validation::TimeRange;
use serde::{Deserialize, Serialize};

/// Query parameters for GET /api/days.
#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    /// First day to include (requires `to`).
    pub from: Option<String>,
    /// Last day to include (requires `from`).
    pub to: Option<String>,
}

/// Response body listing day configurations.
#[derive(Debug, Serialize)]
pub struct DaysResponse {
    pub days: Vec<DayConfig>,
}

/// Request body for PUT /api/days/{date}.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDayRequest {
    #[serde(rename = "type")]
    pub day_type: DayType,
    /// Users a recovery day applies to; required for recovery, ignored otherwise.
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// Request body for POST /api/days/range.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRangeRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub day_type: DayType,
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// Query parameters for DELETE /api/days/range.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

/// Request body for PUT /api/days/{date}/hours.
#[derive(Debug, Deserialize)]
pub struct OverrideHoursRequest {
    pub hours: f64,
}

/// Query parameters for GET /api/days/{date}/hours.
#[derive(Debug, Default, Deserialize)]
pub struct HoursQuery {
    /// Resolve for this user; without it the stored hours are reported.
    pub user: Option<String>,
}

/// Response body for GET /api/days/{date}/hours.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursResponse {
    pub date: DateKey,
    pub required_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Only reported when a user was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_recovery: Option<bool>,
    /// Configuration in effect (for the user, when given).
    pub config: Option<DayConfig>,
}

/// Request body for POST /api/activities/validate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRangeRequest {
    pub start_time: String,
    pub end_time: String,
    /// Activities already logged that day.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Request body for POST /api/activities/suggestions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Slot length (default: 60).
    pub duration_minutes: Option<u16>,
}

/// Response body for POST /api/activities/suggestions.
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub slots: Vec<TimeRange>,
}

/// Request body for POST /api/activities/check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSubmissionRequest {
    pub user_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}
