//! API route handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info};

use jornada_core::admission::{check_submission, SubmissionVerdict};
use jornada_core::date_key::DateKey;
use jornada_core::day_config::{DayConfig, DayType};
use jornada_core::time_validation::{
    suggested_time_slots, validate_time_range, ClockTime, TimeRangeValidation,
    DEFAULT_SLOT_MINUTES,
};

use crate::error::{ApiError, Result};
use crate::models::{
    CheckSubmissionRequest, DaysQuery, DaysResponse, HoursQuery, HoursResponse,
    OverrideHoursRequest, RangeQuery, SetDayRequest, SetRangeRequest, SuggestionsRequest,
    SuggestionsResponse, ValidateRangeRequest,
};
use crate::state::AppState;

fn parse_date(raw: &str) -> Result<DateKey> {
    Ok(raw.parse::<DateKey>()?)
}

fn parse_time(raw: &str) -> Result<ClockTime> {
    Ok(raw.parse::<ClockTime>()?)
}

fn check_users(day_type: DayType, users: &[String]) -> Result<()> {
    if day_type.requires_users() && users.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "`{day_type}` days need at least one user in `userIds`"
        )));
    }
    Ok(())
}

// === Days ===

/// GET /api/days - List configured days, optionally within `from..=to`.
pub async fn list_days(
    State(state): State<AppState>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<DaysResponse>> {
    let store = state.read()?;

    let days: Vec<DayConfig> = match (query.from.as_deref(), query.to.as_deref()) {
        (None, None) => store.days().cloned().collect(),
        (Some(from), Some(to)) => store
            .configs_between(parse_date(from)?, parse_date(to)?)
            .into_iter()
            .cloned()
            .collect(),
        _ => {
            return Err(ApiError::BadRequest(
                "`from` and `to` must be given together".to_string(),
            ))
        }
    };

    Ok(Json(DaysResponse { days }))
}

/// DELETE /api/days - Remove every configuration.
pub async fn clear_days(State(state): State<AppState>) -> Result<StatusCode> {
    state.write()?.clear_all_days()?;
    info!("Cleared all day configurations via API");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/days/{date} - Stored configuration, `null` when the day is normal.
pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Option<DayConfig>>> {
    let key = parse_date(&date)?;
    let store = state.read()?;
    Ok(Json(store.day_config(key).cloned()))
}

/// PUT /api/days/{date} - Configure a single day.
pub async fn set_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<SetDayRequest>,
) -> Result<Json<DayConfig>> {
    let key = parse_date(&date)?;
    check_users(req.day_type, &req.user_ids)?;
    debug!(date = %key, day_type = %req.day_type, "Setting day via API");

    let mut store = state.write()?;
    store.set_day_config(key, req.day_type, req.user_ids)?;

    store
        .day_config(key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::Internal(format!("configuration for {key} missing after write")))
}

/// DELETE /api/days/{date} - Remove a single day's configuration.
pub async fn remove_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode> {
    let key = parse_date(&date)?;
    state.write()?.remove_day_config(key)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/days/range - Configure every day in an inclusive range.
pub async fn set_range(
    State(state): State<AppState>,
    Json(req): Json<SetRangeRequest>,
) -> Result<Json<DaysResponse>> {
    let start = parse_date(&req.start_date)?;
    let end = parse_date(&req.end_date)?;
    check_users(req.day_type, &req.user_ids)?;

    let mut store = state.write()?;
    store.set_day_config_range(start, end, req.day_type, req.user_ids)?;

    let days = store
        .configs_between(start, end)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(DaysResponse { days }))
}

/// DELETE /api/days/range - Remove every configuration in an inclusive range.
pub async fn remove_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<StatusCode> {
    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    state.write()?.remove_day_config_range(start, end)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/days/{date}/hours - Override required hours of an existing entry.
pub async fn override_hours(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<OverrideHoursRequest>,
) -> Result<Json<DayConfig>> {
    let key = parse_date(&date)?;
    if !req.hours.is_finite() || req.hours < 0.0 {
        return Err(ApiError::BadRequest(format!(
            "hours must be a non-negative number, got {}",
            req.hours
        )));
    }

    let mut store = state.write()?;
    if !store.override_required_hours(key, req.hours)? {
        return Err(ApiError::NotFound(format!("no configuration for {key}")));
    }

    store
        .day_config(key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::Internal(format!("configuration for {key} missing after write")))
}

/// GET /api/days/{date}/hours - Required hours, per user when `user` is given.
pub async fn get_hours(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<HoursQuery>,
) -> Result<Json<HoursResponse>> {
    let key = parse_date(&date)?;
    let store = state.read()?;

    let response = match query.user {
        Some(user) => HoursResponse {
            date: key,
            required_hours: store.hours_for_user(key, &user),
            has_recovery: Some(store.has_recovery_for_user(key, &user)),
            config: store.day_config_for_user(key, &user).cloned(),
            user_id: Some(user),
        },
        None => HoursResponse {
            date: key,
            required_hours: store.hours_for_day(key),
            user_id: None,
            has_recovery: None,
            config: store.day_config(key).cloned(),
        },
    };

    Ok(Json(response))
}

// === Activities ===

/// POST /api/activities/validate - Check a range against the day's activities.
pub async fn validate_range(
    Json(req): Json<ValidateRangeRequest>,
) -> Result<Json<TimeRangeValidation>> {
    let start = parse_time(&req.start_time)?;
    let end = parse_time(&req.end_time)?;
    Ok(Json(validate_time_range(start, end, &req.activities)))
}

/// POST /api/activities/suggestions - Free slots in the working day.
pub async fn suggest_slots(
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>> {
    let duration = req.duration_minutes.unwrap_or(DEFAULT_SLOT_MINUTES);
    if duration == 0 {
        return Err(ApiError::BadRequest(
            "durationMinutes must be positive".to_string(),
        ));
    }

    Ok(Json(SuggestionsResponse {
        slots: suggested_time_slots(&req.activities, duration),
    }))
}

/// POST /api/activities/check - Decide whether a new activity may be logged.
pub async fn check_activity(
    State(state): State<AppState>,
    Json(req): Json<CheckSubmissionRequest>,
) -> Result<Json<SubmissionVerdict>> {
    let date = parse_date(&req.date)?;
    let start = parse_time(&req.start_time)?;
    let end = parse_time(&req.end_time)?;

    let store = state.read()?;
    let verdict = check_submission(&*store, &req.user_id, date, start, end, &req.activities);
    Ok(Json(verdict))
}
