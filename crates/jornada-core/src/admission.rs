//! Activity submission gate.
//!
//! Combines the day configuration with time validation to decide whether a
//! worker may register a new activity.
//!
//! ## Evaluation Order
//!
//! 1. Holiday for the user: registration is blocked outright
//! 2. Empty or inverted time range
//! 3. Overlap with an existing activity (first in list order)
//! 4. Requested hours above what remains of the user's quota
//!
//! The first failing check decides the verdict.

use serde::Serialize;
use tracing::debug;

use crate::activity::Activity;
use crate::date_key::DateKey;
use crate::day_config::DayType;
use crate::day_store::{DayConfigPersistence, DayConfigStore};
use crate::time_validation::{remaining_hours, validate_time_range, ClockTime};

/// Slack when comparing requested hours with the remaining quota.
const QUOTA_TOLERANCE_HOURS: f64 = 1e-9;

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectionReason {
    /// The date is a holiday.
    Holiday,
    /// End time is not after start time.
    EmptyRange,
    /// The range overlaps an activity already logged that day.
    Conflict {
        /// The first overlapping activity.
        activity: Activity,
    },
    /// The range needs more hours than the user has left.
    #[serde(rename_all = "camelCase")]
    ExceedsQuota {
        requested_hours: f64,
        remaining_hours: f64,
    },
}

/// Outcome of a submission check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SubmissionVerdict {
    /// The activity may be registered.
    #[serde(rename_all = "camelCase")]
    Accepted {
        /// Hours the user must log that day.
        required_hours: f64,
        /// Hours still missing once this activity is logged.
        remaining_hours_after: f64,
    },
    /// The activity must not be registered.
    Rejected(RejectionReason),
}

impl SubmissionVerdict {
    /// Returns true if the submission was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionVerdict::Accepted { .. })
    }

    /// Rejection reason, if any.
    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            SubmissionVerdict::Rejected(reason) => Some(reason),
            SubmissionVerdict::Accepted { .. } => None,
        }
    }
}

/// Checks whether `user_id` may log `start`..`end` on `date`.
///
/// `existing` holds the activities the user already logged that day.
pub fn check_submission<P: DayConfigPersistence>(
    store: &DayConfigStore<P>,
    user_id: &str,
    date: impl Into<DateKey>,
    start: ClockTime,
    end: ClockTime,
    existing: &[Activity],
) -> SubmissionVerdict {
    let key = date.into();

    let verdict = evaluate(store, user_id, key, start, end, existing);
    debug!(date = %key, user_id, %start, %end, accepted = verdict.is_accepted(), "Submission checked");
    verdict
}

fn evaluate<P: DayConfigPersistence>(
    store: &DayConfigStore<P>,
    user_id: &str,
    key: DateKey,
    start: ClockTime,
    end: ClockTime,
    existing: &[Activity],
) -> SubmissionVerdict {
    let config = store.day_config_for_user(key, user_id);
    if config.is_some_and(|c| c.day_type == DayType::Holiday) {
        return SubmissionVerdict::Rejected(RejectionReason::Holiday);
    }

    if end <= start {
        return SubmissionVerdict::Rejected(RejectionReason::EmptyRange);
    }

    if let Some(activity) = validate_time_range(start, end, existing).conflicting_activity {
        return SubmissionVerdict::Rejected(RejectionReason::Conflict { activity });
    }

    let required_hours = store.hours_for_user(key, user_id);
    let remaining = remaining_hours(existing, required_hours);
    let requested_hours = f64::from(end.to_minutes() - start.to_minutes()) / 60.0;

    if requested_hours > remaining + QUOTA_TOLERANCE_HOURS {
        return SubmissionVerdict::Rejected(RejectionReason::ExceedsQuota {
            requested_hours,
            remaining_hours: remaining,
        });
    }

    SubmissionVerdict::Accepted {
        required_hours,
        remaining_hours_after: (remaining - requested_hours).max(0.0),
    }
}
