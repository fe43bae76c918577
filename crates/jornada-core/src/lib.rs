//! Jornada Core - Day configuration, quotas, and time-range validation.
//!
//! This crate holds the domain logic of the Jornada attendance platform:
//!
//! - Calendar-day keys normalized from dates and timestamps
//! - Special days (holidays, per-user recovery days) and their required hours
//! - The day configuration store behind a pluggable persistence port
//! - Overlap detection, logged/remaining hours, and free-slot suggestions
//! - The combined check that gates a new activity submission
//!
//! # Example
//!
//! ```
//! use jornada_core::{DateKey, DayConfigStore, DayType, MemoryPersistence};
//! use jornada_core::time_validation::{time_ranges_overlap, ClockTime};
//!
//! let mut store = DayConfigStore::load(MemoryPersistence::new()).unwrap();
//! let new_year: DateKey = "2026-01-01".parse().unwrap();
//! store.set_day_config(new_year, DayType::Holiday, Vec::<String>::new()).unwrap();
//! assert_eq!(store.hours_for_day(new_year), 0.0);
//!
//! let t = |s: &str| s.parse::<ClockTime>().unwrap();
//! assert!(!time_ranges_overlap(t("09:00"), t("10:00"), t("10:00"), t("11:00")));
//! ```

pub mod activity;
pub mod admission;
pub mod date_key;
pub mod day_config;
pub mod day_store;
pub mod time_validation;

pub use activity::{Activity, ActivityReview, ActivityStats, ActivityStatus, ReviewStatus};
pub use admission::{check_submission, RejectionReason, SubmissionVerdict};
pub use date_key::{DateKey, DateKeyError};
pub use day_config::{DayConfig, DayConfigState, DayType, DEFAULT_REQUIRED_HOURS};
pub use day_store::{
    DayConfigPersistence, DayConfigStore, DayStoreError, MemoryPersistence, PersistenceError,
};
pub use time_validation::{ClockTime, TimeFormatError, TimeRange, TimeRangeValidation};
