//! Special calendar days and their required hours.
//!
//! A date without a stored [`DayConfig`] is a normal working day requiring
//! [`DEFAULT_REQUIRED_HOURS`] for every user.
//!
//! - **Holiday** (`feriado`): global, 0 hours, blocks activity registration.
//! - **Recovery** (`recuperacion`): make-up day, 9 hours, applies only to the
//!   users listed in `aplicadoA`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date_key::DateKey;

/// Hours required on a date with no stored configuration.
pub const DEFAULT_REQUIRED_HOURS: f64 = 8.0;

/// Kind of calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayType {
    /// Regular working day.
    #[default]
    #[serde(rename = "normal")]
    Normal,
    /// Global holiday.
    #[serde(rename = "feriado")]
    Holiday,
    /// Per-user make-up day.
    #[serde(rename = "recuperacion")]
    Recovery,
}

impl DayType {
    /// Required hours a fresh configuration of this type starts with.
    pub fn default_hours(&self) -> f64 {
        match self {
            DayType::Normal => DEFAULT_REQUIRED_HOURS,
            DayType::Holiday => 0.0,
            DayType::Recovery => 9.0,
        }
    }

    /// Whether this type applies to every user regardless of `aplicadoA`.
    pub fn is_global(&self) -> bool {
        matches!(self, DayType::Holiday)
    }

    /// Whether a configuration of this type needs at least one user.
    pub fn requires_users(&self) -> bool {
        matches!(self, DayType::Recovery)
    }

    /// Persisted name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Normal => "normal",
            DayType::Holiday => "feriado",
            DayType::Recovery => "recuperacion",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unknown day type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day type: {0:?} (expected normal, feriado or recuperacion)")]
pub struct ParseDayTypeError(String);

impl FromStr for DayType {
    type Err = ParseDayTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(DayType::Normal),
            "feriado" | "holiday" => Ok(DayType::Holiday),
            "recuperacion" | "recuperación" | "recovery" => Ok(DayType::Recovery),
            _ => Err(ParseDayTypeError(s.to_string())),
        }
    }
}

/// Stored configuration for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
    /// The day this entry is keyed by.
    pub date: DateKey,
    /// Kind of day.
    #[serde(rename = "type")]
    pub day_type: DayType,
    /// Required hours; starts at the type default but is stored independently.
    #[serde(rename = "horasRequeridas")]
    pub required_hours: f64,
    /// Users a recovery day applies to. `None` for holidays and normal days.
    #[serde(rename = "aplicadoA", default, skip_serializing_if = "Option::is_none")]
    pub applied_to: Option<BTreeSet<String>>,
    /// True iff the day is a holiday.
    #[serde(rename = "isGlobal")]
    pub is_global: bool,
}

impl DayConfig {
    /// Builds a fresh configuration.
    ///
    /// `users` is kept only for recovery days.
    pub fn new<I, S>(date: DateKey, day_type: DayType, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let applied_to = match day_type {
            DayType::Recovery => Some(users.into_iter().map(Into::into).collect()),
            DayType::Normal | DayType::Holiday => None,
        };

        Self {
            date,
            day_type,
            required_hours: day_type.default_hours(),
            applied_to,
            is_global: day_type.is_global(),
        }
    }

    /// Whether this configuration is in effect for `user_id`.
    pub fn applies_to(&self, user_id: &str) -> bool {
        if self.is_global {
            return true;
        }
        match self.day_type {
            DayType::Recovery => self
                .applied_to
                .as_ref()
                .is_some_and(|users| users.contains(user_id)),
            DayType::Normal | DayType::Holiday => true,
        }
    }

    /// Adds users to `aplicadoA`, ignoring ones already present.
    pub fn merge_users<I, S>(&mut self, users: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applied_to
            .get_or_insert_with(BTreeSet::new)
            .extend(users.into_iter().map(Into::into));
    }

    /// Number of users a recovery day applies to.
    pub fn user_count(&self) -> usize {
        self.applied_to.as_ref().map_or(0, BTreeSet::len)
    }
}

/// The persisted mapping from date to configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayConfigState {
    /// Configured days keyed by date.
    #[serde(default)]
    pub days: BTreeMap<DateKey, DayConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn default_hours_table() {
        assert_eq!(DayType::Normal.default_hours(), 8.0);
        assert_eq!(DayType::Recovery.default_hours(), 9.0);
        assert_eq!(DayType::Holiday.default_hours(), 0.0);
    }

    #[test]
    fn only_holiday_is_global() {
        assert!(DayType::Holiday.is_global());
        assert!(!DayType::Recovery.is_global());
        assert!(!DayType::Normal.is_global());
    }

    #[test]
    fn only_recovery_requires_users() {
        assert!(DayType::Recovery.requires_users());
        assert!(!DayType::Holiday.requires_users());
        assert!(!DayType::Normal.requires_users());
    }

    #[test]
    fn parse_day_type() {
        assert_eq!("feriado".parse::<DayType>().unwrap(), DayType::Holiday);
        assert_eq!("Holiday".parse::<DayType>().unwrap(), DayType::Holiday);
        assert_eq!(
            "recuperacion".parse::<DayType>().unwrap(),
            DayType::Recovery
        );
        assert_eq!("recovery".parse::<DayType>().unwrap(), DayType::Recovery);
        assert_eq!(" normal ".parse::<DayType>().unwrap(), DayType::Normal);
        assert!("vacaciones".parse::<DayType>().is_err());
    }

    #[test]
    fn holiday_drops_users() {
        let config = DayConfig::new(key("2026-01-01"), DayType::Holiday, ["u1", "u2"]);
        assert!(config.is_global);
        assert_eq!(config.required_hours, 0.0);
        assert!(config.applied_to.is_none());
    }

    #[test]
    fn normal_drops_users() {
        let config = DayConfig::new(key("2026-01-02"), DayType::Normal, ["u1"]);
        assert!(!config.is_global);
        assert_eq!(config.required_hours, 8.0);
        assert!(config.applied_to.is_none());
    }

    #[test]
    fn recovery_dedupes_users() {
        let config = DayConfig::new(key("2026-01-10"), DayType::Recovery, ["a", "b", "a"]);
        assert!(!config.is_global);
        assert_eq!(config.required_hours, 9.0);
        assert_eq!(config.user_count(), 2);
    }

    #[test]
    fn applies_to_users() {
        let recovery = DayConfig::new(key("2026-01-10"), DayType::Recovery, ["u1"]);
        assert!(recovery.applies_to("u1"));
        assert!(!recovery.applies_to("u2"));

        let holiday = DayConfig::new(key("2026-01-01"), DayType::Holiday, Vec::<String>::new());
        assert!(holiday.applies_to("anyone"));
    }

    #[test]
    fn merge_is_set_union() {
        let mut config = DayConfig::new(key("2026-01-10"), DayType::Recovery, ["A", "B"]);
        config.merge_users(["B", "C"]);

        let users: Vec<&str> = config
            .applied_to
            .as_ref()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(users, vec!["A", "B", "C"]);
    }

    #[test]
    fn serialized_field_names() {
        let config = DayConfig::new(key("2026-01-10"), DayType::Recovery, ["u1"]);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["date"], "2026-01-10");
        assert_eq!(json["type"], "recuperacion");
        assert_eq!(json["horasRequeridas"], 9.0);
        assert_eq!(json["aplicadoA"][0], "u1");
        assert_eq!(json["isGlobal"], false);
    }

    #[test]
    fn holiday_omits_user_list() {
        let config = DayConfig::new(key("2026-01-01"), DayType::Holiday, Vec::<String>::new());
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("aplicadoA").is_none());
        assert_eq!(json["isGlobal"], true);
    }

    #[test]
    fn state_reads_browser_layout() {
        let raw = r#"{
            "days": {
                "2026-01-01": {"date": "2026-01-01", "type": "feriado", "horasRequeridas": 0, "isGlobal": true},
                "2026-01-10": {"date": "2026-01-10", "type": "recuperacion", "horasRequeridas": 9, "aplicadoA": ["u1"], "isGlobal": false}
            }
        }"#;

        let state: DayConfigState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.days.len(), 2);

        let recovery = &state.days[&key("2026-01-10")];
        assert_eq!(recovery.day_type, DayType::Recovery);
        assert!(recovery.applies_to("u1"));

        let holiday = &state.days[&key("2026-01-01")];
        assert_eq!(holiday.required_hours, 0.0);
    }

    #[test]
    fn empty_state_deserializes() {
        let state: DayConfigState = serde_json::from_str("{}").unwrap();
        assert!(state.days.is_empty());
    }
}
