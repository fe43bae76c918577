//! Day configuration store.
//!
//! [`DayConfigStore`] owns the mapping from [`DateKey`] to [`DayConfig`] and
//! resolves the effective configuration and required hours for each user.
//!
//! ## Write rules
//!
//! - Holidays and normal days replace whatever was stored for the date.
//! - A recovery day written over an existing recovery day merges the user
//!   lists (set union) and keeps every other stored field.
//! - Range operations apply the single-date rule to each day in the inclusive
//!   range as one update; an inverted range changes nothing.
//!
//! ## Persistence
//!
//! Every mutation computes the next state on a copy, hands it to the
//! [`DayConfigPersistence`] port, and only then replaces the in-memory state.
//! A failed save leaves the store exactly as it was.
//!
//! ## Usage
//!
//! ```
//! use jornada_core::date_key::DateKey;
//! use jornada_core::day_config::DayType;
//! use jornada_core::day_store::{DayConfigStore, MemoryPersistence};
//!
//! let mut store = DayConfigStore::load(MemoryPersistence::new()).unwrap();
//! let date: DateKey = "2026-01-10".parse().unwrap();
//!
//! store.set_day_config(date, DayType::Recovery, ["u1"]).unwrap();
//! assert_eq!(store.hours_for_user(date, "u1"), 9.0);
//! assert_eq!(store.hours_for_user(date, "u2"), 8.0);
//! ```

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info};

use crate::date_key::DateKey;
use crate::day_config::{DayConfig, DayConfigState, DayType, DEFAULT_REQUIRED_HOURS};

/// Boxed error raised by a persistence backend.
#[derive(Debug, Error)]
#[error("persistence failed: {0}")]
pub struct PersistenceError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl PersistenceError {
    /// Wraps a backend error.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum DayStoreError {
    /// Loading or saving the mapping failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, DayStoreError>;

/// Where the day mapping is loaded from and written back to.
pub trait DayConfigPersistence {
    /// Loads the stored mapping, or `None` when nothing has been saved yet.
    fn load(&self) -> std::result::Result<Option<DayConfigState>, PersistenceError>;

    /// Replaces the stored mapping.
    fn save(&self, state: &DayConfigState) -> std::result::Result<(), PersistenceError>;
}

impl<P: DayConfigPersistence + ?Sized> DayConfigPersistence for Arc<P> {
    fn load(&self) -> std::result::Result<Option<DayConfigState>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, state: &DayConfigState) -> std::result::Result<(), PersistenceError> {
        (**self).save(state)
    }
}

/// In-process persistence.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    state: Option<DayConfigState>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryPersistence {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds `state`.
    pub fn with_state(state: DayConfigState) -> Self {
        let persistence = Self::new();
        persistence.lock().state = Some(state);
        persistence
    }

    /// Last saved state.
    pub fn snapshot(&self) -> Option<DayConfigState> {
        self.lock().state.clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Makes every following save fail.
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        // The slot holds plain data; a poisoned lock still has a usable value.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DayConfigPersistence for MemoryPersistence {
    fn load(&self) -> std::result::Result<Option<DayConfigState>, PersistenceError> {
        Ok(self.lock().state.clone())
    }

    fn save(&self, state: &DayConfigState) -> std::result::Result<(), PersistenceError> {
        let mut slot = self.lock();
        if slot.fail_saves {
            return Err(PersistenceError::new("memory persistence set to fail"));
        }
        slot.state = Some(state.clone());
        slot.saves += 1;
        Ok(())
    }
}

/// Owner of the day configuration mapping.
pub struct DayConfigStore<P> {
    state: DayConfigState,
    persistence: P,
}

impl<P: DayConfigPersistence> DayConfigStore<P> {
    /// Loads the stored mapping, starting empty when nothing was saved.
    pub fn load(persistence: P) -> Result<Self> {
        let state = persistence.load()?.unwrap_or_default();
        info!(days = state.days.len(), "Loaded day configuration");
        Ok(Self { state, persistence })
    }

    /// Returns the persistence backend.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Current in-memory state.
    pub fn state(&self) -> &DayConfigState {
        &self.state
    }

    // ==================== Mutations ====================

    /// Configures a single date.
    ///
    /// `user_ids` is ignored unless `day_type` is [`DayType::Recovery`].
    pub fn set_day_config<I, S>(
        &mut self,
        date: impl Into<DateKey>,
        day_type: DayType,
        user_ids: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = date.into();
        let users: Vec<String> = user_ids.into_iter().map(Into::into).collect();

        let mut next = self.state.clone();
        apply_day_config(&mut next, key, day_type, &users);
        self.commit(next)?;

        info!(date = %key, day_type = %day_type, users = users.len(), "Day configured");
        Ok(())
    }

    /// Configures every date from `start` to `end` inclusive.
    ///
    /// An inverted range is a no-op and does not touch persistence.
    pub fn set_day_config_range<I, S>(
        &mut self,
        start: impl Into<DateKey>,
        end: impl Into<DateKey>,
        day_type: DayType,
        user_ids: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (start, end) = (start.into(), end.into());
        if start > end {
            debug!(%start, %end, "Ignoring inverted range");
            return Ok(());
        }

        let users: Vec<String> = user_ids.into_iter().map(Into::into).collect();
        let mut next = self.state.clone();
        let mut count = 0usize;
        for key in DateKey::range_inclusive(start, end) {
            apply_day_config(&mut next, key, day_type, &users);
            count += 1;
        }
        self.commit(next)?;

        info!(%start, %end, days = count, day_type = %day_type, "Day range configured");
        Ok(())
    }

    /// Removes the configuration for a date. Absent dates are not an error.
    pub fn remove_day_config(&mut self, date: impl Into<DateKey>) -> Result<()> {
        let key = date.into();
        let mut next = self.state.clone();
        let removed = next.days.remove(&key).is_some();
        self.commit(next)?;

        info!(date = %key, removed, "Day configuration removed");
        Ok(())
    }

    /// Removes every configuration from `start` to `end` inclusive.
    pub fn remove_day_config_range(
        &mut self,
        start: impl Into<DateKey>,
        end: impl Into<DateKey>,
    ) -> Result<()> {
        let (start, end) = (start.into(), end.into());
        if start > end {
            debug!(%start, %end, "Ignoring inverted range");
            return Ok(());
        }

        let mut next = self.state.clone();
        let removed = DateKey::range_inclusive(start, end)
            .filter(|key| next.days.remove(key).is_some())
            .count();
        self.commit(next)?;

        info!(%start, %end, removed, "Day range removed");
        Ok(())
    }

    /// Removes every configuration.
    pub fn clear_all_days(&mut self) -> Result<()> {
        let cleared = self.state.days.len();
        self.commit(DayConfigState::default())?;

        info!(cleared, "All day configurations cleared");
        Ok(())
    }

    /// Sets `horasRequeridas` of an existing entry, keeping its type and users.
    ///
    /// Returns `false` (and writes nothing) when the date has no entry.
    pub fn override_required_hours(
        &mut self,
        date: impl Into<DateKey>,
        hours: f64,
    ) -> Result<bool> {
        let key = date.into();
        if !self.state.days.contains_key(&key) {
            return Ok(false);
        }

        let mut next = self.state.clone();
        if let Some(config) = next.days.get_mut(&key) {
            config.required_hours = hours;
        }
        self.commit(next)?;

        info!(date = %key, hours, "Required hours overridden");
        Ok(true)
    }

    fn commit(&mut self, next: DayConfigState) -> Result<()> {
        self.persistence.save(&next)?;
        self.state = next;
        Ok(())
    }

    // ==================== Queries ====================

    /// Stored configuration for a date, ignoring per-user applicability.
    ///
    /// `None` means the date is a normal 8-hour day.
    pub fn day_config(&self, date: impl Into<DateKey>) -> Option<&DayConfig> {
        self.state.days.get(&date.into())
    }

    /// Configuration in effect for `user_id` on a date.
    ///
    /// Holidays resolve for everyone; a recovery day resolves only for the
    /// users it lists and is `None` for the rest.
    pub fn day_config_for_user(
        &self,
        date: impl Into<DateKey>,
        user_id: &str,
    ) -> Option<&DayConfig> {
        let config = self.day_config(date)?;

        if config.is_global {
            return Some(config);
        }

        match config.day_type {
            DayType::Recovery if !config.applies_to(user_id) => None,
            _ => Some(config),
        }
    }

    /// Hours `user_id` must log on a date.
    pub fn hours_for_user(&self, date: impl Into<DateKey>, user_id: &str) -> f64 {
        self.day_config_for_user(date, user_id)
            .map_or(DEFAULT_REQUIRED_HOURS, |config| config.required_hours)
    }

    /// Whether `user_id` has a recovery day on a date.
    pub fn has_recovery_for_user(&self, date: impl Into<DateKey>, user_id: &str) -> bool {
        self.day_config_for_user(date, user_id)
            .is_some_and(|config| config.day_type == DayType::Recovery)
    }

    /// Hours stored for a date regardless of which users it applies to.
    ///
    /// Reports a recovery day's 9 hours even to users outside its list; use
    /// [`hours_for_user`](Self::hours_for_user) when the user is known.
    pub fn hours_for_day(&self, date: impl Into<DateKey>) -> f64 {
        self.day_config(date)
            .map_or(DEFAULT_REQUIRED_HOURS, |config| config.required_hours)
    }

    /// All configurations in date order.
    pub fn days(&self) -> impl Iterator<Item = &DayConfig> {
        self.state.days.values()
    }

    /// Configurations dated from `start` to `end` inclusive.
    pub fn configs_between(
        &self,
        start: impl Into<DateKey>,
        end: impl Into<DateKey>,
    ) -> Vec<&DayConfig> {
        let (start, end) = (start.into(), end.into());
        if start > end {
            return Vec::new();
        }
        self.state.days.range(start..=end).map(|(_, c)| c).collect()
    }

    /// Number of configured dates.
    pub fn len(&self) -> usize {
        self.state.days.len()
    }

    /// Whether no date is configured.
    pub fn is_empty(&self) -> bool {
        self.state.days.is_empty()
    }
}

/// Applies the single-date write rule to `state`.
fn apply_day_config(state: &mut DayConfigState, key: DateKey, day_type: DayType, users: &[String]) {
    if let Some(existing) = state.days.get_mut(&key) {
        if existing.day_type == DayType::Recovery && day_type == DayType::Recovery {
            existing.merge_users(users.iter().cloned());
            return;
        }
    }

    state
        .days
        .insert(key, DayConfig::new(key, day_type, users.iter().cloned()));
}
