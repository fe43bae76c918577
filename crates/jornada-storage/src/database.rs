//! High-level database interface.

use std::path::PathBuf;

use directories::ProjectDirs;
use jornada_core::day_config::DayConfigState;
use jornada_core::day_store::{DayConfigPersistence, PersistenceError};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::{Envelope, StoredRecord};
use crate::pool::ConnectionPool;
use crate::repository::RecordRepo;

/// Record holding the day configuration mapping.
pub const DAY_CONFIG_KEY: &str = "day-config-storage";

/// Newest day configuration format this build reads and writes.
pub const DAY_CONFIG_VERSION: u32 = 0;

/// High-level database interface for Jornada.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing and ephemeral runs).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "jornada", "jornada")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("jornada.db"))
    }

    // === Records ===

    /// Get a raw record.
    pub fn get_record(&self, key: &str) -> Result<Option<StoredRecord>> {
        let conn = self.pool.get()?;
        RecordRepo::get(&conn, key)
    }

    /// Set a raw record.
    pub fn set_record(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.pool.get()?;
        RecordRepo::set(&conn, key, value)
    }

    // === Day configuration ===

    /// Read the stored day configuration, if any.
    ///
    /// Refuses records written by a newer format version.
    pub fn load_day_config(&self) -> Result<Option<DayConfigState>> {
        let Some(record) = self.get_record(DAY_CONFIG_KEY)? else {
            debug!("No stored day configuration");
            return Ok(None);
        };

        let version = record
            .value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if version > u64::from(DAY_CONFIG_VERSION) {
            return Err(StorageError::UnsupportedVersion {
                key: DAY_CONFIG_KEY.to_string(),
                found: u32::try_from(version).unwrap_or(u32::MAX),
                supported: DAY_CONFIG_VERSION,
            });
        }

        let envelope: Envelope<DayConfigState> = serde_json::from_value(record.value)?;
        Ok(Some(envelope.state))
    }

    /// Replace the stored day configuration.
    pub fn save_day_config(&self, state: &DayConfigState) -> Result<()> {
        let value = serde_json::to_value(Envelope::new(state, DAY_CONFIG_VERSION))?;
        self.set_record(DAY_CONFIG_KEY, &value)?;
        debug!(days = state.days.len(), "Saved day configuration");
        Ok(())
    }
}

impl DayConfigPersistence for Database {
    fn load(&self) -> std::result::Result<Option<DayConfigState>, PersistenceError> {
        self.load_day_config().map_err(PersistenceError::new)
    }

    fn save(&self, state: &DayConfigState) -> std::result::Result<(), PersistenceError> {
        self.save_day_config(state).map_err(PersistenceError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jornada_core::date_key::DateKey;
    use jornada_core::day_config::DayType;
    use jornada_core::day_store::{DayConfigStore, DayStoreError};
    use serde_json::json;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_database_has_no_config() {
        let db = Database::in_memory().unwrap();
        assert!(db.load_day_config().unwrap().is_none());
    }

    #[test]
    fn test_records_are_independent() {
        let db = Database::in_memory().unwrap();

        db.set_record("theme", &json!("dark")).unwrap();
        assert_eq!(db.get_record("theme").unwrap().unwrap().value, json!("dark"));
        assert!(db.load_day_config().unwrap().is_none());
    }

    #[test]
    fn test_envelope_layout() {
        let db = Database::in_memory().unwrap();
        let mut store = DayConfigStore::load(db.clone()).unwrap();
        store
            .set_day_config(key("2026-01-10"), DayType::Recovery, ["u1"])
            .unwrap();

        let record = db.get_record(DAY_CONFIG_KEY).unwrap().unwrap();
        assert_eq!(
            record.value,
            json!({
                "state": {
                    "days": {
                        "2026-01-10": {
                            "date": "2026-01-10",
                            "type": "recuperacion",
                            "horasRequeridas": 9.0,
                            "aplicadoA": ["u1"],
                            "isGlobal": false
                        }
                    }
                },
                "version": 0
            })
        );
    }

    #[test]
    fn test_reads_record_written_by_web_client() {
        let db = Database::in_memory().unwrap();
        db.set_record(
            DAY_CONFIG_KEY,
            &json!({
                "state": {
                    "days": {
                        "2026-01-01": {"date": "2026-01-01", "type": "feriado", "horasRequeridas": 0, "isGlobal": true}
                    }
                },
                "version": 0
            }),
        )
        .unwrap();

        let store = DayConfigStore::load(db).unwrap();
        assert_eq!(store.hours_for_user(key("2026-01-01"), "anyone"), 0.0);
    }

    #[test]
    fn test_missing_version_reads_as_zero() {
        let db = Database::in_memory().unwrap();
        db.set_record(DAY_CONFIG_KEY, &json!({"state": {"days": {}}}))
            .unwrap();

        assert!(db.load_day_config().unwrap().unwrap().days.is_empty());
    }

    #[test]
    fn test_newer_version_refused() {
        let db = Database::in_memory().unwrap();
        db.set_record(DAY_CONFIG_KEY, &json!({"state": {"days": {}}, "version": 3}))
            .unwrap();

        match db.load_day_config() {
            Err(StorageError::UnsupportedVersion {
                found, supported, ..
            }) => {
                assert_eq!(found, 3);
                assert_eq!(supported, DAY_CONFIG_VERSION);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }

        assert!(matches!(
            DayConfigStore::load(db),
            Err(DayStoreError::Persistence(_))
        ));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jornada.db");

        {
            let db = Database::with_path(&path).unwrap();
            let mut store = DayConfigStore::load(db).unwrap();
            store
                .set_day_config(key("2026-01-01"), DayType::Holiday, Vec::<String>::new())
                .unwrap();
            store
                .set_day_config_range(key("2026-01-10"), key("2026-01-11"), DayType::Recovery, ["u1"])
                .unwrap();
        }

        let db = Database::with_path(&path).unwrap();
        let store = DayConfigStore::load(db).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.hours_for_day(key("2026-01-01")), 0.0);
        assert!(store.has_recovery_for_user(key("2026-01-11"), "u1"));
        assert!(!store.has_recovery_for_user(key("2026-01-11"), "u2"));
    }

    #[test]
    fn test_clear_persists_empty_mapping() {
        let db = Database::in_memory().unwrap();
        let mut store = DayConfigStore::load(db.clone()).unwrap();
        store
            .set_day_config(key("2026-01-01"), DayType::Holiday, Vec::<String>::new())
            .unwrap();
        store.clear_all_days().unwrap();

        let reloaded = db.load_day_config().unwrap().unwrap();
        assert!(reloaded.days.is_empty());
    }
}
