//! Application state for the API server.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jornada_core::day_store::{DayConfigStore, DayStoreError};
use jornada_storage::Database;

use crate::error::{ApiError, Result};

/// Day configuration store backed by the database.
pub type DayStore = DayConfigStore<Database>;

/// Shared application state.
///
/// Writes are serialized through the lock; concurrent writers from other
/// processes are not coordinated and the last save wins.
#[derive(Clone)]
pub struct AppState {
    /// Day configuration store.
    pub store: Arc<RwLock<DayStore>>,
}

impl AppState {
    /// Creates application state around a loaded store.
    pub fn new(store: DayStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Loads the store from `db`.
    pub fn from_database(db: Database) -> std::result::Result<Self, DayStoreError> {
        Ok(Self::new(DayConfigStore::load(db)?))
    }

    /// Creates application state with a fresh in-memory database.
    pub fn in_memory() -> std::result::Result<Self, crate::ServerError> {
        let db = Database::in_memory()?;
        Ok(Self::from_database(db)?)
    }

    /// Shared access for queries.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, DayStore>> {
        self.store
            .read()
            .map_err(|_| ApiError::Internal("day store lock poisoned".to_string()))
    }

    /// Exclusive access for mutations.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, DayStore>> {
        self.store
            .write()
            .map_err(|_| ApiError::Internal("day store lock poisoned".to_string()))
    }
}
