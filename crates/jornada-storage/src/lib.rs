//! Jornada Storage - SQLite persistence layer.
//!
//! This crate stores Jornada's state as JSON documents in a local SQLite
//! database, one record per key. The day configuration lives in the
//! `day-config-storage` record as `{"state": {"days": {...}}, "version": 0}`.
//!
//! [`Database`] implements the core [`DayConfigPersistence`] port, so it can
//! back a [`DayConfigStore`] directly.
//!
//! # Example
//!
//! ```no_run
//! use jornada_core::{DateKey, DayConfigStore, DayType};
//! use jornada_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//! let mut store = DayConfigStore::load(db).unwrap();
//!
//! let date: DateKey = "2026-05-01".parse().unwrap();
//! store.set_day_config(date, DayType::Holiday, Vec::<String>::new()).unwrap();
//! ```
//!
//! [`DayConfigPersistence`]: jornada_core::DayConfigPersistence
//! [`DayConfigStore`]: jornada_core::DayConfigStore

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::{Database, DAY_CONFIG_KEY, DAY_CONFIG_VERSION};
pub use error::{Result, StorageError};
pub use models::{Envelope, StoredRecord};
pub use pool::ConnectionPool;
pub use repository::RecordRepo;
