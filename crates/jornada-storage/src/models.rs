//! Data models for database entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A JSON document stored under a key.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Record key.
    pub key: String,
    /// Record value (JSON).
    pub value: serde_json::Value,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

/// Versioned wrapper around a persisted state value.
///
/// Serializes as `{"state": ..., "version": N}`, the layout the web client
/// writes to its own storage slot, so records can be copied across as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped state.
    pub state: T,
    /// Format version of `state`. Missing means 0.
    #[serde(default)]
    pub version: u32,
}

impl<T> Envelope<T> {
    /// Wraps `state` with the given version.
    pub fn new(state: T, version: u32) -> Self {
        Self { state, version }
    }
}
