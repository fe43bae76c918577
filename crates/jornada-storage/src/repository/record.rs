//! Key/value record repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StorageError};
use crate::models::StoredRecord;

/// Repository for JSON records in `kv_store`.
pub struct RecordRepo;

impl RecordRepo {
    /// Get a record by key.
    pub fn get(conn: &Connection, key: &str) -> Result<Option<StoredRecord>> {
        let row = conn
            .query_row(
                "SELECT key, value, updated_at FROM kv_store WHERE key = ?1",
                [key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((key, value, updated_at)) = row else {
            return Ok(None);
        };

        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| StorageError::Config(format!("Bad timestamp on record {key:?}: {e}")))?
            .with_timezone(&Utc);

        Ok(Some(StoredRecord {
            value: serde_json::from_str(&value)?,
            key,
            updated_at,
        }))
    }

    /// Set a record (insert or replace), stamping the write time.
    pub fn set(conn: &Connection, key: &str, value: &serde_json::Value) -> Result<()> {
        let value_json = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value_json, now],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::run_migrations;
    use serde_json::json;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_set_and_get() {
        let conn = setup_db();

        RecordRepo::set(&conn, "slot", &json!({"a": 1})).unwrap();
        let record = RecordRepo::get(&conn, "slot").unwrap().unwrap();

        assert_eq!(record.key, "slot");
        assert_eq!(record.value, json!({"a": 1}));
        assert!(record.updated_at <= Utc::now());
    }

    #[test]
    fn test_update_existing() {
        let conn = setup_db();

        RecordRepo::set(&conn, "slot", &json!("original")).unwrap();
        RecordRepo::set(&conn, "slot", &json!("updated")).unwrap();

        let record = RecordRepo::get(&conn, "slot").unwrap().unwrap();
        assert_eq!(record.value, json!("updated"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let conn = setup_db();
        assert!(RecordRepo::get(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ('slot', '{not json', ?1)",
            [Utc::now().to_rfc3339()],
        )
        .unwrap();

        assert!(matches!(
            RecordRepo::get(&conn, "slot"),
            Err(StorageError::Json(_))
        ));
    }
}
