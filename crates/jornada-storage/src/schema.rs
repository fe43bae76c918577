//! Database schema and migrations.
//!
//! Migrations are listed in order and applied in one transaction each; the
//! `schema_version` table records the last one applied.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::Result;

/// A single schema step.
struct Migration {
    version: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "key/value store",
    // One JSON document per key, mirroring the web client's storage slots.
    sql: "CREATE TABLE IF NOT EXISTS kv_store (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL
          );",
}];

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Applies every migration newer than the recorded version.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;
    if current >= SCHEMA_VERSION {
        return Ok(());
    }

    info!(from = current, to = SCHEMA_VERSION, "Running migrations");

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(
            version = migration.version,
            "Applying migration: {}", migration.description
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [migration.version],
        )?;
        tx.commit()?;
    }

    info!("Migrations complete");
    Ok(())
}

/// Recorded schema version, 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        [],
    )?;

    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten();

    Ok(version.unwrap_or(0))
}
