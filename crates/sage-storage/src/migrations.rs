//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use sage_core::error::SageError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), SageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| SageError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| SageError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: named_records");
    }

    Ok(())
}

/// Version 1: named key/value records.
fn apply_v1(conn: &Connection) -> Result<(), SageError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS records (
            name        TEXT PRIMARY KEY NOT NULL,
            value       TEXT NOT NULL,
            updated_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        INSERT INTO schema_migrations (version, name) VALUES (1, 'named_records');
        ",
    )
    .map_err(|e| SageError::Storage(format!("Migration v1 failed: {}", e)))
}
