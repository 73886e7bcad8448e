//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access.
//! Configures WAL mode and recommended PRAGMAs on initialization.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use sage_core::error::SageError;

use crate::migrations;

/// Thread-safe SQLite database wrapper.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path and run migrations.
    pub fn new(path: &Path) -> Result<Self, SageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| SageError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| SageError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!("Database opened at {}", path.display());
        Self::migrated(conn)
    }

    /// Open an in-memory database (for testing and ephemeral runs).
    pub fn in_memory() -> Result<Self, SageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SageError::Storage(format!("Failed to open in-memory db: {}", e)))?;
        Self::migrated(conn)
    }

    fn migrated(conn: Connection) -> Result<Self, SageError> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Execute a closure with the underlying connection while holding the lock.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, SageError>
    where
        F: FnOnce(&Connection) -> Result<T, SageError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SageError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
