//! Session store persistence over a single named record.

use std::sync::Arc;

use rusqlite::OptionalExtension;
use tracing::debug;

use sage_core::error::SageError;
use sage_core::persistence::SessionPersistence;
use sage_core::types::SessionStore;

use crate::db::Database;

/// Name of the record holding the serialized session store.
pub const SESSIONS_RECORD: &str = "chatSessions";

/// Reads and writes the whole [`SessionStore`] as JSON in one record.
pub struct SessionRepository {
    db: Arc<Database>,
}

impl SessionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The raw stored JSON, if the record exists.
    pub fn raw(&self) -> Result<Option<String>, SageError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM records WHERE name = ?1",
                rusqlite::params![SESSIONS_RECORD],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| SageError::Storage(format!("Failed to read sessions: {}", e)))
        })
    }
}

impl SessionPersistence for SessionRepository {
    fn load_all(&self) -> Result<SessionStore, SageError> {
        match self.raw()? {
            Some(raw) => {
                let store: SessionStore = serde_json::from_str(&raw)?;
                debug!(sessions = store.len(), "Loaded session store");
                Ok(store)
            }
            None => Ok(SessionStore::new()),
        }
    }

    fn save_all(&self, store: &SessionStore) -> Result<(), SageError> {
        let raw = serde_json::to_string(store)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO records (name, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))
                 ON CONFLICT(name) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![SESSIONS_RECORD, raw],
            )
            .map_err(|e| SageError::Storage(format!("Failed to save sessions: {}", e)))?;
            Ok(())
        })?;
        debug!(sessions = store.len(), "Saved session store");
        Ok(())
    }
}
