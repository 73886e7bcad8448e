//! Persistence port for the session store.

use std::sync::Mutex;

use crate::error::{Result, SageError};
use crate::types::SessionStore;

/// Loads and saves the whole [`SessionStore`] as one unit.
pub trait SessionPersistence: Send + Sync {
    /// Read every stored session. An absent record yields an empty store.
    fn load_all(&self) -> Result<SessionStore>;

    /// Replace the stored sessions with `store`.
    fn save_all(&self, store: &SessionStore) -> Result<()>;
}

/// Keeps the serialized store in memory. Used by tests and `--ephemeral` runs.
#[derive(Default)]
pub struct InMemoryPersistence {
    record: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw serialized record, if anything was saved.
    pub fn raw(&self) -> Option<String> {
        self.record.lock().ok().and_then(|r| r.clone())
    }

    /// Number of `save_all` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|s| *s).unwrap_or(0)
    }
}

impl SessionPersistence for InMemoryPersistence {
    fn load_all(&self) -> Result<SessionStore> {
        let record = self.record.lock().map_err(lock_err)?;
        match record.as_deref() {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(SessionStore::new()),
        }
    }

    fn save_all(&self, store: &SessionStore) -> Result<()> {
        let raw = serde_json::to_string(store)?;
        *self.record.lock().map_err(lock_err)? = Some(raw);
        *self.saves.lock().map_err(lock_err)? += 1;
        Ok(())
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> SageError {
    SageError::Storage(format!("persistence lock poisoned: {}", e))
}
