//! Export of the whole conversation history to a JSON file.

use std::path::{Path, PathBuf};

use tracing::info;

use sage_core::error::SageError;
use sage_core::types::SessionStore;

/// Pretty-printed JSON of every session, keyed by session id.
pub fn render_export(store: &SessionStore) -> Result<String, SageError> {
    serde_json::to_string_pretty(store).map_err(|e| SageError::Export(e.to_string()))
}

/// Write the export to `path`, creating parent directories as needed.
pub fn export_sessions(store: &SessionStore, path: &Path) -> Result<PathBuf, SageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = render_export(store)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), sessions = store.len(), "Exported chat history");
    Ok(path.to_path_buf())
}
