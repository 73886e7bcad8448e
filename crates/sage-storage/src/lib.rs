//! Sage storage crate - SQLite persistence and history export.
//!
//! The whole session store lives in one named record of a WAL-mode SQLite
//! database. Export writes the same store as pretty-printed JSON.

pub mod db;
pub mod export;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use export::{export_sessions, render_export};
pub use repository::{SessionRepository, SESSIONS_RECORD};
