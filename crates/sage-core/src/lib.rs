//! Shared types, configuration, and errors for the Sage assistant.

pub mod config;
pub mod error;
pub mod persistence;
pub mod types;

pub use config::SageConfig;
pub use error::{Result, SageError};
pub use persistence::{InMemoryPersistence, SessionPersistence};
pub use types::*;
