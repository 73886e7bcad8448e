use thiserror::Error;

/// Top-level error type for the Sage system.
///
/// Subsystem crates define their own error types and implement
/// `From<SageError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<toml::de::Error> for SageError {
    fn from(err: toml::de::Error) -> Self {
        SageError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SageError {
    fn from(err: toml::ser::Error) -> Self {
        SageError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SageError {
    fn from(err: serde_json::Error) -> Self {
        SageError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Sage operations.
pub type Result<T> = std::result::Result<T, SageError>;
