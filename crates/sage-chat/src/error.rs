//! Error types for the conversational engine.

use sage_core::error::SageError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("speech capture is not supported in this environment")]
    CaptureUnsupported,
    #[error("speech capture failed: {0}")]
    CaptureFailed(String),
    #[error("voice error: {0}")]
    VoiceError(String),
    #[error("could not open URL: {0}")]
    UrlOpen(String),
    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<SageError> for ChatError {
    fn from(err: SageError) -> Self {
        ChatError::StorageError(err.to_string())
    }
}

/// Failures talking to a knowledge provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The provider answered with an unexpected status code.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The body was not the JSON shape we expect.
    #[error("parse error: {0}")]
    Parse(String),
}
