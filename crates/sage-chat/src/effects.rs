//! Side-effect ports: rendering, speech output, speech capture and URL opening.
//!
//! The orchestrator only talks to these traits. The binary supplies terminal
//! and process-backed implementations; the defaults here do nothing useful
//! and keep tests and headless runs quiet.

use async_trait::async_trait;
use sage_core::types::{Message, Sender};
use url::Url;

use crate::error::ChatError;

/// Link shown under an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub label: String,
    pub url: String,
}

/// A message as it should appear on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub sender: Sender,
    pub text: String,
    pub thumbnail_url: Option<String>,
    pub source: Option<SourceLink>,
}

impl RenderedMessage {
    pub fn plain(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            thumbnail_url: None,
            source: None,
        }
    }
}

impl From<&Message> for RenderedMessage {
    fn from(message: &Message) -> Self {
        Self::plain(message.sender, message.content.clone())
    }
}

/// Displays messages.
pub trait Renderer: Send + Sync {
    fn render(&self, message: &RenderedMessage);

    /// Called before a session's history is replayed.
    fn clear(&self) {}
}

/// Text-to-speech output.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), ChatError>;
}

/// One-shot speech capture.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Whether capture can be attempted at all.
    fn is_available(&self) -> bool;

    /// Capture one utterance and return its transcript.
    async fn listen(&self) -> Result<String, ChatError>;
}

/// Opens a URL outside the assistant.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), ChatError>;
}

/// Reject anything but absolute `http://` and `https://` URLs.
pub fn validate_url(url: &str) -> Result<Url, ChatError> {
    let parsed =
        Url::parse(url).map_err(|e| ChatError::UrlOpen(format!("invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => Err(ChatError::UrlOpen(format!(
            "unsupported URL scheme {scheme:?}; only http and https are allowed"
        ))),
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _message: &RenderedMessage) {}
}

/// Speech output turned off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

#[async_trait]
impl Speaker for SilentSpeaker {
    async fn speak(&self, text: &str) -> Result<(), ChatError> {
        tracing::trace!(text, "Speech disabled");
        Ok(())
    }
}

/// No capture backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedListener;

#[async_trait]
impl Listener for UnsupportedListener {
    fn is_available(&self) -> bool {
        false
    }

    async fn listen(&self) -> Result<String, ChatError> {
        Err(ChatError::CaptureUnsupported)
    }
}

/// Validates and logs the URL without launching anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingUrlOpener;

#[async_trait]
impl UrlOpener for LoggingUrlOpener {
    async fn open(&self, url: &str) -> Result<(), ChatError> {
        validate_url(url)?;
        tracing::info!(url = %url, "Opened URL");
        Ok(())
    }
}
