//! Voice capture gate.
//!
//! Wraps a [`Listener`] so that capture is refused up front when no backend
//! exists and only one capture runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::effects::{Listener, UnsupportedListener};
use crate::error::ChatError;

/// Voice capture state.
pub struct VoiceInterface {
    listener: Arc<dyn Listener>,
    active: AtomicBool,
}

/// Clears the active flag when a capture ends, however it ends.
struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl VoiceInterface {
    pub fn new(listener: Arc<dyn Listener>) -> Self {
        Self {
            listener,
            active: AtomicBool::new(false),
        }
    }

    /// Check if voice capture is available at all.
    pub fn is_available(&self) -> bool {
        self.listener.is_available()
    }

    /// Whether a capture is in progress.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Capture one utterance.
    ///
    /// Returns [`ChatError::CaptureUnsupported`] without touching the
    /// listener when no backend is available.
    pub async fn capture(&self) -> Result<String, ChatError> {
        if !self.is_available() {
            return Err(ChatError::CaptureUnsupported);
        }
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ChatError::VoiceError(
                "Voice capture is already active".to_string(),
            ));
        }
        let _guard = ActiveGuard(&self.active);

        let transcript = self.listener.listen().await?;
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(ChatError::CaptureFailed("empty transcript".to_string()));
        }
        tracing::debug!(chars = transcript.len(), "Voice transcript captured");
        Ok(transcript.to_string())
    }
}

impl Default for VoiceInterface {
    fn default() -> Self {
        Self::new(Arc::new(UnsupportedListener))
    }
}

// =============================================================================
// Tests
// =============================================================================
