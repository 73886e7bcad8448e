//! Chat orchestrator: central coordinator wiring intent matching, knowledge
//! resolution, conversation state and the side-effect ports.
//!
//! Every command runs normalize → match → dispatch and ends in exactly one
//! assistant reply that is rendered, spoken, appended and persisted.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use sage_core::config::ChatConfig;
use sage_core::persistence::SessionPersistence;
use sage_core::types::{Message, SessionId, SessionStore, SessionSummary};

use crate::effects::{
    validate_url, Listener, LoggingUrlOpener, NoopRenderer, RenderedMessage, Renderer,
    SilentSpeaker, Speaker, UrlOpener,
};
use crate::error::ChatError;
use crate::intent::{Intent, IntentMatcher};
use crate::normalize::normalize;
use crate::resolver::KnowledgeResolver;
use crate::response::{AssistantReply, GREETING};
use crate::state::ConversationState;
use crate::voice::VoiceInterface;

/// Central chat orchestrator.
///
/// Shared behind an `Arc`; commands may run concurrently. State is guarded by
/// a plain mutex that is never held across a provider call.
pub struct ChatOrchestrator {
    matcher: IntentMatcher,
    resolver: KnowledgeResolver,
    state: Mutex<ConversationState>,
    persistence: Arc<dyn SessionPersistence>,
    renderer: Arc<dyn Renderer>,
    speaker: Arc<dyn Speaker>,
    opener: Arc<dyn UrlOpener>,
    voice: VoiceInterface,
    config: ChatConfig,
}

impl ChatOrchestrator {
    /// Load the stored sessions and pick the current one.
    ///
    /// Fails only if the stored record cannot be read.
    pub fn new(
        resolver: KnowledgeResolver,
        persistence: Arc<dyn SessionPersistence>,
        config: ChatConfig,
    ) -> Result<Self, ChatError> {
        let store = persistence.load_all()?;
        tracing::info!(sessions = store.len(), "Loaded chat sessions");

        let state = ConversationState::start(store, config.resume_latest, Utc::now());
        tracing::info!(session_id = %state.current_id(), "Current session");

        let orchestrator = Self {
            matcher: IntentMatcher::new(),
            resolver,
            state: Mutex::new(state),
            persistence,
            renderer: Arc::new(NoopRenderer),
            speaker: Arc::new(SilentSpeaker),
            opener: Arc::new(LoggingUrlOpener),
            voice: VoiceInterface::default(),
            config,
        };
        {
            let state = orchestrator.lock_state()?;
            orchestrator.persist(&state);
        }
        Ok(orchestrator)
    }

    pub fn with_matcher(mut self, matcher: IntentMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = speaker;
        self
    }

    pub fn with_url_opener(mut self, opener: Arc<dyn UrlOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn Listener>) -> Self {
        self.voice = VoiceInterface::new(listener);
        self
    }

    /// Handle one typed (or transcribed) command.
    ///
    /// The user message is recorded in the session that is current right
    /// now, and the reply lands in that same session even if the user
    /// switches away while the lookup is pending.
    pub async fn submit(&self, raw: &str) -> Result<AssistantReply, ChatError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let max = self.config.max_message_length;
        if text.chars().count() > max {
            return Err(ChatError::MessageTooLong(max));
        }

        let session_id = {
            let mut state = self.lock_state()?;
            let id = state.current_id().clone();
            state.append(&id, Message::user(text))?;
            self.persist(&state);
            id
        };
        self.renderer
            .render(&RenderedMessage::plain(sage_core::types::Sender::User, text));

        let reply = self.dispatch(&normalize(text)).await;
        self.deliver(Some(&session_id), reply).await
    }

    /// Capture one utterance and submit it like typed text.
    pub async fn listen_and_submit(&self) -> Result<AssistantReply, ChatError> {
        match self.voice.capture().await {
            Ok(transcript) => {
                tracing::info!(transcript = %transcript, "Voice command");
                self.submit(&transcript).await
            }
            Err(ChatError::CaptureUnsupported) => {
                tracing::info!("Speech capture unsupported");
                self.deliver(None, AssistantReply::capture_unsupported())
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech capture failed");
                self.deliver(None, AssistantReply::capture_failed()).await
            }
        }
    }

    /// Speak the greeting. Nothing is recorded.
    pub async fn greet(&self) {
        self.speak(GREETING).await;
    }

    /// Start an empty session and make it current.
    pub fn new_session(&self) -> Result<SessionId, ChatError> {
        let id = {
            let mut state = self.lock_state()?;
            let id = state.new_session(Utc::now());
            self.persist(&state);
            id
        };
        tracing::info!(session_id = %id, "New chat session");
        self.renderer.clear();
        Ok(id)
    }

    /// Make `id` current and re-render its messages without re-recording them.
    pub fn switch_session(&self, id: &SessionId) -> Result<Vec<Message>, ChatError> {
        let messages = {
            let mut state = self.lock_state()?;
            state.switch_to(id)?.messages().to_vec()
        };
        tracing::info!(session_id = %id, messages = messages.len(), "Switched chat session");
        self.renderer.clear();
        for message in &messages {
            self.renderer.render(&RenderedMessage::from(message));
        }
        Ok(messages)
    }

    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>, ChatError> {
        Ok(self.lock_state()?.summaries())
    }

    pub fn current_session_id(&self) -> Result<SessionId, ChatError> {
        Ok(self.lock_state()?.current_id().clone())
    }

    pub fn history(&self, id: &SessionId) -> Result<Vec<Message>, ChatError> {
        self.lock_state()?.history(id)
    }

    /// Copy of the whole store, e.g. for export.
    pub fn snapshot(&self) -> Result<SessionStore, ChatError> {
        Ok(self.lock_state()?.store().clone())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn dispatch(&self, normalized: &str) -> AssistantReply {
        let Some((template, intent)) = self.matcher.match_with_template(normalized) else {
            tracing::debug!(text = %normalized, "No intent matched");
            return AssistantReply::not_understood();
        };
        tracing::debug!(template, action = ?intent.action(), "Intent matched");

        match intent {
            Intent::OpenSite { site, url } => self.open_site(&site, &url).await,
            Intent::LimitedLookup { topic, line_limit } => AssistantReply::from_limited(
                self.resolver.resolve_limited(&topic, line_limit).await,
            ),
            Intent::GenericLookup { topic } => {
                AssistantReply::from_generic(self.resolver.resolve_generic(&topic).await)
            }
        }
    }

    async fn open_site(&self, site: &str, url: &str) -> AssistantReply {
        if let Err(e) = validate_url(url) {
            tracing::warn!(url = %url, error = %e, "Refusing to open URL");
            return AssistantReply::invalid_url();
        }
        match self.opener.open(url).await {
            Ok(()) => AssistantReply::opened_site(site),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open URL");
                AssistantReply::open_failed(site)
            }
        }
    }

    /// Render, speak, then record the reply in `session_id` when given.
    async fn deliver(
        &self,
        session_id: Option<&SessionId>,
        reply: AssistantReply,
    ) -> Result<AssistantReply, ChatError> {
        self.renderer.render(&reply.rendered());
        self.speak(&reply.spoken).await;

        if let Some(id) = session_id.filter(|_| reply.is_recorded()) {
            let mut state = self.lock_state()?;
            state.append(id, reply.to_message())?;
            self.persist(&state);
        }
        Ok(reply)
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.speaker.speak(text).await {
            tracing::warn!(error = %e, "Speech output failed");
        }
    }

    /// Save the whole store. Failures are logged and otherwise ignored.
    fn persist(&self, state: &ConversationState) {
        if let Err(e) = self.persistence.save_all(state.store()) {
            tracing::warn!(error = %e, "Failed to persist chat sessions");
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ConversationState>, ChatError> {
        self.state
            .lock()
            .map_err(|e| ChatError::StorageError(format!("state lock poisoned: {}", e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
