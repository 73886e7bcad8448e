//! Conversational engine for Sage.
//!
//! Turns free text into an intent, resolves factual questions through an
//! ordered chain of knowledge providers, and records every exchange in the
//! current conversation.

pub mod effects;
pub mod error;
pub mod intent;
pub mod normalize;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod response;
pub mod state;
pub mod voice;

pub use effects::{
    validate_url, Listener, LoggingUrlOpener, NoopRenderer, RenderedMessage, Renderer,
    SilentSpeaker, SourceLink, Speaker, UnsupportedListener, UrlOpener,
};
pub use error::{ChatError, ProviderError};
pub use intent::{Intent, IntentAction, IntentMatcher, IntentTemplate};
pub use normalize::{normalize, singularize};
pub use orchestrator::ChatOrchestrator;
pub use provider::{
    EncyclopediaProvider, InstantAnswerProvider, KnowledgeProvider, ProviderKind, ProviderResult,
};
pub use resolver::{truncate_sentences, KnowledgeResolver, ProviderChain, Resolution};
pub use response::{AssistantReply, ReplyKind, GREETING};
pub use state::ConversationState;
pub use voice::VoiceInterface;
