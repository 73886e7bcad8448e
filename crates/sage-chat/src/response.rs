//! Assistant replies.
//!
//! Every outcome of a command, including failures, ends up as an
//! [`AssistantReply`]: the text shown and recorded, the text spoken, and any
//! thumbnail or source link that goes with an answer.

use sage_core::types::{Message, Sender};

use crate::effects::{RenderedMessage, SourceLink};
use crate::provider::{ProviderKind, ProviderResult};
use crate::resolver::Resolution;

/// Spoken by `talk`.
pub const GREETING: &str = "Hi, how can I help you?";

/// Prefix shown before an answer extract.
pub const ANSWER_PREFIX: &str = "📖 ";

const NOT_FOUND: &str = "I couldn't find an answer. Try rephrasing.";
const NOT_FOUND_SPOKEN: &str = "Sorry, I couldn't find anything useful.";
const NETWORK_ERROR: &str = "Network error while fetching data.";
const LIMITED_NETWORK_ERROR: &str = "Error while fetching info.";
const LIMITED_NETWORK_ERROR_SPOKEN: &str = "Error while fetching data.";
const NOT_UNDERSTOOD: &str = "I'm not sure, but I'll try to improve. Try asking again.";
const NOT_UNDERSTOOD_SPOKEN: &str = "I'm not sure, try again.";
const INVALID_URL: &str = "I can only open http or https links.";
const CAPTURE_UNSUPPORTED: &str = "Speech Recognition not supported.";
const CAPTURE_FAILED: &str = "Sorry, I didn't catch that.";

/// What kind of outcome a reply reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Answer,
    OpenedSite,
    OpenFailed,
    InvalidUrl,
    NotFound,
    NetworkError,
    NotUnderstood,
    CaptureUnsupported,
    CaptureFailed,
}

/// A fully formed assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub kind: ReplyKind,
    /// Shown and recorded in the session.
    pub text: String,
    /// Passed to speech output.
    pub spoken: String,
    pub thumbnail_url: Option<String>,
    pub source: Option<SourceLink>,
}

impl AssistantReply {
    fn fixed(kind: ReplyKind, text: &str, spoken: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            spoken: spoken.to_string(),
            thumbnail_url: None,
            source: None,
        }
    }

    pub fn answer(provider: ProviderKind, result: ProviderResult) -> Self {
        let extract = result.extract.unwrap_or_default();
        Self {
            kind: ReplyKind::Answer,
            spoken: extract.clone(),
            text: extract,
            thumbnail_url: result.thumbnail_url,
            source: result.source_url.map(|url| SourceLink {
                label: provider.source_label().to_string(),
                url,
            }),
        }
    }

    pub fn opened_site(site: &str) -> Self {
        Self {
            kind: ReplyKind::OpenedSite,
            text: format!("Opening {site}..."),
            spoken: format!("Opening {site}"),
            thumbnail_url: None,
            source: None,
        }
    }

    pub fn open_failed(site: &str) -> Self {
        let text = format!("I couldn't open {site}.");
        Self {
            kind: ReplyKind::OpenFailed,
            spoken: text.clone(),
            text,
            thumbnail_url: None,
            source: None,
        }
    }

    pub fn invalid_url() -> Self {
        Self::fixed(ReplyKind::InvalidUrl, INVALID_URL, INVALID_URL)
    }

    pub fn not_found() -> Self {
        Self::fixed(ReplyKind::NotFound, NOT_FOUND, NOT_FOUND_SPOKEN)
    }

    pub fn network_error() -> Self {
        Self::fixed(ReplyKind::NetworkError, NETWORK_ERROR, NETWORK_ERROR)
    }

    pub fn limited_network_error() -> Self {
        Self::fixed(
            ReplyKind::NetworkError,
            LIMITED_NETWORK_ERROR,
            LIMITED_NETWORK_ERROR_SPOKEN,
        )
    }

    pub fn not_understood() -> Self {
        Self::fixed(ReplyKind::NotUnderstood, NOT_UNDERSTOOD, NOT_UNDERSTOOD_SPOKEN)
    }

    pub fn capture_unsupported() -> Self {
        Self::fixed(
            ReplyKind::CaptureUnsupported,
            CAPTURE_UNSUPPORTED,
            CAPTURE_UNSUPPORTED,
        )
    }

    pub fn capture_failed() -> Self {
        Self::fixed(ReplyKind::CaptureFailed, CAPTURE_FAILED, CAPTURE_FAILED)
    }

    /// Reply for a lookup through the full provider chain.
    pub fn from_generic(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Answer { provider, result } => Self::answer(provider, result),
            Resolution::NotFound => Self::not_found(),
            Resolution::NetworkError(_) => Self::network_error(),
        }
    }

    /// Reply for a line-limited lookup.
    pub fn from_limited(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Answer { provider, result } => Self::answer(provider, result),
            Resolution::NotFound => Self::not_found(),
            Resolution::NetworkError(_) => Self::limited_network_error(),
        }
    }

    /// Whether the reply belongs in the session log.
    ///
    /// Capture problems happen before any command exists and are only
    /// shown and spoken.
    pub fn is_recorded(&self) -> bool {
        !matches!(
            self.kind,
            ReplyKind::CaptureUnsupported | ReplyKind::CaptureFailed
        )
    }

    /// The message appended to the session.
    pub fn to_message(&self) -> Message {
        Message::assistant(self.text.clone())
    }

    /// How the reply is displayed.
    pub fn rendered(&self) -> RenderedMessage {
        let text = match self.kind {
            ReplyKind::Answer => format!("{ANSWER_PREFIX}{}", self.text),
            _ => self.text.clone(),
        };
        RenderedMessage {
            sender: Sender::Assistant,
            text,
            thumbnail_url: self.thumbnail_url.clone(),
            source: self.source.clone(),
        }
    }
}
