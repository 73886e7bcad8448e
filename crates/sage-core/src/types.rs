use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single exchanged message. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub time: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self::at(sender, content, Utc::now())
    }

    pub fn at(sender: Sender, content: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content: content.into(),
            time,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content)
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// Opaque session identifier of the form `chat-<unix millis>`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("chat-{}", millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Append-only ordered log of one conversation.
///
/// Serialized as a plain array of messages; the id is the key in the
/// owning [`SessionStore`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Timestamp of the first message, used for recency ordering.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.messages.first().map(|m| m.time)
    }
}

/// Listing entry for the chat list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub started_at: Option<DateTime<Utc>>,
    pub message_count: usize,
}

/// Title length shown in the chat list.
const TITLE_CHARS: usize = 20;

/// Title used for sessions without messages.
pub const UNTITLED_SESSION: &str = "New Chat";

/// Every conversation keyed by id. This is the single persisted aggregate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionStore {
    sessions: BTreeMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with a fresh id derived from `now`.
    ///
    /// The millisecond component is bumped until the id is unused.
    pub fn create_session(&mut self, now: DateTime<Utc>) -> SessionId {
        let mut millis = now.timestamp_millis();
        let mut id = SessionId::from_millis(millis);
        while self.sessions.contains_key(&id) {
            millis += 1;
            id = SessionId::from_millis(millis);
        }
        self.sessions.insert(id.clone(), Session::new());
        id
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions ordered by first-message time, newest first.
    ///
    /// Sessions without messages sort last; ties fall back to id, newest first.
    pub fn summaries(&self) -> Vec<SessionSummary> {
        let mut entries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|(id, session)| SessionSummary {
                id: id.clone(),
                title: session
                    .messages()
                    .first()
                    .map(|m| m.content.chars().take(TITLE_CHARS).collect())
                    .unwrap_or_else(|| UNTITLED_SESSION.to_string()),
                started_at: session.started_at(),
                message_count: session.len(),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        entries
    }

    /// The session whose first message is the most recent, if any.
    pub fn most_recent(&self) -> Option<SessionId> {
        self.summaries().into_iter().next().map(|s| s.id)
    }
}
