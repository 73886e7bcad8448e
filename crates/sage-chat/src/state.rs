//! Conversation state owned by the orchestrator.

use chrono::{DateTime, Utc};
use sage_core::types::{Message, Session, SessionId, SessionStore, SessionSummary};

use crate::error::ChatError;

/// Every session plus a pointer to the one receiving new commands.
///
/// The pointer always names a session present in the store.
#[derive(Debug, Clone)]
pub struct ConversationState {
    store: SessionStore,
    current: SessionId,
}

impl ConversationState {
    /// Build the state from a loaded store.
    ///
    /// A fresh session is created unless `resume_latest` is set and the
    /// store already has one.
    pub fn start(mut store: SessionStore, resume_latest: bool, now: DateTime<Utc>) -> Self {
        let resumed = if resume_latest {
            store.most_recent()
        } else {
            None
        };
        let current = match resumed {
            Some(id) => id,
            None => store.create_session(now),
        };
        Self { store, current }
    }

    pub fn current_id(&self) -> &SessionId {
        &self.current
    }

    /// Create an empty session and make it current. Other sessions are untouched.
    pub fn new_session(&mut self, now: DateTime<Utc>) -> SessionId {
        let id = self.store.create_session(now);
        self.current = id.clone();
        id
    }

    /// Make `id` current and return its messages.
    pub fn switch_to(&mut self, id: &SessionId) -> Result<&Session, ChatError> {
        let session = self
            .store
            .get(id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))?;
        self.current = id.clone();
        Ok(session)
    }

    /// Append to a specific session; it need not be the current one.
    pub fn append(&mut self, id: &SessionId, message: Message) -> Result<(), ChatError> {
        let session = self
            .store
            .get_mut(id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))?;
        session.append(message);
        Ok(())
    }

    pub fn history(&self, id: &SessionId) -> Result<Vec<Message>, ChatError> {
        self.store
            .get(id)
            .map(|s| s.messages().to_vec())
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.store.summaries()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    fn store_with_message(millis: i64, content: &str) -> (SessionStore, SessionId) {
        let mut store = SessionStore::new();
        let id = store.create_session(at(millis));
        store
            .get_mut(&id)
            .unwrap()
            .append(Message::at(sage_core::types::Sender::User, content, at(millis)));
        (store, id)
    }

    #[test]
    fn test_start_on_empty_store_creates_session() {
        let state = ConversationState::start(SessionStore::new(), false, at(1_000));
        assert_eq!(state.current_id().as_str(), "chat-1000");
        assert!(state.history(state.current_id()).unwrap().is_empty());
        assert_eq!(state.store().len(), 1);
    }

    #[test]
    fn test_start_always_fresh_by_default() {
        let (store, old) = store_with_message(1_000, "who is ada");
        let state = ConversationState::start(store, false, at(5_000));
        assert_ne!(state.current_id(), &old);
        assert_eq!(state.store().len(), 2);
    }

    #[test]
    fn test_start_resumes_latest() {
        let (store, old) = store_with_message(1_000, "who is ada");
        let state = ConversationState::start(store, true, at(5_000));
        assert_eq!(state.current_id(), &old);
        assert_eq!(state.store().len(), 1);
    }

    #[test]
    fn test_resume_on_empty_store_still_creates() {
        let state = ConversationState::start(SessionStore::new(), true, at(7));
        assert_eq!(state.store().len(), 1);
    }

    #[test]
    fn test_new_session_leaves_others_unchanged() {
        let (store, old) = store_with_message(1_000, "define entropy");
        let mut state = ConversationState::start(store, true, at(2_000));
        let before = state.history(&old).unwrap();

        let fresh = state.new_session(at(3_000));
        assert_eq!(state.current_id(), &fresh);
        assert!(state.history(&fresh).unwrap().is_empty());
        assert_eq!(state.history(&old).unwrap(), before);
    }

    #[test]
    fn test_new_session_same_millisecond_is_unique() {
        let mut state = ConversationState::start(SessionStore::new(), false, at(10));
        let second = state.new_session(at(10));
        assert_eq!(second.as_str(), "chat-11");
        assert_eq!(state.store().len(), 2);
    }

    #[test]
    fn test_switch_to_unknown_session() {
        let mut state = ConversationState::start(SessionStore::new(), false, at(1));
        let current = state.current_id().clone();
        let err = state.switch_to(&SessionId::from("chat-404")).unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(_)));
        assert_eq!(state.current_id(), &current);
    }

    #[test]
    fn test_switch_returns_messages() {
        let (store, old) = store_with_message(1_000, "what is rust");
        let mut state = ConversationState::start(store, false, at(2_000));
        let session = state.switch_to(&old).unwrap();
        assert_eq!(session.len(), 1);
        assert_eq!(state.current_id(), &old);
    }

    #[test]
    fn test_append_to_non_current_session() {
        let mut state = ConversationState::start(SessionStore::new(), false, at(1));
        let first = state.current_id().clone();
        state.new_session(at(2));
        state.append(&first, Message::assistant("late answer")).unwrap();
        assert_eq!(state.history(&first).unwrap().len(), 1);
        assert!(state.history(state.current_id()).unwrap().is_empty());
    }

    #[test]
    fn test_append_unknown_session() {
        let mut state = ConversationState::start(SessionStore::new(), false, at(1));
        assert!(state
            .append(&SessionId::from("chat-0"), Message::user("x"))
            .is_err());
    }
}
