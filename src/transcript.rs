//! In-memory conversation transcripts.
//!
//! Append-only, role-tagged turns held for the process lifetime; nothing is
//! persisted. Interior mutability behind a mutex so the store can live in
//! shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

#[derive(Clone, Default)]
pub struct TranscriptStore {
    sessions: Arc<Mutex<HashMap<String, Vec<Turn>>>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, session_id: &str, role: Role, content: &str) {
        let turn = Turn {
            role,
            content: content.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.entry(session_id.to_string()).or_default().push(turn);
    }

    pub fn turns(&self, session_id: &str) -> Vec<Turn> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    pub fn len(&self, session_id: &str) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    /// Transcript as chat messages for prompting.
    pub fn chat_history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.turns(session_id)
            .into_iter()
            .map(|turn| ChatMessage::new(turn.role.as_str(), turn.content))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_are_appended_in_order() {
        let store = TranscriptStore::new();
        store.append("s1", Role::User, "hello");
        store.append("s1", Role::Assistant, "hi there");

        let turns = store.turns("s1");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "hello");
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[test]
    fn sessions_are_independent() {
        let store = TranscriptStore::new();
        store.append("a", Role::User, "one");
        store.append("b", Role::User, "two");

        assert_eq!(store.len("a"), 1);
        assert_eq!(store.len("b"), 1);
        assert!(store.is_empty("c"));
    }

    #[test]
    fn chat_history_maps_roles() {
        let store = TranscriptStore::new();
        store.append(DEFAULT_SESSION_ID, Role::User, "q");
        store.append(DEFAULT_SESSION_ID, Role::Assistant, "a");

        let history = store.chat_history(DEFAULT_SESSION_ID);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "assistant");
    }

    #[test]
    fn error_replies_still_advance_the_transcript() {
        let store = TranscriptStore::new();
        store.append("s", Role::User, "question");
        store.append("s", Role::Assistant, "⚠️ Error: upstream unavailable");

        assert_eq!(store.len("s"), 2);
        assert!(store.turns("s")[1].content.starts_with("⚠️ Error:"));
    }
}
