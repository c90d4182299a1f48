//! Conversation State
//!
//! Each browser session owns an append-only transcript plus the file it most
//! recently uploaded. Sessions live in a process-wide [`SessionStore`] and are
//! created and ended explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::intake::StoredUpload;
use crate::types::{AppError, AppResult, Role};

/// One role-tagged message in the transcript.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered chat history. Turns can be appended and read, never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// The upload a session is currently asking about.
#[derive(Debug, Clone)]
pub struct ActiveFile {
    pub upload: StoredUpload,
    pub text: String,
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub conversation: Conversation,
    pub active_file: Option<ActiveFile>,
    /// Set once the session is ended; no new uploads are stored after that.
    pub ended: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            conversation: Conversation::new(),
            active_file: None,
            ended: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        let session = Session::new();
        let id = session.id;
        let shared = Arc::new(RwLock::new(session));
        self.inner.write().await.insert(id, shared.clone());
        (id, shared)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SharedSession> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<SharedSession> {
        self.inner
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_keep_insertion_order() {
        let mut conversation = Conversation::new();
        for i in 0..5 {
            let turn = if i % 2 == 0 {
                Turn::user(format!("question {i}"))
            } else {
                Turn::assistant(format!("answer {i}"))
            };
            conversation.push(turn);
        }

        assert_eq!(conversation.len(), 5);
        let contents: Vec<&str> = conversation.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["question 0", "answer 1", "question 2", "answer 3", "question 4"]
        );
        assert_eq!(conversation.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn earlier_turns_survive_later_appends() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("first"));
        let snapshot = conversation.turns()[0].clone();

        conversation.push(Turn::assistant("second"));
        conversation.push(Turn::user("third"));

        assert_eq!(conversation.turns()[0], snapshot);
    }

    #[tokio::test]
    async fn store_lifecycle() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);

        let (id, session) = store.create().await;
        session.write().await.conversation.push(Turn::user("hello"));

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.read().await.conversation.len(), 1);
        assert_eq!(store.len().await, 1);

        store.remove(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove(id).await, Err(AppError::NotFound(_))));
    }
}
