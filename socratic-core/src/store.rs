use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::{NewTurn, Turn, TutorError};

/// Append-only log of turns keyed by session and subject.
#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a turn. The store assigns `id` and `created_at`.
    async fn append(&self, turn: NewTurn) -> Result<Turn, TutorError>;

    /// The newest `limit` turns for exactly this session and subject,
    /// returned oldest first.
    async fn recent(
        &self,
        session_id: &str,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<Turn>, TutorError>;
}

#[derive(Default, Clone)]
pub struct InMemoryConversationStore {
    inner: Arc<RwLock<Vec<Turn>>>,
}

impl InMemoryConversationStore {
    pub fn len(&self) -> Result<usize, TutorError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| TutorError::Store("lock".into()))?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, TutorError> {
        Ok(self.len()? == 0)
    }

    pub fn turns(&self) -> Result<Vec<Turn>, TutorError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| TutorError::Store("lock".into()))?;
        Ok(guard.clone())
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, turn: NewTurn) -> Result<Turn, TutorError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| TutorError::Store("lock".into()))?;
        let id = guard.len() as i64 + 1;
        let stored = turn.into_turn(id, Utc::now());
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn recent(
        &self,
        session_id: &str,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<Turn>, TutorError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| TutorError::Store("lock".into()))?;
        // Insertion order is creation order here.
        let mut turns: Vec<Turn> = guard
            .iter()
            .rev()
            .filter(|turn| turn.session_id == session_id && turn.subject == subject)
            .take(limit)
            .cloned()
            .collect();
        turns.reverse();
        Ok(turns)
    }
}
