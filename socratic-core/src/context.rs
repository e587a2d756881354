use std::sync::Arc;

use crate::{system_instruction, ChatContext, ConversationStore, Message, TutorError};

/// Ten question/answer pairs, twenty messages.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Turns stored history for a (session, subject) pair into the message
/// window sent upstream. Read-only.
#[derive(Clone)]
pub struct ContextBuilder {
    store: Arc<dyn ConversationStore>,
    history_limit: usize,
}

impl ContextBuilder {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            store,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub async fn build(
        &self,
        session_id: &str,
        subject: &str,
        question: &str,
    ) -> Result<ChatContext, TutorError> {
        let history = self
            .store
            .recent(session_id, subject, self.history_limit)
            .await?;

        let mut messages = Vec::with_capacity(history.len() * 2 + 1);
        for turn in history {
            messages.push(Message::user(turn.question));
            messages.push(Message::assistant(turn.response));
        }
        messages.push(Message::user(question));

        tracing::debug!(
            session_id,
            subject,
            messages = messages.len(),
            "assembled conversation context"
        );

        Ok(ChatContext {
            system: system_instruction(subject),
            messages,
        })
    }
}
