use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::turn::require_present;
use crate::{
    ContextBuilder, ConversationStore, Diagnostics, NewTurn, SessionId, Turn, TutorError,
    TutorGateway,
};

/// Substituted whenever the upstream model yields no usable text.
pub const FALLBACK_RESPONSE: &str = "I'm having trouble connecting to my AI brain right now. Please try asking your question again in a moment!";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            subject: subject.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Body returned to the caller.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AskReply {
    Answered {
        question: String,
        response: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        debug: Option<Diagnostics>,
    },
    Failed {
        error: String,
        success: bool,
    },
}

impl AskReply {
    pub fn answered(
        question: impl Into<String>,
        response: impl Into<String>,
        debug: Option<Diagnostics>,
    ) -> Self {
        AskReply::Answered {
            question: question.into(),
            response: response.into(),
            success: true,
            debug,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        AskReply::Failed {
            error: error.into(),
            success: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AskReply::Answered { .. })
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            AskReply::Answered { response, .. } => Some(response),
            AskReply::Failed { .. } => None,
        }
    }
}

/// Result of one ask: the session the caller should keep using and the body
/// to send back. `session_created` is set when no session came in.
#[derive(Clone, Debug, PartialEq)]
pub struct AskOutcome {
    pub session_id: SessionId,
    pub session_created: bool,
    pub reply: AskReply,
}

/// Per-request orchestration: context, upstream call, fallback, persist.
#[derive(Clone)]
pub struct TutorService {
    store: Arc<dyn ConversationStore>,
    gateway: Arc<dyn TutorGateway>,
    context: ContextBuilder,
    diagnostics: bool,
}

impl TutorService {
    pub fn new(store: Arc<dyn ConversationStore>, gateway: Arc<dyn TutorGateway>) -> Self {
        Self {
            context: ContextBuilder::new(store.clone()),
            store,
            gateway,
            diagnostics: false,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.context = self.context.with_history_limit(history_limit);
        self
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    pub async fn ask(&self, request: AskRequest) -> AskOutcome {
        let AskRequest {
            question,
            subject,
            session_id,
        } = request;
        let (session_id, session_created) = match session_id {
            Some(session_id) => (session_id, false),
            None => (SessionId::generate(), true),
        };

        let reply = match self.answer(&session_id, question, subject).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(session_id = %session_id, error = %err, "tutor request failed");
                AskReply::failed(err.to_string())
            }
        };

        AskOutcome {
            session_id,
            session_created,
            reply,
        }
    }

    /// Stored turns inside the context window for this session and subject.
    pub async fn history(
        &self,
        session_id: &SessionId,
        subject: &str,
    ) -> Result<Vec<Turn>, TutorError> {
        self.store
            .recent(session_id.as_str(), subject, self.context.history_limit())
            .await
    }

    async fn answer(
        &self,
        session_id: &SessionId,
        question: String,
        subject: String,
    ) -> Result<AskReply, TutorError> {
        require_present("Question", &question)?;
        require_present("Subject", &subject)?;

        let context = self
            .context
            .build(session_id.as_str(), &subject, &question)
            .await?;
        let reply = self.gateway.complete(&context, self.diagnostics).await;

        let response = match reply.answer() {
            Some(text) => text.to_string(),
            None => {
                if let Err(failure) = &reply.outcome {
                    tracing::warn!(
                        session_id = %session_id,
                        subject = %subject,
                        reason = %failure,
                        "upstream gave no answer, using fallback"
                    );
                }
                FALLBACK_RESPONSE.to_string()
            }
        };

        let turn = NewTurn::new(session_id.as_str(), &subject, &question, &response)?;
        let stored = self.store.append(turn).await?;
        tracing::info!(
            session_id = %session_id,
            subject = %subject,
            turn_id = stored.id,
            "conversation turn saved"
        );

        let debug = if self.diagnostics {
            reply.diagnostics
        } else {
            None
        };
        Ok(AskReply::answered(question, response, debug))
    }
}
