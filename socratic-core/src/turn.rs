use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TutorError;

/// One persisted question/response pair. Never updated after insert.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Turn {
    pub id: i64,
    pub session_id: String,
    pub subject: String,
    pub question: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// A turn that passed validation but has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTurn {
    session_id: String,
    subject: String,
    question: String,
    response: String,
}

impl NewTurn {
    pub fn new(
        session_id: impl Into<String>,
        subject: impl Into<String>,
        question: impl Into<String>,
        response: impl Into<String>,
    ) -> Result<Self, TutorError> {
        let turn = Self {
            session_id: session_id.into(),
            subject: subject.into(),
            question: question.into(),
            response: response.into(),
        };
        require_present("Session", &turn.session_id)?;
        require_present("Subject", &turn.subject)?;
        require_present("Question", &turn.question)?;
        Ok(turn)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn into_turn(self, id: i64, created_at: DateTime<Utc>) -> Turn {
        Turn {
            id,
            session_id: self.session_id,
            subject: self.subject,
            question: self.question,
            response: self.response,
            created_at,
        }
    }
}

pub(crate) fn require_present(field: &'static str, value: &str) -> Result<(), TutorError> {
    if value.trim().is_empty() {
        return Err(TutorError::blank(field));
    }
    Ok(())
}
