use thiserror::Error;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("{field} can't be blank")]
    Validation { field: &'static str },
    #[error("Conversation store failed: {0}")]
    Store(String),
}

impl TutorError {
    pub fn blank(field: &'static str) -> Self {
        TutorError::Validation { field }
    }
}
