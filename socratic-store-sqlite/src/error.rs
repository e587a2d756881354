use socratic_core::TutorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreSqlError {
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("stored row is invalid: {0}")]
    Decode(String),
}

impl From<StoreSqlError> for TutorError {
    fn from(error: StoreSqlError) -> Self {
        TutorError::Store(error.to_string())
    }
}
