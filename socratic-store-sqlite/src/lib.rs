pub mod error;
pub mod migrations;
pub mod ops;
pub mod schema;

use chrono::{SubsecRound, Utc};
use socratic_core::{ConversationStore, NewTurn, Turn, TutorError};

pub use error::StoreSqlError;
use migrations::run_migrations;
use ops::{count_turns, insert_turn, load_recent_turns, TurnRow};

#[derive(Debug, Clone)]
pub struct SqliteConversationStore {
    pool: sqlx::SqlitePool,
}

#[derive(Debug, Clone)]
pub struct SqliteConversationStoreBuilder {
    database_url: String,
    max_connections: u32,
}

impl SqliteConversationStore {
    pub fn builder(database_url: impl Into<String>) -> SqliteConversationStoreBuilder {
        SqliteConversationStoreBuilder {
            database_url: database_url.into(),
            max_connections: 1,
        }
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    pub async fn count_for_session(&self, session_id: &str) -> Result<i64, StoreSqlError> {
        count_turns(&self.pool, session_id).await
    }
}

impl SqliteConversationStoreBuilder {
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub async fn build(self) -> Result<SqliteConversationStore, StoreSqlError> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.database_url)
            .await
            .map_err(StoreSqlError::Connection)?;

        run_migrations(&pool).await?;
        tracing::debug!(database_url = %self.database_url, "conversation store ready");

        Ok(SqliteConversationStore { pool })
    }
}

fn turn_from_row(row: TurnRow) -> Turn {
    Turn {
        id: row.id,
        session_id: row.session_id,
        subject: row.subject,
        question: row.question,
        response: row.response,
        created_at: row.created_at,
    }
}

#[async_trait::async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn append(&self, turn: NewTurn) -> Result<Turn, TutorError> {
        // Stored with microsecond precision; keep the returned value identical.
        let created_at = Utc::now().trunc_subsecs(6);
        let id = insert_turn(
            &self.pool,
            turn.session_id(),
            turn.subject(),
            turn.question(),
            turn.response(),
            &created_at,
        )
        .await?;

        Ok(turn.into_turn(id, created_at))
    }

    async fn recent(
        &self,
        session_id: &str,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<Turn>, TutorError> {
        let limit = i64::try_from(limit)
            .map_err(|_| TutorError::Store("history limit does not fit into i64".to_string()))?;
        let rows = load_recent_turns(&self.pool, session_id, subject, limit).await?;
        Ok(rows.into_iter().map(turn_from_row).collect())
    }
}
