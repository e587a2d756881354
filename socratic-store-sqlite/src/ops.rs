use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error::StoreSqlError;

/// One row of the `conversations` table as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRow {
    pub id: i64,
    pub session_id: String,
    pub subject: String,
    pub question: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Fixed-width so lexical order on the TEXT column matches time order.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreSqlError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| StoreSqlError::Decode(format!("created_at '{raw}': {err}")))
}

pub async fn insert_turn(
    pool: &SqlitePool,
    session_id: &str,
    subject: &str,
    question: &str,
    response: &str,
    created_at: &DateTime<Utc>,
) -> Result<i64, StoreSqlError> {
    let result = sqlx::query(
        "INSERT INTO conversations (session_id, subject, question, response, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(session_id)
    .bind(subject)
    .bind(question)
    .bind(response)
    .bind(format_timestamp(created_at))
    .execute(pool)
    .await
    .map_err(StoreSqlError::Query)?;

    Ok(result.last_insert_rowid())
}

/// Newest `limit` rows for the pair, returned oldest first.
pub async fn load_recent_turns(
    pool: &SqlitePool,
    session_id: &str,
    subject: &str,
    limit: i64,
) -> Result<Vec<TurnRow>, StoreSqlError> {
    let rows = sqlx::query(
        "SELECT id, session_id, subject, question, response, created_at \
         FROM conversations \
         WHERE session_id = ?1 AND subject = ?2 \
         ORDER BY created_at DESC, id DESC \
         LIMIT ?3",
    )
    .bind(session_id)
    .bind(subject)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(StoreSqlError::Query)?;

    let mut turns = rows
        .iter()
        .map(decode_row)
        .collect::<Result<Vec<_>, _>>()?;
    turns.reverse();
    Ok(turns)
}

pub async fn count_turns(pool: &SqlitePool, session_id: &str) -> Result<i64, StoreSqlError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE session_id = ?1")
        .bind(session_id)
        .fetch_one(pool)
        .await
        .map_err(StoreSqlError::Query)
}

fn decode_row(row: &SqliteRow) -> Result<TurnRow, StoreSqlError> {
    let created_at: String = row.try_get("created_at").map_err(StoreSqlError::Query)?;
    Ok(TurnRow {
        id: row.try_get("id").map_err(StoreSqlError::Query)?,
        session_id: row.try_get("session_id").map_err(StoreSqlError::Query)?,
        subject: row.try_get("subject").map_err(StoreSqlError::Query)?,
        question: row.try_get("question").map_err(StoreSqlError::Query)?,
        response: row.try_get("response").map_err(StoreSqlError::Query)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
