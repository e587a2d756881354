use sqlx::SqlitePool;

use crate::error::StoreSqlError;
use crate::schema::MIGRATION_STATEMENTS_SQL;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreSqlError> {
    for statement in MIGRATION_STATEMENTS_SQL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(StoreSqlError::Migration)?;
    }

    Ok(())
}
