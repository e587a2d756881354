use chrono::{Duration, TimeZone, Utc};
use socratic_store_sqlite::migrations::run_migrations;
use socratic_store_sqlite::ops::{
    count_turns, format_timestamp, insert_turn, load_recent_turns, parse_timestamp,
};
use socratic_store_sqlite::schema::CONVERSATIONS_TABLE;

async fn sqlite_pool() -> sqlx::SqlitePool {
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite in-memory pool should connect")
}

#[tokio::test]
async fn migrations_create_table_and_are_idempotent() {
    let pool = sqlite_pool().await;

    run_migrations(&pool).await.expect("first run");
    run_migrations(&pool).await.expect("second run");

    let table_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
    )
    .bind(CONVERSATIONS_TABLE)
    .fetch_one(&pool)
    .await
    .expect("table count query should run");

    assert_eq!(table_count, 1);
}

#[tokio::test]
async fn load_recent_returns_newest_window_in_chronological_order() {
    let pool = sqlite_pool().await;
    run_migrations(&pool).await.unwrap();
    let base = Utc.with_ymd_and_hms(2025, 7, 22, 2, 15, 0).unwrap();

    for i in 0..5 {
        insert_turn(
            &pool,
            "s",
            "math",
            &format!("Q{i}"),
            &format!("A{i}"),
            &(base + Duration::seconds(i)),
        )
        .await
        .unwrap();
    }
    insert_turn(&pool, "s", "science", "other", "other", &base)
        .await
        .unwrap();

    let rows = load_recent_turns(&pool, "s", "math", 3).await.unwrap();
    let questions: Vec<&str> = rows.iter().map(|row| row.question.as_str()).collect();
    assert_eq!(questions, vec!["Q2", "Q3", "Q4"]);
    assert_eq!(rows[0].created_at, base + Duration::seconds(2));

    assert_eq!(count_turns(&pool, "s").await.unwrap(), 6);
}

#[tokio::test]
async fn identical_timestamps_fall_back_to_insert_order() {
    let pool = sqlite_pool().await;
    run_migrations(&pool).await.unwrap();
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    for question in ["first", "second", "third"] {
        insert_turn(&pool, "s", "math", question, "r", &at).await.unwrap();
    }

    let rows = load_recent_turns(&pool, "s", "math", 10).await.unwrap();
    let questions: Vec<&str> = rows.iter().map(|row| row.question.as_str()).collect();
    assert_eq!(questions, vec!["first", "second", "third"]);
}

#[test]
fn timestamps_are_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let formatted = format_timestamp(&whole);
    assert_eq!(formatted, "2025-01-01T00:00:00.000000Z");
    assert_eq!(parse_timestamp(&formatted).unwrap(), whole);
    assert!(parse_timestamp("yesterday").is_err());
}
