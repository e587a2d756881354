pub const CONVERSATIONS_TABLE: &str = "conversations";

pub const CREATE_CONVERSATIONS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS conversations (\
    id INTEGER PRIMARY KEY AUTOINCREMENT,\
    session_id TEXT NOT NULL,\
    subject TEXT NOT NULL,\
    question TEXT NOT NULL,\
    response TEXT NOT NULL,\
    created_at TEXT NOT NULL\
)";

pub const CREATE_CONVERSATIONS_LOOKUP_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_conversations_session_subject \
    ON conversations (session_id, subject, created_at)";

pub const MIGRATION_STATEMENTS_SQL: [&str; 2] = [
    CREATE_CONVERSATIONS_TABLE_SQL,
    CREATE_CONVERSATIONS_LOOKUP_INDEX_SQL,
];
