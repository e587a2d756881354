//! Server configuration, loaded from environment variables at startup.

use socratic_core::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// sqlx SQLite URL; `mode=rwc` creates the file on first start.
    pub database_url: String,

    pub max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// Emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Attach the upstream diagnostics bundle to every answer.
    pub expose_diagnostics: bool,

    /// Prior turns sent upstream with each question.
    pub history_limit: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("SOCRATIC_BIND", "0.0.0.0:3000"),
            database_url: env_or("SOCRATIC_DATABASE_URL", "sqlite://socratic.db?mode=rwc"),
            max_connections: parse_env("SOCRATIC_DB_MAX_CONNECTIONS", 5),
            log_level: env_or("SOCRATIC_LOG", "info"),
            log_json: env_flag("SOCRATIC_LOG_JSON"),
            expose_diagnostics: env_flag("SOCRATIC_DEBUG"),
            history_limit: parse_env("SOCRATIC_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
