//! socratic-server entry point.
//!
//! Startup order:
//! 1. Load `.env` and read configuration from the environment.
//! 2. Install the tracing subscriber.
//! 3. Open the SQLite conversation store (migrations run on connect).
//! 4. Build the Anthropic gateway from `ANTHROPIC_API_KEY`.
//! 5. Serve the router until Ctrl-C or SIGTERM.

use std::sync::Arc;

use socratic_anthropic::AnthropicClient;
use socratic_core::TutorService;
use socratic_server::{router, AppState, ServerConfig};
use socratic_store_sqlite::SqliteConversationStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = ServerConfig::from_env();

    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(filter) => filter,
            Err(err) => {
                eprintln!(
                    "WARN: SOCRATIC_LOG='{}' is not a valid tracing filter ({err}); falling back to 'info'",
                    cfg.log_level
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);
    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "socratic-server starting");

    let store = SqliteConversationStore::builder(cfg.database_url.clone())
        .max_connections(cfg.max_connections)
        .build()
        .await?;
    info!(database_url = %cfg.database_url, "conversation store ready");

    let gateway = AnthropicClient::from_env()?;
    info!(model = gateway.model(), endpoint = gateway.endpoint(), "anthropic gateway ready");

    let tutor = TutorService::new(Arc::new(store), Arc::new(gateway))
        .with_diagnostics(cfg.expose_diagnostics)
        .with_history_limit(cfg.history_limit);
    if tutor.diagnostics_enabled() {
        warn!("SOCRATIC_DEBUG is on; upstream diagnostics are returned to clients");
    }

    let app = router(AppState::new(tutor));
    let listener = tokio::net::TcpListener::bind(&cfg.bind_address).await?;
    info!(addr = %cfg.bind_address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("socratic-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
