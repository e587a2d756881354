pub mod config;
pub mod error;
pub mod routes;
pub mod session_cookie;
pub mod state;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::router;
pub use state::AppState;
