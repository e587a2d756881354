mod context;
mod error;
mod gateway;
mod message;
mod prompt;
mod service;
mod session;
mod store;
mod turn;

pub use context::{ContextBuilder, DEFAULT_HISTORY_LIMIT};
pub use error::TutorError;
pub use gateway::{Diagnostics, GatewayFailure, GatewayReply, TutorGateway, RESPONSE_BODY_PREVIEW};
pub use message::{ChatContext, Message, Role};
pub use prompt::system_instruction;
pub use service::{AskOutcome, AskReply, AskRequest, TutorService, FALLBACK_RESPONSE};
pub use session::SessionId;
pub use store::{ConversationStore, InMemoryConversationStore};
pub use turn::{NewTurn, Turn};
