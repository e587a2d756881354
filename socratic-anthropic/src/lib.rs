//! Anthropic Messages API gateway.
//!
//! [`AnthropicClient`] implements [`socratic_core::TutorGateway`]: one POST to
//! `/v1/messages` per call, with every failure classified into a
//! [`socratic_core::GatewayFailure`] instead of bubbling up as an error.

mod client;
mod config;
mod error;
mod types;

pub use client::AnthropicClient;
pub use config::{
    AnthropicConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT, MODEL_ENV,
};
pub use error::AnthropicError;
pub use types::{ContentBlock, MessagesRequest, MessagesResponse, Usage};
