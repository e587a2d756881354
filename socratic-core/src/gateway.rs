use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::ChatContext;

/// Upstream bodies are cut to this many characters in diagnostics.
pub const RESPONSE_BODY_PREVIEW: usize = 500;

/// Why an upstream call produced no usable text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayFailure {
    #[error("empty response")]
    EmptyResponse,
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("API exception: {kind} - {message}")]
    Transport { kind: String, message: String },
}

/// Observability bundle describing one upstream exchange.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Diagnostics {
    pub fn preview(body: &str) -> String {
        body.chars().take(RESPONSE_BODY_PREVIEW).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GatewayReply {
    pub outcome: Result<String, GatewayFailure>,
    pub diagnostics: Option<Diagnostics>,
}

impl GatewayReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            diagnostics: None,
        }
    }

    pub fn failure(failure: GatewayFailure) -> Self {
        Self {
            outcome: Err(failure),
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Option<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Non-empty reply text, if the call succeeded.
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            Ok(text) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

/// One outbound call to the chat model. Implementations make exactly one
/// attempt and report every failure inside the reply instead of erroring.
#[async_trait::async_trait]
pub trait TutorGateway: Send + Sync {
    async fn complete(&self, context: &ChatContext, diagnostics: bool) -> GatewayReply;
}
