use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use secrecy::ExposeSecret;
use socratic_core::{ChatContext, Diagnostics, GatewayFailure, GatewayReply, TutorGateway};
use url::Url;

use crate::types::{MessagesRequest, MessagesResponse};
use crate::{AnthropicConfig, AnthropicError};

const API_KEY_HEADER: &str = "x-api-key";
const VERSION_HEADER: &str = "anthropic-version";
const REDACTED: &str = "[REDACTED]";

#[derive(Clone, Debug)]
pub struct AnthropicClient {
    http: Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    headers: HeaderMap,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, AnthropicError> {
        let api_key = config.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(AnthropicError::Config("api_key cannot be empty".to_string()));
        }

        let endpoint = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
        Url::parse(&endpoint)
            .map_err(|err| AnthropicError::Config(format!("invalid base_url: {err}")))?;

        let mut key_value = HeaderValue::from_str(api_key).map_err(|_| {
            AnthropicError::Config("api_key is not a valid header value".to_string())
        })?;
        key_value.set_sensitive(true);
        let version_value = HeaderValue::from_str(&config.api_version).map_err(|_| {
            AnthropicError::Config("api_version is not a valid header value".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key_value);
        headers.insert(HeaderName::from_static(VERSION_HEADER), version_value);

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            endpoint,
            model: config.model,
            max_tokens: config.max_tokens,
            headers,
        })
    }

    pub fn from_env() -> Result<Self, AnthropicError> {
        Self::new(AnthropicConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn header_snapshot(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let shown = if value.is_sensitive() {
                    REDACTED.to_string()
                } else {
                    value.to_str().unwrap_or_default().to_string()
                };
                (name.as_str().to_string(), shown)
            })
            .collect()
    }

    async fn send(
        &self,
        body: &MessagesRequest<'_>,
        diagnostics: &mut Option<Diagnostics>,
    ) -> Result<String, GatewayFailure> {
        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_failure)?;

        tracing::info!(
            status = status.as_u16(),
            messages = body.messages.len(),
            "anthropic messages call completed"
        );

        if let Some(diagnostics) = diagnostics.as_mut() {
            diagnostics.status = Some(status.as_u16());
            diagnostics.response_body = Some(Diagnostics::preview(&text));
        }

        if status != reqwest::StatusCode::OK {
            return Err(GatewayFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(|err| GatewayFailure::Parse(err.to_string()))?;
        if let Some(usage) = parsed.usage {
            tracing::debug!(
                id = parsed.id.as_deref().unwrap_or_default(),
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = parsed.stop_reason.as_deref().unwrap_or_default(),
                "anthropic usage"
            );
        }

        parsed
            .first_text()
            .map(ToOwned::to_owned)
            .ok_or(GatewayFailure::EmptyResponse)
    }
}

fn transport_failure(err: reqwest::Error) -> GatewayFailure {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else if err.is_request() {
        "request"
    } else {
        "transport"
    };
    GatewayFailure::Transport {
        kind: kind.to_string(),
        message: error_chain(&err),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait::async_trait]
impl TutorGateway for AnthropicClient {
    async fn complete(&self, context: &ChatContext, diagnostics: bool) -> GatewayReply {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: &context.messages,
            system: &context.system,
        };

        let mut bundle = diagnostics.then(|| Diagnostics {
            request_body: serde_json::to_value(&body).ok(),
            headers: self.header_snapshot(),
            ..Diagnostics::default()
        });

        let outcome = self.send(&body, &mut bundle).await;
        match &outcome {
            Ok(text) => tracing::info!(chars = text.len(), "anthropic returned an answer"),
            Err(failure) => {
                tracing::error!(reason = %failure, "anthropic call produced no answer");
                if let Some(bundle) = bundle.as_mut() {
                    bundle.error = Some(failure.to_string());
                }
            }
        }

        GatewayReply {
            outcome,
            diagnostics: bundle,
        }
    }
}
