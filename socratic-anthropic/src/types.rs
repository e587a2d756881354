use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use socratic_core::Message;

/// Body of `POST /v1/messages`.
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: &'a [Message],
    pub system: &'a str,
}

/// Only `content[0].text` decides the outcome; every other field is read
/// leniently and dropped to `None` when its shape is unexpected.
#[derive(Debug, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<Vec<ContentBlock>>,
    #[serde(default, deserialize_with = "lenient")]
    pub stop_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub usage: Option<Usage>,
}

impl MessagesResponse {
    /// Text of the first content block, when it is a non-empty text block.
    /// A block without a `type` is read as text.
    pub fn first_text(&self) -> Option<&str> {
        let block = self.content.as_deref()?.first()?;
        match (block.kind.as_deref(), block.text.as_deref()) {
            (Some("text") | None, Some(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ContentBlock {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
