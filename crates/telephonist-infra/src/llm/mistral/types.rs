//! Mistral chat-completions wire types.
//!
//! These are Mistral-specific request/response structures. They are NOT the
//! domain messages from telephonist-types; conversion happens at the edges.

use serde::{Deserialize, Serialize};

use telephonist_types::message::{Message, Role};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct MistralRequest {
    pub model: String,
    pub messages: Vec<MistralMessage>,
}

/// A single message on the wire.
///
/// `prefix` marks the trailing assistant message the model must continue
/// from; it is only serialized when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MistralMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prefix: bool,
}

impl MistralMessage {
    /// Whether the provider sent nothing usable: no role, no content, no
    /// prefix flag.
    pub fn is_empty(&self) -> bool {
        self.role.is_empty() && self.content.is_empty() && !self.prefix
    }
}

impl From<&Message> for MistralMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.to_string(),
            content: message.content.clone(),
            prefix: message.is_primer,
        }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ModelLength,
    Error,
    ToolCalls,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: MistralMessage,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Response body. Only the last choice is ever read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MistralResponse {
    #[serde(default)]
    pub choices: Vec<MistralChoice>,
}

/// Convert a wire reply into a domain message.
///
/// Returns `None` for an empty reply. An unrecognized role is reported as
/// an error message rather than guessed.
pub fn to_domain(message: MistralMessage) -> Result<Option<Message>, String> {
    if message.is_empty() {
        return Ok(None);
    }
    let role: Role = if message.role.is_empty() {
        Role::Assistant
    } else {
        message.role.parse()?
    };
    let mut domain = Message::assistant(message.content);
    domain.role = role;
    domain.is_primer = message.prefix;
    Ok(Some(domain))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
