//! Conversation message types.
//!
//! A `Message` is one entry of a session transcript. The same shape is used
//! for the live session, the outbound LLM request and the persisted dialog;
//! only the primer flag is transport-specific and never serialized here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Whether messages with this role belong to the user/assistant exchange.
    pub fn is_conversational(self) -> bool {
        matches!(self, Role::User | Role::Assistant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "tool" => Ok(Role::Tool),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a conversation.
///
/// `translation` is absent while the session is live and is filled in at
/// most once, after the owning dialog has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Synthetic assistant message used only to bias generation.
    #[serde(skip)]
    pub is_primer: bool,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            translation: None,
            is_primer: false,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// An assistant message flagged as a primer.
    pub fn primer(content: impl Into<String>) -> Self {
        Self {
            is_primer: true,
            ..Self::with_role(Role::Assistant, content)
        }
    }

    pub fn is_conversational(&self) -> bool {
        self.role.is_conversational()
    }
}

/// Keep only the user/assistant exchange, dropping system, tool and primer
/// messages while preserving order.
pub fn conversational(messages: &[Message]) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| m.is_conversational() && !m.is_primer)
        .cloned()
        .collect()
}
