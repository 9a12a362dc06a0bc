use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an export carries none.
pub const DEFAULT_TITLE: &str = "Untitled Conversation";

/// Title given to conversations built from a bare message array.
pub const MESSAGE_ARRAY_TITLE: &str = "Imported Conversation";

/// Role given to messages whose author is missing.
pub const UNKNOWN_ROLE: &str = "unknown";

/// A retained message: visible, with non-blank content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into(), timestamp: None }
    }

    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConversation {
    pub title: String,
    pub messages: Vec<ChatMessage>,
    /// Set when the conversation could not be parsed; such conversations are never projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedConversation {
    pub fn new(title: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self { title: title.into(), messages, error: None }
    }

    pub fn failed(title: impl Into<String>, error: impl Into<String>) -> Self {
        Self { title: title.into(), messages: Vec::new(), error: Some(error.into()) }
    }

    pub fn is_usable(&self) -> bool {
        self.error.is_none() && !self.messages.is_empty()
    }
}
