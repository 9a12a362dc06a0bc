use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Synthetic root id the web client inserts above the first real message.
pub const SENTINEL_ROOT_ID: &str = "client-created-root";

/// One conversation in the official tree-shaped export dialect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficialExport {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::null_as_default")]
    pub mapping: BTreeMap<String, RawMappingNode>,
    #[serde(default)]
    pub current_node: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMappingNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::null_as_default")]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub content: Option<RawContent>,
    /// Epoch seconds, fractional.
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

impl RawMessage {
    pub fn is_hidden(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.is_visually_hidden_from_conversation)
            .unwrap_or(false)
    }

    pub fn role(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.role.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default)]
    pub is_visually_hidden_from_conversation: Option<bool>,
}

/// Message content as it appears on the wire, before shape classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawContent {
    Text(String),
    Object(ContentObject),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentObject {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<Value>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Already-normalized conversation: `{title, messages: [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizedConversation {
    #[serde(default)]
    pub title: Option<String>,
    pub messages: Vec<NormalizedMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Flat `{role, content, timestamp?}` message used by the normalized and bare-array dialects.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizedMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<RawContent>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}
