use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of the offline summarization step: one record per conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationsFile {
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub conversation_count: usize,
    pub conversations: Vec<ConversationRecord>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub char_length: usize,
    #[serde(default)]
    pub metadata: RecordMetadata,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}
