//! Export dialect detection and routing.
//!
//! Four dialects are accepted, tried strictly in this order:
//!
//! 1. an array of official exports (first element has `mapping` or `title`)
//! 2. a single official export (object with both `mapping` and `title`)
//! 3. an already-normalized object (`title` plus a `messages` array)
//! 4. a bare array of `{role, content, timestamp?}` messages
//!
//! Arrays are only ever read as dialect 1 or 4. Anything else is
//! [`ImportError::UnrecognizedFormat`] with no partial result.

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ImportError, ImportResult};
use crate::models::{
    ChatMessage, DEFAULT_TITLE, MESSAGE_ARRAY_TITLE, NormalizedConversation, NormalizedMessage,
    OfficialExport, ParsedConversation, UNKNOWN_ROLE,
};
use crate::parsers::content::normalize_content;
use crate::parsers::tree::linearize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    OfficialBatch,
    OfficialSingle,
    Normalized,
    MessageArray,
}

/// Result of dispatching one payload.
#[derive(Debug)]
pub enum ParsedExport {
    Single { format: ExportFormat, conversation: ParsedConversation },
    Batch {
        conversations: Vec<ParsedConversation>,
        /// Index of each conversation in the source array, parallel to `conversations`.
        positions: Vec<usize>,
        failures: Vec<ImportError>,
    },
}

impl ParsedExport {
    pub fn format(&self) -> ExportFormat {
        match self {
            ParsedExport::Single { format, .. } => *format,
            ParsedExport::Batch { .. } => ExportFormat::OfficialBatch,
        }
    }

    pub fn conversations(&self) -> &[ParsedConversation] {
        match self {
            ParsedExport::Single { conversation, .. } => std::slice::from_ref(conversation),
            ParsedExport::Batch { conversations, .. } => conversations,
        }
    }

    pub fn into_conversations(self) -> Vec<ParsedConversation> {
        match self {
            ParsedExport::Single { conversation, .. } => vec![conversation],
            ParsedExport::Batch { conversations, .. } => conversations,
        }
    }
}

/// Classifies a payload without parsing it.
pub fn classify(value: &Value) -> Option<ExportFormat> {
    match value {
        Value::Array(items) => {
            let first = items.first()?;
            if has_key(first, "mapping") || has_key(first, "title") {
                Some(ExportFormat::OfficialBatch)
            } else if has_key(first, "role") && has_key(first, "content") {
                Some(ExportFormat::MessageArray)
            } else {
                None
            }
        }
        Value::Object(_) => {
            if has_key(value, "mapping") && has_key(value, "title") {
                Some(ExportFormat::OfficialSingle)
            } else if has_key(value, "title")
                && value.get("messages").is_some_and(Value::is_array)
            {
                Some(ExportFormat::Normalized)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn has_key(value: &Value, key: &str) -> bool {
    value.as_object().is_some_and(|obj| obj.contains_key(key))
}

/// Parses JSON text and dispatches it.
pub fn dispatch_str(text: &str) -> ImportResult<ParsedExport> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ImportError::UnrecognizedFormat(format!("invalid JSON: {}", e)))?;
    dispatch(value)
}

/// Routes an already-parsed payload to the matching dialect parser.
pub fn dispatch(value: Value) -> ImportResult<ParsedExport> {
    let format = classify(&value).ok_or_else(|| {
        ImportError::UnrecognizedFormat(format!("unsupported {} payload", json_kind(&value)))
    })?;

    match format {
        ExportFormat::OfficialBatch => Ok(parse_batch(value)),
        ExportFormat::OfficialSingle => {
            let export: OfficialExport = serde_json::from_value(value)
                .map_err(|e| ImportError::UnrecognizedFormat(e.to_string()))?;
            Ok(ParsedExport::Single { format, conversation: linearize(&export) })
        }
        ExportFormat::Normalized => {
            let normalized: NormalizedConversation = serde_json::from_value(value)
                .map_err(|e| ImportError::UnrecognizedFormat(e.to_string()))?;
            Ok(ParsedExport::Single { format, conversation: from_normalized(normalized) })
        }
        ExportFormat::MessageArray => {
            let messages: Vec<NormalizedMessage> = serde_json::from_value(value)
                .map_err(|e| ImportError::UnrecognizedFormat(e.to_string()))?;
            let conversation =
                ParsedConversation::new(MESSAGE_ARRAY_TITLE, to_chat_messages(messages));
            Ok(ParsedExport::Single { format, conversation })
        }
    }
}

/// Parses every element independently; a bad element is recorded and skipped.
fn parse_batch(value: Value) -> ParsedExport {
    let Value::Array(items) = value else {
        return ParsedExport::Batch {
            conversations: Vec::new(),
            positions: Vec::new(),
            failures: Vec::new(),
        };
    };

    let total = items.len();
    let mut conversations = Vec::with_capacity(total);
    let mut positions = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<OfficialExport>(item) {
            Ok(export) => {
                conversations.push(linearize(&export));
                positions.push(index);
            }
            Err(e) => {
                warn!(index, error = %e, "skipping unparseable conversation in export");
                failures.push(ImportError::PerItemParse { index, reason: e.to_string() });
            }
        }
    }

    info!(total, parsed = conversations.len(), failed = failures.len(), "parsed export batch");
    ParsedExport::Batch { conversations, positions, failures }
}

fn from_normalized(normalized: NormalizedConversation) -> ParsedConversation {
    let title = normalized
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string();
    ParsedConversation {
        title,
        messages: to_chat_messages(normalized.messages),
        error: normalized.error,
    }
}

/// Keeps only messages whose content renders to non-blank text.
fn to_chat_messages(messages: Vec<NormalizedMessage>) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .filter_map(|m| {
            let content = normalize_content(m.content.as_ref());
            if content.trim().is_empty() {
                return None;
            }
            let role = m.role.unwrap_or_else(|| UNKNOWN_ROLE.to_string());
            Some(ChatMessage::new(role, content).with_timestamp(m.timestamp))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(a) if a.is_empty() => "empty array",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
