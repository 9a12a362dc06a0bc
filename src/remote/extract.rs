//! Extraction of the conversation embedded in a shared-conversation page.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ImportError, ImportResult};
use crate::models::OfficialExport;

/// The page ships its server-side props as JSON inside this script tag.
static EMBEDDED_DATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]*\bid="__NEXT_DATA__"[^>]*>(.*?)</script>"#)
        .expect("embedded data pattern is valid")
});

/// Known locations of the conversation object, most specific first.
const CONVERSATION_POINTERS: [&str; 2] =
    ["/props/pageProps/serverResponse/data", "/props/pageProps/data"];

/// How deep the fallback search descends into the embedded JSON.
const MAX_SEARCH_DEPTH: usize = 16;

/// Returns the raw embedded JSON text of a share page.
pub fn extract_embedded_json(html: &str) -> ImportResult<&str> {
    EMBEDDED_DATA_REGEX
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ImportError::Extraction("no embedded page data found".to_string()))
}

/// Finds the conversation object inside the embedded page data.
pub fn locate_conversation(data: &Value) -> Option<&Value> {
    CONVERSATION_POINTERS
        .iter()
        .filter_map(|p| data.pointer(p))
        .find(|v| v.get("mapping").is_some())
        .or_else(|| find_mapping_object(data, 0))
}

fn find_mapping_object(value: &Value, depth: usize) -> Option<&Value> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(obj) if obj.get("mapping").is_some_and(Value::is_object) => Some(value),
        Value::Object(obj) => obj.values().find_map(|v| find_mapping_object(v, depth + 1)),
        Value::Array(items) => items.iter().find_map(|v| find_mapping_object(v, depth + 1)),
        _ => None,
    }
}

/// Extracts and deserializes the conversation export from a share page.
pub fn extract_conversation(html: &str) -> ImportResult<OfficialExport> {
    let raw = extract_embedded_json(html)?;
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| ImportError::Extraction(format!("embedded data is not valid JSON: {}", e)))?;
    let conversation = locate_conversation(&data).ok_or_else(|| {
        ImportError::Extraction("embedded data contains no conversation".to_string())
    })?;
    OfficialExport::deserialize(conversation)
        .map_err(|e| ImportError::Extraction(format!("malformed conversation data: {}", e)))
}
