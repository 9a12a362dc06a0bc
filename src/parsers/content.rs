//! Message content normalization.
//!
//! Wire content is first classified into a closed [`ContentShape`] and then rendered to a
//! single string. New content shapes belong in the match below, not in a fallthrough.

use serde_json::Value;

use crate::models::{ContentObject, RawContent, RawMessage};

const CONTENT_TYPE_TEXT: &str = "text";
const CONTENT_TYPE_CODE: &str = "code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentShape<'a> {
    Plain(&'a str),
    Text(Vec<&'a str>),
    Code { language: &'a str, text: &'a str },
    Parts(Vec<&'a str>),
    Unsupported,
}

impl<'a> ContentShape<'a> {
    /// Classifies content using the shape probes in priority order.
    pub fn classify(content: &'a RawContent) -> Self {
        match content {
            RawContent::Text(s) => ContentShape::Plain(s),
            RawContent::Object(obj) => Self::classify_object(obj),
            RawContent::Other(_) => ContentShape::Unsupported,
        }
    }

    fn classify_object(obj: &'a ContentObject) -> Self {
        match (obj.content_type.as_deref(), obj.parts.as_deref()) {
            (Some(CONTENT_TYPE_TEXT), Some(parts)) => ContentShape::Text(string_parts(parts)),
            (Some(CONTENT_TYPE_CODE), _) => ContentShape::Code {
                language: obj.language.as_deref().unwrap_or(""),
                text: obj.text.as_deref().unwrap_or(""),
            },
            (_, Some(parts)) => ContentShape::Parts(string_parts(parts)),
            _ => ContentShape::Unsupported,
        }
    }

    pub fn render(&self) -> String {
        match self {
            ContentShape::Plain(s) => (*s).to_string(),
            ContentShape::Text(parts) | ContentShape::Parts(parts) => parts.join("\n"),
            ContentShape::Code { language, text } => format!("```{}\n{}\n```", language, text),
            ContentShape::Unsupported => String::new(),
        }
    }
}

// Non-string parts (image pointers, attachments) carry no renderable text.
fn string_parts(parts: &[Value]) -> Vec<&str> {
    parts.iter().filter_map(Value::as_str).collect()
}

/// Renders content of unknown shape to text, or the empty string.
pub fn normalize_content(content: Option<&RawContent>) -> String {
    content.map(|c| ContentShape::classify(c).render()).unwrap_or_default()
}

/// Normalized content of `message`, or `None` when the message is hidden or blank.
pub fn retained_content(message: &RawMessage) -> Option<String> {
    if message.is_hidden() {
        return None;
    }
    let text = normalize_content(message.content.as_ref());
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn content(value: Value) -> RawContent {
        serde_json::from_value(value).unwrap()
    }

    fn message(value: Value) -> RawMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_string_is_verbatim() {
        let c = content(json!("  Hello\nworld  "));
        assert_eq!(normalize_content(Some(&c)), "  Hello\nworld  ");
    }

    #[test]
    fn test_text_parts_are_newline_joined() {
        let c = content(json!({"content_type": "text", "parts": ["a", "b", "c"]}));
        assert_eq!(ContentShape::classify(&c), ContentShape::Text(vec!["a", "b", "c"]));
        assert_eq!(normalize_content(Some(&c)), "a\nb\nc");
    }

    #[test]
    fn test_code_renders_fenced_block() {
        let c = content(json!({"content_type": "code", "language": "py", "text": "x=1"}));
        assert_eq!(normalize_content(Some(&c)), "```py\nx=1\n```");
    }

    #[test]
    fn test_code_defaults_language_and_text() {
        let c = content(json!({"content_type": "code"}));
        assert_eq!(normalize_content(Some(&c)), "```\n\n```");
    }

    #[test]
    fn test_bare_parts_without_content_type() {
        let c = content(json!({"parts": ["one", {"asset_pointer": "file-1"}, "two"]}));
        assert_eq!(ContentShape::classify(&c), ContentShape::Parts(vec!["one", "two"]));
        assert_eq!(normalize_content(Some(&c)), "one\ntwo");
    }

    #[test]
    fn test_unknown_shapes_render_empty() {
        let c = content(json!({"content_type": "tether_browsing_display", "result": "x"}));
        assert_eq!(ContentShape::classify(&c), ContentShape::Unsupported);
        assert_eq!(normalize_content(Some(&c)), "");

        let c = content(json!(42));
        assert_eq!(normalize_content(Some(&c)), "");
        assert_eq!(normalize_content(None), "");
    }

    #[test]
    fn test_hidden_message_is_never_retained() {
        let m = message(json!({
            "author": {"role": "system"},
            "content": {"content_type": "text", "parts": ["You are helpful"]},
            "metadata": {"is_visually_hidden_from_conversation": true}
        }));
        assert_eq!(retained_content(&m), None);
    }

    #[test]
    fn test_whitespace_only_message_is_dropped() {
        let m = message(json!({"author": {"role": "user"}, "content": {"content_type": "text", "parts": ["  ", "\n"]}}));
        assert_eq!(retained_content(&m), None);
    }

    #[test]
    fn test_visible_message_is_retained() {
        let m = message(json!({
            "author": {"role": "user"},
            "content": "Hello",
            "metadata": {"is_visually_hidden_from_conversation": false}
        }));
        assert_eq!(retained_content(&m).as_deref(), Some("Hello"));
    }
}
