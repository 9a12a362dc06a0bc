//! Markdown transcript rendering.

use std::borrow::Cow;

use crate::models::ParsedConversation;

const MESSAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Display name for a message role.
///
/// Known roles map to fixed names; anything else is title-cased and suffixed.
pub fn role_label(role: &str) -> Cow<'static, str> {
    match role {
        "user" => Cow::Borrowed("User"),
        "assistant" => Cow::Borrowed("Assistant"),
        "system" => Cow::Borrowed("System"),
        "tool" => Cow::Borrowed("Tool"),
        other => Cow::Owned(format!("{} Message", title_case(other))),
    }
}

fn title_case(s: &str) -> String {
    let words: Vec<String> = s
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                }
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() { "Unknown".to_string() } else { words.join(" ") }
}

/// Renders a conversation as one markdown document.
///
/// A `#` title heading, then one `##` section per message with a `---` rule between
/// consecutive messages (none after the last). Blank messages are skipped.
pub fn render_transcript(conversation: &ParsedConversation) -> String {
    let sections: Vec<String> = conversation
        .messages
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .map(|m| {
            let mut section = format!("## {}\n\n", role_label(&m.role));
            if let Some(ts) = m.timestamp {
                section.push_str(&format!("*{}*\n\n", ts.format("%Y-%m-%d %H:%M:%S UTC")));
            }
            section.push_str(&m.content);
            section
        })
        .collect();

    let mut doc = format!("# {}", conversation.title);
    if !sections.is_empty() {
        doc.push_str("\n\n");
        doc.push_str(&sections.join(MESSAGE_SEPARATOR));
    }
    doc.push('\n');
    doc
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::models::ChatMessage;

    #[test]
    fn test_role_labels() {
        assert_eq!(role_label("user"), "User");
        assert_eq!(role_label("assistant"), "Assistant");
        assert_eq!(role_label("system"), "System");
        assert_eq!(role_label("tool"), "Tool");
        assert_eq!(role_label("critic"), "Critic Message");
        assert_eq!(role_label("web_browser"), "Web Browser Message");
        assert_eq!(role_label(""), "Unknown Message");
    }

    #[test]
    fn test_transcript_layout() {
        let conv = ParsedConversation::new(
            "Greetings",
            vec![ChatMessage::new("user", "Hello"), ChatMessage::new("assistant", "Hi there")],
        );
        assert_eq!(
            render_transcript(&conv),
            "# Greetings\n\n## User\n\nHello\n\n---\n\n## Assistant\n\nHi there\n"
        );
    }

    #[test]
    fn test_no_trailing_separator_and_blank_messages_skipped() {
        let conv = ParsedConversation::new(
            "T",
            vec![ChatMessage::new("user", "one"), ChatMessage::new("assistant", "   ")],
        );
        let doc = render_transcript(&conv);
        assert!(!doc.contains("---"));
        assert!(!doc.contains("Assistant"));
    }

    #[test]
    fn test_timestamp_line() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0);
        let conv =
            ParsedConversation::new("T", vec![ChatMessage::new("user", "hi").with_timestamp(ts)]);
        assert!(render_transcript(&conv).contains("*2023-11-14 22:13:20 UTC*"));
    }

    #[test]
    fn test_empty_conversation_is_just_a_heading() {
        assert_eq!(render_transcript(&ParsedConversation::new("Empty", Vec::new())), "# Empty\n");
    }
}
