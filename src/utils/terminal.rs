//! Terminal output sanitization
//!
//! Conversation titles and message text come straight from export files. Before they are
//! printed, escape sequences and control characters are removed so that a crafted export
//! cannot clear the screen, move the cursor or rewrite the window title.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Removes ANSI escape sequences (CSI, OSC and two-byte escapes) and control characters
/// other than tab and newline.
///
/// Returns the input unchanged, without allocating, when there is nothing to remove.
///
/// ```
/// use convo_graph::utils::terminal::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mRed\x1b[0m text"), "Red text");
/// ```
pub fn sanitize_for_terminal(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_unsafe) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.next() {
                // CSI: parameters then a final byte in '@'..='~'
                Some('[') => {
                    for c in chars.by_ref() {
                        if ('@'..='~').contains(&c) {
                            break;
                        }
                    }
                }
                // OSC: terminated by BEL or ST (ESC \)
                Some(']') => {
                    while let Some(c) = chars.next() {
                        if c == BEL {
                            break;
                        }
                        if c == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }
        if !is_unsafe(ch) {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn is_unsafe(ch: char) -> bool {
    ch.is_control() && ch != '\t' && ch != '\n'
}
