//! Parsers for exported chat-assistant conversations
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach:
//!
//! - **Individual messages**: hidden or blank messages are dropped silently; they are not
//!   errors. Missing fields fall back to defaults (`"unknown"` role, default title).
//!
//! - **Individual conversations**: in a batch export, a conversation that fails to
//!   deserialize is logged, recorded as [`crate::error::ImportError::PerItemParse`] and
//!   skipped. The rest of the batch is still returned.
//!
//! - **Whole payloads**: a payload matching none of the supported dialects fails with
//!   [`crate::error::ImportError::UnrecognizedFormat`] and yields nothing.
//!
//! - **Malformed trees**: cycles and dangling parent ids end the traversal instead of
//!   failing it, so a damaged export still produces the messages that can be reached.

pub mod content;
pub mod deserializers;
pub mod dispatch;
pub mod tree;

pub use content::{ContentShape, normalize_content, retained_content};
pub use dispatch::{ExportFormat, ParsedExport, classify, dispatch, dispatch_str};
pub use tree::{linearize, linearize_ids};
