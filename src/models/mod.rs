//! Data models for conversation exports and the graph they are projected into.
//!
//! - [`OfficialExport`] and friends - the raw, tree-shaped export dialect
//! - [`NormalizedConversation`] - the flat `{title, messages}` dialect
//! - [`ParsedConversation`] / [`ChatMessage`] - the canonical, linear form every dialect ends in
//! - [`ConversationsFile`] - pre-summarized conversation metadata
//! - [`GraphNode`], [`GraphEdge`], [`Document`] - entities owned by the external graph store
//!
//! Raw export types are deliberately lenient: every field is optional so that one malformed
//! message never fails the whole conversation.

pub mod conversation;
pub mod export;
pub mod graph;
pub mod metadata;

pub use conversation::{
    ChatMessage, DEFAULT_TITLE, MESSAGE_ARRAY_TITLE, ParsedConversation, UNKNOWN_ROLE,
};
pub use export::{
    Author, ContentObject, MessageMetadata, NormalizedConversation, NormalizedMessage,
    OfficialExport, RawContent, RawMappingNode, RawMessage, SENTINEL_ROOT_ID,
};
pub use graph::{
    Document, DocumentUpdate, EdgeId, EdgeSpec, EdgeType, GraphEdge, GraphNode, NodeId, NodeSpec,
    NodeType,
};
pub use metadata::{ConversationRecord, ConversationsFile, RecordMetadata};
