//! Convo Graph - turn chat-assistant conversation exports into a knowledge graph
//!
//! This library reads exported conversations in any of the supported dialects and projects
//! them into a graph/document store. It supports:
//!
//! - Detecting the export dialect and normalizing message content
//! - Linearizing tree-shaped conversations into one chronological thread
//! - Downsampling large batch exports deterministically
//! - Rendering markdown transcripts and projecting threads, messages and edges into a store
//! - Linking pre-summarized conversations to existing nodes and deriving topic/keyword nodes
//! - Fetching shared conversation pages
//!
//! # Example
//!
//! ```
//! use convo_graph::{GraphStore, MemoryGraph, dispatch_str, project};
//!
//! let json = r#"{"title": "Greeting", "messages": [
//!     {"role": "user", "content": "Hello"},
//!     {"role": "assistant", "content": "Hi there"}
//! ]}"#;
//!
//! let parsed = dispatch_str(json)?;
//! let mut graph = MemoryGraph::new();
//! let thread = project(&mut graph, &parsed.conversations()[0], "example", false)?;
//! assert_eq!(graph.node(&thread).unwrap().label, "Greeting");
//! # Ok::<(), convo_graph::ImportError>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod error;
pub mod graph;
pub mod import;
pub mod metadata;
pub mod models;
pub mod notify;
pub mod parsers;
pub mod remote;
pub mod transform;
pub mod utils;

// Re-export commonly used types
pub use error::{ImportError, ImportResult, StoreError};
pub use graph::{GraphStore, MemoryGraph, project, project_batch};
pub use import::{
    ImportOptions, ImportedThreads, Importer, StructureImportReport, fetch_chatgpt_conversation,
};
pub use models::{ChatMessage, ParsedConversation};
pub use notify::{Notification, NotificationKind, Notifier};
pub use parsers::{ParsedExport, dispatch, dispatch_str, linearize};
pub use transform::{downsample, render_transcript};
