//! Structure import for pre-summarized conversations.
//!
//! [`match_conversations`] links each summarized conversation to an existing graph node by
//! title; [`create_topic_nodes`] and [`create_keyword_nodes`] then derive topic and keyword
//! nodes from the metadata of the whole corpus. All three are safe to re-run: nodes are
//! looked up before being created and edges use create-if-missing semantics.

pub mod derive;
pub mod matcher;

pub use derive::{create_keyword_nodes, create_topic_nodes, keyword_counts, normalize_keyword};
pub use matcher::{MatchReport, MatchedConversation, conversation_node_id, match_conversations};
