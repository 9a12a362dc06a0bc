//! Matching of pre-summarized conversations against nodes already in the graph.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, info};

use crate::error::ImportResult;
use crate::graph::GraphStore;
use crate::models::{ConversationRecord, EdgeSpec, EdgeType, NodeId, NodeSpec, NodeType};

const CONVERSATION_TAG: &str = "conversation";
const REFERENCE_LABEL: &str = "has conversation";

/// A conversation node created (or found) for one record.
#[derive(Debug, Clone)]
pub struct MatchedConversation {
    pub node_id: NodeId,
    pub record: ConversationRecord,
    /// Existing node whose label equals the record title, if any.
    pub matched_node: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub imported: usize,
    pub matched: usize,
    pub conversations: Vec<MatchedConversation>,
}

/// Stable node id for a record, so repeated imports reuse the same node.
pub fn conversation_node_id(record: &ConversationRecord) -> NodeId {
    let key = [record.id.trim(), record.hash.as_deref().unwrap_or("").trim()]
        .into_iter()
        .find(|k| !k.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| record.title.trim().to_lowercase());
    format!("conversation-{}", key)
}

/// Node types this module creates itself; they never take part in title matching.
fn is_derived_type(node_type: &NodeType) -> bool {
    matches!(node_type, NodeType::Conversation | NodeType::Topic | NodeType::Keyword)
}

/// Message nodes are labelled by role, so their labels never name a conversation.
fn is_matchable(node_type: &NodeType) -> bool {
    !is_derived_type(node_type) && !node_type.is_message()
}

/// Builds the lowercase `label -> node id` index once; the first node with a label wins.
fn label_index(store: &dyn GraphStore) -> HashMap<String, NodeId> {
    let mut index = HashMap::new();
    for node in store.nodes() {
        if !is_matchable(&node.node_type) {
            continue;
        }
        index.entry(node.label.trim().to_lowercase()).or_insert_with(|| node.id.clone());
    }
    index
}

/// Creates a conversation node per record and links it to the existing node with the same
/// title (case-insensitive) through a `reference` edge.
///
/// Both the nodes and the reference edges are idempotent: re-running with the same records
/// reuses the nodes and never duplicates an edge.
pub fn match_conversations(
    store: &mut dyn GraphStore,
    records: &[ConversationRecord],
) -> ImportResult<MatchReport> {
    let index = label_index(store);
    let mut report = MatchReport::default();

    for record in records {
        let node_id = ensure_conversation_node(store, record)?;
        let matched_node = index.get(&record.title.trim().to_lowercase()).cloned();

        if let Some(target) = &matched_node {
            store.create_edge_if_missing(
                target,
                &node_id,
                EdgeSpec::new(EdgeType::Reference, REFERENCE_LABEL),
            )?;
            report.matched += 1;
            debug!(title = %record.title, node = %target, "matched conversation to existing node");
        }

        report.imported += 1;
        report.conversations.push(MatchedConversation {
            node_id,
            record: record.clone(),
            matched_node,
        });
    }

    info!(imported = report.imported, matched = report.matched, "matched conversation metadata");
    Ok(report)
}

fn ensure_conversation_node(
    store: &mut dyn GraphStore,
    record: &ConversationRecord,
) -> ImportResult<NodeId> {
    let id = conversation_node_id(record);
    if store.node(&id).is_some() {
        return Ok(id);
    }

    let description = if record.metadata.summary.trim().is_empty() {
        record.excerpt.clone()
    } else {
        record.metadata.summary.clone()
    };

    let spec = NodeSpec::new(&record.title, NodeType::Conversation)
        .with_id(id)
        .with_description(description)
        .with_tag(CONVERSATION_TAG)
        .with_user_data(json!({
            "excerpt": record.excerpt,
            "messageCount": record.message_count,
            "charLength": record.char_length,
            "hash": record.hash,
            "timestamp": record.timestamp,
            "metadata": record.metadata,
        }));
    Ok(store.create_node(spec)?)
}
