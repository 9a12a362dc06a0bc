//! Topic and keyword nodes derived from corpus-wide conversation metadata.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::json;
use tracing::{debug, info};

use super::matcher::MatchedConversation;
use crate::error::ImportResult;
use crate::graph::GraphStore;
use crate::models::{EdgeSpec, EdgeType, NodeId, NodeSpec, NodeType};

const TOPIC_EDGE_LABEL: &str = "has topic";
const KEYWORD_EDGE_LABEL: &str = "has keyword";

/// Summarizer output that is clearly not a keyword.
const REJECTED_KEYWORD_PHRASE: &str = "would include";
const REJECTED_KEYWORD_PREFIX: &str = "**";

/// Existing nodes of `node_type`, indexed by lowercased label.
fn existing_by_label(store: &dyn GraphStore, node_type: &NodeType) -> HashMap<String, NodeId> {
    let mut index = HashMap::new();
    for node in store.nodes() {
        if &node.node_type == node_type {
            index.entry(node.label.trim().to_lowercase()).or_insert_with(|| node.id.clone());
        }
    }
    index
}

/// Creates one `topic` node per distinct topic and links every conversation to its topic.
///
/// Topics are grouped case-insensitively; the first spelling seen becomes the label. A topic
/// node that already exists (from this run or an earlier one) is reused, and edges are
/// created only if missing. Returns the number of distinct topics.
pub fn create_topic_nodes(
    store: &mut dyn GraphStore,
    conversations: &[MatchedConversation],
) -> ImportResult<usize> {
    let mut groups: Vec<(String, Vec<&NodeId>)> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();

    for conversation in conversations {
        let Some(topic) = conversation.record.metadata.topic.as_deref().map(str::trim) else {
            continue;
        };
        if topic.is_empty() {
            continue;
        }
        let key = topic.to_lowercase();
        let slot = *group_of.entry(key).or_insert_with(|| {
            groups.push((topic.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(&conversation.node_id);
    }

    let mut topic_ids = existing_by_label(store, &NodeType::Topic);
    for (label, members) in &groups {
        let topic_id = match topic_ids.get(&label.to_lowercase()) {
            Some(id) => id.clone(),
            None => {
                let id = store.create_node(
                    NodeSpec::new(label, NodeType::Topic)
                        .with_tag("topic")
                        .with_user_data(json!({ "conversationCount": members.len() })),
                )?;
                topic_ids.insert(label.to_lowercase(), id.clone());
                id
            }
        };

        for member in members {
            store.create_edge_if_missing(
                member,
                &topic_id,
                EdgeSpec::new(EdgeType::HasTopic, TOPIC_EDGE_LABEL),
            )?;
        }
        debug!(topic = %label, conversations = members.len(), "linked topic");
    }

    info!(topics = groups.len(), "created topic nodes");
    Ok(groups.len())
}

/// Canonical keyword form, or `None` for summarizer artifacts.
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let keyword = raw.trim().to_lowercase();
    if keyword.is_empty()
        || keyword.starts_with(REJECTED_KEYWORD_PREFIX)
        || keyword.contains(REJECTED_KEYWORD_PHRASE)
    {
        return None;
    }
    Some(keyword)
}

/// Counts, per keyword, how many conversations mention it.
pub fn keyword_counts(conversations: &[MatchedConversation]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for conversation in conversations {
        for keyword in conversation_keywords(conversation) {
            *counts.entry(keyword).or_insert(0) += 1;
        }
    }
    counts
}

fn conversation_keywords(conversation: &MatchedConversation) -> BTreeSet<String> {
    conversation.record.metadata.keywords.iter().filter_map(|k| normalize_keyword(k)).collect()
}

/// Creates `keyword` nodes for keywords found in at least `min_occurrences` conversations,
/// with a `has keyword` edge from every conversation that mentions them.
///
/// Counting is a full first pass over the corpus; nodes and edges are created in a second
/// pass, in keyword order. Returns the number of keywords that met the threshold.
pub fn create_keyword_nodes(
    store: &mut dyn GraphStore,
    conversations: &[MatchedConversation],
    min_occurrences: usize,
) -> ImportResult<usize> {
    let min_occurrences = min_occurrences.max(1);
    let counts = keyword_counts(conversations);
    let per_conversation: Vec<BTreeSet<String>> =
        conversations.iter().map(conversation_keywords).collect();

    let mut keyword_ids = existing_by_label(store, &NodeType::Keyword);
    let mut created = 0;

    for (keyword, &occurrences) in counts.iter().filter(|&(_, &count)| count >= min_occurrences) {
        let keyword_id = match keyword_ids.get(keyword) {
            Some(id) => id.clone(),
            None => {
                let id = store.create_node(
                    NodeSpec::new(keyword, NodeType::Keyword)
                        .with_tag("keyword")
                        .with_user_data(json!({ "occurrences": occurrences })),
                )?;
                keyword_ids.insert(keyword.clone(), id.clone());
                id
            }
        };

        for (conversation, keywords) in conversations.iter().zip(&per_conversation) {
            if keywords.contains(keyword) {
                store.create_edge_if_missing(
                    &conversation.node_id,
                    &keyword_id,
                    EdgeSpec::new(EdgeType::HasKeyword, KEYWORD_EDGE_LABEL),
                )?;
            }
        }
        created += 1;
    }

    info!(
        keywords = created,
        candidates = counts.len(),
        min_occurrences,
        "created keyword nodes"
    );
    Ok(created)
}
