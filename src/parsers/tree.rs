//! Linearization of tree-shaped exports into a chronological message list.
//!
//! The export keeps every edit branch in a flat `id -> node` table. The visible conversation
//! is the path from the root down to one leaf; it is recovered by walking parent pointers
//! backwards from that leaf and reversing. The table is never trusted to be acyclic: every
//! walk carries a visited set and stops on the first repeated id.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::{
    ChatMessage, DEFAULT_TITLE, OfficialExport, ParsedConversation, RawMappingNode,
    SENTINEL_ROOT_ID, UNKNOWN_ROLE,
};
use crate::parsers::content::retained_content;
use crate::parsers::deserializers::epoch_seconds_to_datetime;

type Mapping = BTreeMap<String, RawMappingNode>;

/// Linearizes one official export.
///
/// An empty mapping or an unknown `current_node` yields a conversation with zero messages;
/// callers decide whether that is an error.
pub fn linearize(export: &OfficialExport) -> ParsedConversation {
    let title = export
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let path = linearize_ids(&export.mapping, export.current_node.as_deref());
    let messages = collect_messages(&export.mapping, &path);
    debug!(title, nodes = path.len(), messages = messages.len(), "linearized conversation");

    ParsedConversation::new(title, messages)
}

/// Ordered node ids (oldest first) of the visible branch.
///
/// With a `current_node` the walk starts there and follows declared parents, falling back
/// to the parent reconstructed from `children` lists. Without one, the leaf is found by
/// descending from the root along the most recent child and the walk uses only the
/// reconstructed parents.
pub fn linearize_ids<'a>(mapping: &'a Mapping, current_node: Option<&str>) -> Vec<&'a str> {
    if mapping.is_empty() {
        return Vec::new();
    }

    let derived = derive_parents(mapping);

    match current_node {
        Some(start) => {
            let Some((start, _)) = mapping.get_key_value(start) else {
                warn!(current_node = start, "current node not present in mapping");
                return Vec::new();
            };
            walk_back(start, |id| declared_parent(mapping, id).or_else(|| derived.get(id).copied()))
        }
        None => match find_root(mapping, &derived).map(|root| descend_to_leaf(mapping, root)) {
            Some(leaf) => walk_back(leaf, |id| derived.get(id).copied()),
            None => Vec::new(),
        },
    }
}

/// Builds `child -> parent` by scanning every node's `children` once.
///
/// A child listed under several parents keeps the first one in key order.
fn derive_parents(mapping: &Mapping) -> HashMap<&str, &str> {
    let mut parents = HashMap::new();
    for (id, node) in mapping {
        for child in &node.children {
            if let Some((child, _)) = mapping.get_key_value(child) {
                parents.entry(child.as_str()).or_insert(id.as_str());
            }
        }
    }
    parents
}

fn declared_parent<'a>(mapping: &'a Mapping, id: &str) -> Option<&'a str> {
    let parent = mapping.get(id)?.parent.as_deref()?;
    mapping.get_key_value(parent).map(|(k, _)| k.as_str())
}

/// Follows `parent_of` from `start` until a root or a repeated id, then reverses.
fn walk_back<'a>(start: &'a str, parent_of: impl Fn(&str) -> Option<&'a str>) -> Vec<&'a str> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut current = Some(start);

    while let Some(id) = current {
        if !visited.insert(id) {
            warn!(node = id, "cycle detected in conversation tree, stopping traversal");
            break;
        }
        path.push(id);
        current = parent_of(id);
    }

    path.reverse();
    path
}

/// Picks where a forward descent begins.
///
/// The sentinel root itself is never the start; its first child is. Otherwise the first
/// node (in key order) that nobody lists as a child is the root.
fn find_root<'a>(mapping: &'a Mapping, derived: &HashMap<&str, &str>) -> Option<&'a str> {
    if let Some(sentinel) = mapping.get(SENTINEL_ROOT_ID) {
        return sentinel
            .children
            .iter()
            .find_map(|child| mapping.get_key_value(child))
            .map(|(k, _)| k.as_str());
    }

    mapping
        .iter()
        .find(|(id, node)| {
            !derived.contains_key(id.as_str())
                && node.parent.as_deref().is_none_or(|p| !mapping.contains_key(p))
        })
        .map(|(id, _)| id.as_str())
}

/// Descends along the last (most recent) child at every branch until a leaf.
fn descend_to_leaf<'a>(mapping: &'a Mapping, root: &'a str) -> &'a str {
    let mut visited = HashSet::new();
    let mut current = root;

    while visited.insert(current) {
        let next = mapping.get(current).and_then(|node| {
            node.children.iter().rev().find_map(|child| mapping.get_key_value(child))
        });
        match next {
            Some((child, _)) if !visited.contains(child.as_str()) => current = child.as_str(),
            _ => break,
        }
    }

    current
}

/// Turns a node path into retained messages, skipping container nodes.
fn collect_messages(mapping: &Mapping, path: &[&str]) -> Vec<ChatMessage> {
    path.iter()
        .filter_map(|id| mapping.get(*id)?.message.as_ref())
        .filter_map(|message| {
            let content = retained_content(message)?;
            let role = message.role().unwrap_or(UNKNOWN_ROLE);
            let timestamp = message.create_time.and_then(epoch_seconds_to_datetime);
            Some(ChatMessage::new(role, content).with_timestamp(timestamp))
        })
        .collect()
}
