//! Projection of parsed conversations into the graph/document store.

use serde_json::json;
use tracing::{info, warn};

use super::store::GraphStore;
use crate::error::{ImportError, ImportResult};
use crate::models::{
    DocumentUpdate, EdgeSpec, EdgeType, NodeId, NodeSpec, NodeType, ParsedConversation,
};
use crate::transform::{downsample, render_transcript, role_label};

/// Tags set on every transcript document.
pub const DOCUMENT_TAGS: [&str; 2] = ["conversation", "chatgpt"];

/// Projects one conversation and returns the id of its thread node.
///
/// Always creates the `ConversationThread` node and its transcript document. With
/// `create_message_nodes`, also creates one node per message, a `contains` edge from the
/// thread to each, and a `nextMessage` edge between consecutive messages.
///
/// # Errors
///
/// [`ImportError::NoMessages`] for an empty conversation and [`ImportError::Unusable`] for
/// one carrying a parse error; nothing is written in either case. Store failures
/// propagate and may leave the nodes created so far in place.
pub fn project(
    store: &mut dyn GraphStore,
    conversation: &ParsedConversation,
    source_label: &str,
    create_message_nodes: bool,
) -> ImportResult<NodeId> {
    if let Some(reason) = &conversation.error {
        return Err(ImportError::Unusable {
            title: conversation.title.clone(),
            reason: reason.clone(),
        });
    }
    if conversation.messages.is_empty() {
        return Err(ImportError::NoMessages(conversation.title.clone()));
    }

    let thread_id = store.create_node(
        NodeSpec::new(&conversation.title, NodeType::ConversationThread)
            .with_description(format!("Conversation imported from {}", source_label))
            .with_user_data(json!({
                "source": source_label,
                "messageCount": conversation.messages.len(),
            })),
    )?;

    store.create_document(&thread_id)?;
    store.update_document(
        &thread_id,
        DocumentUpdate {
            content: Some(render_transcript(conversation)),
            tags: Some(DOCUMENT_TAGS.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        },
    )?;

    if create_message_nodes {
        let mut previous: Option<NodeId> = None;
        for (index, message) in conversation.messages.iter().enumerate() {
            let message_id = store.create_node(
                NodeSpec::new(role_label(&message.role), NodeType::for_role(&message.role))
                    .with_description(&message.content)
                    .with_tag(&message.role)
                    .with_user_data(json!({
                        "index": index,
                        "timestamp": message.timestamp,
                    })),
            )?;

            let contains = EdgeSpec::new(EdgeType::Contains, "contains");
            store.create_edge(&thread_id, &message_id, contains)?;
            if let Some(prev) = &previous {
                let next = EdgeSpec::new(EdgeType::NextMessage, "next message");
                store.create_edge(prev, &message_id, next)?;
            }
            previous = Some(message_id);
        }
    }

    Ok(thread_id)
}

/// Outcome of [`project_batch`].
#[derive(Debug, Default)]
pub struct BatchProjection {
    pub thread_ids: Vec<NodeId>,
    pub failures: Vec<ImportError>,
    /// Conversations considered after downsampling.
    pub attempted: usize,
}

/// Projects every conversation in order, optionally downsampling first.
///
/// Each conversation is paired with its position in the source file. A conversation that
/// fails to project is logged, recorded as [`ImportError::PerItemParse`] under that position
/// and skipped; the batch never aborts.
pub fn project_batch(
    store: &mut dyn GraphStore,
    conversations: Vec<(usize, ParsedConversation)>,
    source_label: &str,
    create_message_nodes: bool,
    downsample_ratio: Option<f64>,
) -> BatchProjection {
    let total = conversations.len();
    let conversations = match downsample_ratio {
        Some(ratio) => downsample(conversations, ratio),
        None => conversations,
    };

    let mut result = BatchProjection { attempted: conversations.len(), ..Default::default() };
    for (index, conversation) in conversations {
        match project(store, &conversation, source_label, create_message_nodes) {
            Ok(id) => result.thread_ids.push(id),
            Err(e) => {
                warn!(index, title = %conversation.title, error = %e, "skipping conversation");
                result.failures.push(ImportError::PerItemParse { index, reason: e.to_string() });
            }
        }
    }

    info!(
        total,
        attempted = result.attempted,
        imported = result.thread_ids.len(),
        failed = result.failures.len(),
        "projected conversation batch"
    );
    result
}
