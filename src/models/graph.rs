use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type NodeId = String;
pub type EdgeId = String;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    ConversationThread,
    UserMessage,
    AssistantMessage,
    SystemMessage,
    ToolMessage,
    Message,
    Conversation,
    Topic,
    Keyword,
    /// Any type created by other importers or by hand.
    Custom(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::ConversationThread => "ConversationThread",
            NodeType::UserMessage => "UserMessage",
            NodeType::AssistantMessage => "AssistantMessage",
            NodeType::SystemMessage => "SystemMessage",
            NodeType::ToolMessage => "ToolMessage",
            NodeType::Message => "Message",
            NodeType::Conversation => "conversation",
            NodeType::Topic => "topic",
            NodeType::Keyword => "keyword",
            NodeType::Custom(s) => s,
        }
    }

    /// Node type for a message authored by `role`.
    pub fn for_role(role: &str) -> Self {
        match role {
            "user" => NodeType::UserMessage,
            "assistant" => NodeType::AssistantMessage,
            "system" => NodeType::SystemMessage,
            "tool" => NodeType::ToolMessage,
            _ => NodeType::Message,
        }
    }

    /// True for the per-message node types created by the projector.
    pub fn is_message(&self) -> bool {
        matches!(
            self,
            NodeType::UserMessage
                | NodeType::AssistantMessage
                | NodeType::SystemMessage
                | NodeType::ToolMessage
                | NodeType::Message
        )
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ConversationThread" => NodeType::ConversationThread,
            "UserMessage" => NodeType::UserMessage,
            "AssistantMessage" => NodeType::AssistantMessage,
            "SystemMessage" => NodeType::SystemMessage,
            "ToolMessage" => NodeType::ToolMessage,
            "Message" => NodeType::Message,
            "conversation" => NodeType::Conversation,
            "topic" => NodeType::Topic,
            "keyword" => NodeType::Keyword,
            _ => NodeType::Custom(s),
        }
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeType {
    Contains,
    NextMessage,
    HasTopic,
    HasKeyword,
    Reference,
    Custom(String),
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::Contains => "contains",
            EdgeType::NextMessage => "nextMessage",
            EdgeType::HasTopic => "has topic",
            EdgeType::HasKeyword => "has keyword",
            EdgeType::Reference => "reference",
            EdgeType::Custom(s) => s,
        }
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "contains" => EdgeType::Contains,
            "nextMessage" => EdgeType::NextMessage,
            "has topic" => EdgeType::HasTopic,
            "has keyword" => EdgeType::HasKeyword,
            "reference" => EdgeType::Reference,
            _ => EdgeType::Custom(s),
        }
    }
}

impl From<EdgeType> for String {
    fn from(t: EdgeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: NodeId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexical_state: Option<Value>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Arguments to [`crate::graph::GraphStore::create_node`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: Option<NodeId>,
    pub label: String,
    pub node_type: NodeType,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub user_data: Option<Value>,
}

impl NodeSpec {
    pub fn new(label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: None,
            label: label.into(),
            node_type,
            description: None,
            tags: Vec::new(),
            user_data: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub edge_type: EdgeType,
    pub label: String,
}

impl EdgeSpec {
    pub fn new(edge_type: EdgeType, label: impl Into<String>) -> Self {
        Self { edge_type, label: label.into() }
    }
}

/// Partial document update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    pub content: Option<String>,
    pub lexical_state: Option<Value>,
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_string_roundtrip_keeps_custom_types() {
        assert_eq!(NodeType::from("topic".to_string()), NodeType::Topic);
        assert_eq!(NodeType::from("Person".to_string()), NodeType::Custom("Person".to_string()));
        assert_eq!(String::from(NodeType::ConversationThread), "ConversationThread");
    }

    #[test]
    fn test_node_type_for_role() {
        assert_eq!(NodeType::for_role("user"), NodeType::UserMessage);
        assert_eq!(NodeType::for_role("tool"), NodeType::ToolMessage);
        assert_eq!(NodeType::for_role("critic"), NodeType::Message);
    }

    #[test]
    fn test_message_types() {
        assert!(NodeType::for_role("user").is_message());
        assert!(NodeType::for_role("narrator").is_message());
        assert!(!NodeType::ConversationThread.is_message());
        assert!(!NodeType::Custom("Note".to_string()).is_message());
    }

    #[test]
    fn test_graph_node_serializes_type_field() {
        let node = GraphNode {
            id: "n1".to_string(),
            label: "Rust".to_string(),
            node_type: NodeType::Keyword,
            description: None,
            tags: BTreeSet::new(),
            user_data: None,
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "keyword");
        assert!(json.get("description").is_none());
    }
}
