//! In-memory graph store, serializable to a single JSON document.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::store::GraphStore;
use crate::error::StoreError;
use crate::models::{
    Document, DocumentUpdate, EdgeId, EdgeSpec, EdgeType, GraphEdge, GraphNode, NodeId, NodeSpec,
    NodeType,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphSnapshot")]
pub struct MemoryGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    documents: BTreeMap<NodeId, Document>,
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
    #[serde(skip)]
    edge_index: HashMap<EdgeId, usize>,
    /// First edge for each `(from, to, type)`, used by `create_edge_if_missing`.
    #[serde(skip)]
    edge_keys: HashMap<EdgeKey, EdgeId>,
}

type EdgeKey = (NodeId, NodeId, EdgeType);

fn edge_key(edge: &GraphEdge) -> EdgeKey {
    (edge.from.clone(), edge.to.clone(), edge.edge_type.clone())
}

/// Wire shape of [`MemoryGraph`]; lookup indexes are rebuilt on load.
#[derive(Deserialize)]
struct GraphSnapshot {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
    #[serde(default)]
    documents: BTreeMap<NodeId, Document>,
}

impl From<GraphSnapshot> for MemoryGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        let node_index =
            snapshot.nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();
        let edge_index =
            snapshot.edges.iter().enumerate().map(|(i, e)| (e.id.clone(), i)).collect();
        let mut edge_keys = HashMap::new();
        for edge in &snapshot.edges {
            edge_keys.entry(edge_key(edge)).or_insert_with(|| edge.id.clone());
        }
        Self {
            nodes: snapshot.nodes,
            edges: snapshot.edges,
            documents: snapshot.documents,
            node_index,
            edge_index,
            edge_keys,
        }
    }
}

/// Counts per node and edge type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_type: BTreeMap<String, usize>,
    pub documents: usize,
}

impl GraphStats {
    pub fn total_nodes(&self) -> usize {
        self.nodes_by_type.values().sum()
    }

    pub fn total_edges(&self) -> usize {
        self.edges_by_type.values().sum()
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edges_of_type<'a>(
        &'a self,
        edge_type: &'a EdgeType,
    ) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| &e.edge_type == edge_type)
    }

    pub fn nodes_of_type<'a>(
        &'a self,
        node_type: &'a NodeType,
    ) -> impl Iterator<Item = &'a GraphNode> {
        self.nodes.iter().filter(move |n| &n.node_type == node_type)
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats { documents: self.documents.len(), ..Default::default() };
        for node in &self.nodes {
            *stats.nodes_by_type.entry(node.node_type.to_string()).or_default() += 1;
        }
        for edge in &self.edges {
            *stats.edges_by_type.entry(edge.edge_type.to_string()).or_default() += 1;
        }
        stats
    }

    fn require_node(&self, id: &str) -> Result<(), StoreError> {
        if self.node_index.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::UnknownNode(id.to_string()))
        }
    }
}

impl GraphStore for MemoryGraph {
    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, StoreError> {
        let id = spec.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.node_index.contains_key(&id) {
            return Err(StoreError::DuplicateNode(id));
        }

        self.node_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            id: id.clone(),
            label: spec.label,
            node_type: spec.node_type,
            description: spec.description,
            tags: spec.tags.into_iter().collect(),
            user_data: spec.user_data,
        });
        Ok(id)
    }

    fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    fn nodes(&self) -> Vec<&GraphNode> {
        self.nodes.iter().collect()
    }

    fn add_tag(&mut self, id: &str, tag: &str) -> Result<(), StoreError> {
        let index =
            *self.node_index.get(id).ok_or_else(|| StoreError::UnknownNode(id.to_string()))?;
        self.nodes[index].tags.insert(tag.to_string());
        Ok(())
    }

    fn create_edge(&mut self, from: &str, to: &str, spec: EdgeSpec) -> Result<EdgeId, StoreError> {
        self.require_node(from)?;
        self.require_node(to)?;

        let id = Uuid::new_v4().to_string();
        let edge = GraphEdge {
            id: id.clone(),
            from: from.to_string(),
            to: to.to_string(),
            edge_type: spec.edge_type,
            label: spec.label,
        };
        self.edge_keys.entry(edge_key(&edge)).or_insert_with(|| id.clone());
        self.edge_index.insert(id.clone(), self.edges.len());
        self.edges.push(edge);
        Ok(id)
    }

    fn create_edge_if_missing(
        &mut self,
        from: &str,
        to: &str,
        spec: EdgeSpec,
    ) -> Result<EdgeId, StoreError> {
        let key = (from.to_string(), to.to_string(), spec.edge_type.clone());
        if let Some(existing) = self.edge_keys.get(&key) {
            return Ok(existing.clone());
        }
        self.create_edge(from, to, spec)
    }

    fn create_document(&mut self, id: &str) -> Result<(), StoreError> {
        self.require_node(id)?;
        self.documents
            .entry(id.to_string())
            .or_insert_with(|| Document { id: id.to_string(), ..Default::default() });
        Ok(())
    }

    fn update_document(&mut self, id: &str, update: DocumentUpdate) -> Result<(), StoreError> {
        let doc =
            self.documents.get_mut(id).ok_or_else(|| StoreError::UnknownDocument(id.to_string()))?;
        if let Some(content) = update.content {
            doc.content = content;
        }
        if let Some(state) = update.lexical_state {
            doc.lexical_state = Some(state);
        }
        if let Some(tags) = update.tags {
            doc.tags = tags.into_iter().collect();
        }
        Ok(())
    }

    fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }
}
