use crate::error::StoreError;
use crate::models::{
    Document, DocumentUpdate, EdgeId, EdgeSpec, GraphEdge, GraphNode, NodeId, NodeSpec,
};

/// Contract of the graph/document backend the importers write into.
///
/// Implementations are last-writer-wins with no transactional isolation. The importers take
/// the store by `&mut`, so one process never runs two imports against the same store at
/// once; serializing access across processes is the caller's job.
pub trait GraphStore {
    /// Creates a node, using `spec.id` when given or generating a fresh id.
    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, StoreError>;

    fn node(&self, id: &str) -> Option<&GraphNode>;

    fn edge(&self, id: &str) -> Option<&GraphEdge>;

    /// All nodes in creation order.
    fn nodes(&self) -> Vec<&GraphNode>;

    fn add_tag(&mut self, id: &str, tag: &str) -> Result<(), StoreError>;

    /// Always creates a new edge.
    fn create_edge(&mut self, from: &str, to: &str, spec: EdgeSpec) -> Result<EdgeId, StoreError>;

    /// Returns the id of an existing edge with the same endpoints and type, or creates one.
    fn create_edge_if_missing(
        &mut self,
        from: &str,
        to: &str,
        spec: EdgeSpec,
    ) -> Result<EdgeId, StoreError>;

    /// Creates an empty document keyed by a node id; an existing document is kept.
    fn create_document(&mut self, id: &str) -> Result<(), StoreError>;

    fn update_document(&mut self, id: &str, update: DocumentUpdate) -> Result<(), StoreError>;

    fn document(&self, id: &str) -> Option<&Document>;
}
