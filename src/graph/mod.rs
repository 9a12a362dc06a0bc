//! Graph/document store contract, the in-memory reference store, and the projection of
//! parsed conversations into it.
//!
//! The importers only ever talk to [`GraphStore`]. [`MemoryGraph`] backs the command-line
//! tool and the tests and is persisted with [`load_graph`] / [`save_graph`].

pub mod memory;
pub mod persistence;
pub mod projector;
pub mod store;

pub use memory::{GraphStats, MemoryGraph};
pub use persistence::{load_graph, save_graph};
pub use projector::{BatchProjection, DOCUMENT_TAGS, project, project_batch};
pub use store::GraphStore;
