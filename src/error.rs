//! Error taxonomy for the import pipeline.
//!
//! Per-item failures ([`ImportError::PerItemParse`]) are caught at batch boundaries and
//! reported alongside the successful results. Every other kind propagates to the entry
//! points in [`crate::import`], which turn it into an error notification.

use thiserror::Error;

/// Errors raised by the graph/document store contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("node not found: {0}")]
    UnknownNode(String),
    #[error("document not found: {0}")]
    UnknownDocument(String),
    #[error("node already exists: {0}")]
    DuplicateNode(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("embedded conversation data not found: {0}")]
    Extraction(String),
    #[error("unrecognized export format: {0}")]
    UnrecognizedFormat(String),
    #[error("conversation \"{0}\" has no messages")]
    NoMessages(String),
    #[error("conversation \"{title}\" is unusable: {reason}")]
    Unusable { title: String, reason: String },
    #[error("failed to import item {index}: {reason}")]
    PerItemParse { index: usize, reason: String },
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts_into_import_error() {
        let err: ImportError = StoreError::UnknownNode("abc".to_string()).into();
        assert!(matches!(err, ImportError::Store(StoreError::UnknownNode(_))));
        assert_eq!(err.to_string(), "node not found: abc");
    }

    #[test]
    fn test_per_item_message_names_index() {
        let err = ImportError::PerItemParse { index: 3, reason: "bad mapping".to_string() };
        assert_eq!(err.to_string(), "failed to import item 3: bad mapping");
    }
}
