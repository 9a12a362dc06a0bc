//! Shared-conversation pages: fetching them and pulling out the embedded conversation.

pub mod extract;
pub mod fetcher;

pub use extract::{extract_conversation, extract_embedded_json, locate_conversation};
pub use fetcher::{HttpFetcher, TextFetcher};
