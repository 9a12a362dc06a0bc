//! Import entry points.
//!
//! Each [`Importer`] method runs one import end to end and never returns an error: failures
//! are reported through the [`Notifier`] and surface as `None`. Batches that partially
//! succeed are reported as a success with the achieved count.

pub mod recent;

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{ImportError, ImportResult};
use crate::graph::{GraphStore, project, project_batch};
use crate::metadata::{create_keyword_nodes, create_topic_nodes, match_conversations};
use crate::models::{ConversationsFile, NodeId, ParsedConversation};
use crate::notify::{Notification, Notifier};
use crate::parsers::{ParsedExport, dispatch_str, linearize};
use crate::remote::{TextFetcher, extract_conversation};
use crate::transform::downsample::MAX_RATIO;
use crate::utils::read_export_file;

pub use recent::{
    CHATGPT_FILE_SOURCE, CHATGPT_URL_SOURCE, CONVERSATIONS_FILE_SOURCE, MAX_RECENT_SOURCES,
    RecentSources,
};

pub const DEFAULT_MIN_KEYWORD_OCCURRENCES: usize = 3;

/// Failures stay on screen longer than the default.
const FAILURE_NOTIFICATION_DURATION: Duration = Duration::from_secs(8);

/// Knobs shared by the file importers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    pub create_message_nodes: bool,
    /// Fraction of a batch export to import, clamped to `[0.1, 1.0]`.
    pub downsample_ratio: f64,
    pub min_keyword_occurrences: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            create_message_nodes: false,
            downsample_ratio: MAX_RATIO,
            min_keyword_occurrences: DEFAULT_MIN_KEYWORD_OCCURRENCES,
        }
    }
}

/// Thread nodes created by a file import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedThreads {
    Single(NodeId),
    Many(Vec<NodeId>),
}

impl ImportedThreads {
    pub fn ids(&self) -> &[NodeId] {
        match self {
            ImportedThreads::Single(id) => std::slice::from_ref(id),
            ImportedThreads::Many(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureImportReport {
    pub imported: usize,
    pub matched: usize,
    /// Distinct topics, when topic derivation was requested.
    pub topics: Option<usize>,
    /// Keywords that met the occurrence threshold, when keyword derivation was requested.
    pub keywords: Option<usize>,
}

/// Fetches a shared conversation page and linearizes the conversation embedded in it.
///
/// # Errors
///
/// [`ImportError::Network`] when the page cannot be fetched and [`ImportError::Extraction`]
/// when it carries no usable conversation data.
pub fn fetch_chatgpt_conversation(
    fetcher: &dyn TextFetcher,
    share_url: &str,
) -> ImportResult<ParsedConversation> {
    let html = fetcher.fetch_text(share_url)?;
    let export = extract_conversation(&html)?;
    Ok(linearize(&export))
}

/// Display name for a file source: its file name, else the whole path.
fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Importer<'a> {
    store: &'a mut dyn GraphStore,
    notifier: &'a dyn Notifier,
    fetcher: &'a dyn TextFetcher,
    recent: Option<&'a mut RecentSources>,
}

impl<'a> Importer<'a> {
    pub fn new(
        store: &'a mut dyn GraphStore,
        notifier: &'a dyn Notifier,
        fetcher: &'a dyn TextFetcher,
    ) -> Self {
        Self { store, notifier, fetcher, recent: None }
    }

    /// Records successful imports in `recent`.
    pub fn with_recent_sources(mut self, recent: &'a mut RecentSources) -> Self {
        self.recent = Some(recent);
        self
    }

    fn remember(&mut self, kind: &str, source: &str) {
        if let Some(recent) = self.recent.as_deref_mut() {
            recent.remember(kind, source);
        }
    }

    fn report_failure(&self, what: &str, error: &ImportError) {
        warn!(error = %error, "{} failed", what);
        self.notifier.notify(
            Notification::error(format!("{} failed: {}", what, error))
                .with_duration(FAILURE_NOTIFICATION_DURATION),
        );
    }

    /// Imports the conversation behind a share URL and returns its thread node.
    pub fn import_chatgpt_conversation(
        &mut self,
        url: &str,
        create_message_nodes: bool,
    ) -> Option<NodeId> {
        match self.try_import_url(url, create_message_nodes) {
            Ok((id, conversation)) => {
                self.remember(CHATGPT_URL_SOURCE, url);
                self.notifier.notify(Notification::success(format!(
                    "Imported \"{}\" ({} messages)",
                    conversation.title,
                    conversation.messages.len()
                )));
                Some(id)
            }
            Err(e) => {
                self.report_failure("Conversation import", &e);
                None
            }
        }
    }

    fn try_import_url(
        &mut self,
        url: &str,
        create_message_nodes: bool,
    ) -> ImportResult<(NodeId, ParsedConversation)> {
        let conversation = fetch_chatgpt_conversation(self.fetcher, url)?;
        let id = project(self.store, &conversation, url, create_message_nodes)?;
        let messages = conversation.messages.len();
        info!(url, node = %id, messages, "imported shared conversation");
        Ok((id, conversation))
    }

    /// Imports every conversation in an export file.
    ///
    /// Batch exports are downsampled with `downsample_ratio` first and imported item by
    /// item; single-conversation files ignore the ratio.
    pub fn import_chatgpt_from_file(
        &mut self,
        path: &Path,
        create_message_nodes: bool,
        downsample_ratio: f64,
    ) -> Option<ImportedThreads> {
        match self.try_import_file(path, create_message_nodes, downsample_ratio) {
            Ok((threads, message)) => {
                self.remember(CHATGPT_FILE_SOURCE, &path.display().to_string());
                self.notifier.notify(Notification::success(message));
                Some(threads)
            }
            Err(e) => {
                self.report_failure("File import", &e);
                None
            }
        }
    }

    fn try_import_file(
        &mut self,
        path: &Path,
        create_message_nodes: bool,
        downsample_ratio: f64,
    ) -> ImportResult<(ImportedThreads, String)> {
        let label = source_label(path);
        let text = read_export_file(path)?;

        match dispatch_str(&text)? {
            ParsedExport::Single { format, conversation } => {
                let id = project(self.store, &conversation, &label, create_message_nodes)?;
                info!(file = %label, ?format, node = %id, "imported conversation file");
                let message = format!(
                    "Imported \"{}\" ({} messages) from {}",
                    conversation.title,
                    conversation.messages.len(),
                    label
                );
                Ok((ImportedThreads::Single(id), message))
            }
            ParsedExport::Batch { conversations, positions, failures } => {
                let parsed = conversations.len();
                let total = parsed + failures.len();
                let indexed = positions.into_iter().zip(conversations).collect();
                let projection = project_batch(
                    self.store,
                    indexed,
                    &label,
                    create_message_nodes,
                    Some(downsample_ratio),
                );
                if projection.attempted < parsed {
                    self.notifier.notify(Notification::info(format!(
                        "Downsampled {} conversations to {}",
                        parsed, projection.attempted
                    )));
                }
                if projection.thread_ids.is_empty() {
                    return Err(ImportError::Unusable {
                        title: label,
                        reason: format!("none of {} conversations could be imported", total),
                    });
                }

                let skipped = failures.len() + projection.failures.len();
                let mut message = format!(
                    "Imported {} of {} conversations from {}",
                    projection.thread_ids.len(),
                    total,
                    label
                );
                if skipped > 0 {
                    message.push_str(&format!(" ({} skipped)", skipped));
                }
                Ok((ImportedThreads::Many(projection.thread_ids), message))
            }
        }
    }

    /// Imports a summarized-conversations file, links each record to an existing node with
    /// the same title, and optionally derives topic and keyword nodes.
    pub fn import_conversations_with_structure(
        &mut self,
        path: &Path,
        create_topics: bool,
        create_keywords: bool,
        min_keyword_occurrences: usize,
    ) -> Option<StructureImportReport> {
        let result = self.try_import_structure(
            path,
            create_topics,
            create_keywords,
            min_keyword_occurrences,
        );
        match result {
            Ok(report) => {
                self.remember(CONVERSATIONS_FILE_SOURCE, &path.display().to_string());
                let mut message = format!(
                    "Imported {} conversations, matched {} to existing nodes",
                    report.imported, report.matched
                );
                if let Some(topics) = report.topics {
                    message.push_str(&format!(", {} topics", topics));
                }
                if let Some(keywords) = report.keywords {
                    message.push_str(&format!(", {} keywords", keywords));
                }
                self.notifier.notify(Notification::success(message));
                Some(report)
            }
            Err(e) => {
                self.report_failure("Structure import", &e);
                None
            }
        }
    }

    fn try_import_structure(
        &mut self,
        path: &Path,
        create_topics: bool,
        create_keywords: bool,
        min_keyword_occurrences: usize,
    ) -> ImportResult<StructureImportReport> {
        let text = read_export_file(path)?;
        let file: ConversationsFile = serde_json::from_str(&text).map_err(|e| {
            ImportError::UnrecognizedFormat(format!("not a conversations file: {}", e))
        })?;
        if !file.completed {
            let label = source_label(path);
            warn!(file = %label, "conversations file is marked incomplete");
            self.notifier.notify(Notification::warning(format!(
                "{} is marked incomplete; some conversations may be missing",
                label
            )));
        }

        let matched = match_conversations(self.store, &file.conversations)?;
        let topics = if create_topics {
            Some(create_topic_nodes(self.store, &matched.conversations)?)
        } else {
            None
        };
        let keywords = if create_keywords {
            Some(create_keyword_nodes(self.store, &matched.conversations, min_keyword_occurrences)?)
        } else {
            None
        };

        Ok(StructureImportReport {
            imported: matched.imported,
            matched: matched.matched,
            topics,
            keywords,
        })
    }
}
