//! Recently imported sources, most recent first, per source kind.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Entries kept per source kind.
pub const MAX_RECENT_SOURCES: usize = 5;

pub const CHATGPT_URL_SOURCE: &str = "chatgpt-url";
pub const CHATGPT_FILE_SOURCE: &str = "chatgpt-file";
pub const CONVERSATIONS_FILE_SOURCE: &str = "conversations-file";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSources {
    by_kind: BTreeMap<String, Vec<String>>,
}

impl RecentSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the list at `path`; a missing file is an empty list.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recent sources: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse recent sources: {}", path.display()))
    }

    /// Saves atomically (temp file + rename), creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize recent sources")?;
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, json).context("Failed to write recent sources temp file")?;
        fs::rename(&temp, path).context("Failed to rename recent sources temp file")?;
        Ok(())
    }

    /// Moves `source` to the front of its kind's list, dropping the oldest beyond the cap.
    pub fn remember(&mut self, kind: &str, source: &str) {
        let entries = self.by_kind.entry(kind.to_string()).or_default();
        entries.retain(|s| s != source);
        entries.insert(0, source.to_string());
        entries.truncate(MAX_RECENT_SOURCES);
    }

    pub fn list(&self, kind: &str) -> &[String] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.by_kind.keys().map(String::as_str)
    }
}
