//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use convo_graph::error::{ImportError, ImportResult};
use convo_graph::notify::{Notification, NotificationKind, Notifier};
use convo_graph::remote::TextFetcher;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a directory of export files
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `value` as `name` (relative to the directory root)
    pub fn with_json(self, name: &str, value: &Value) -> Self {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, value.to_string()).expect("Failed to write export file");
        self
    }

    pub fn with_text(self, name: &str, text: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), text).expect("Failed to write file");
        self
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one official (tree-shaped) export
pub struct OfficialExportBuilder {
    title: Option<String>,
    nodes: Vec<(String, Value)>,
    current_node: Option<String>,
}

impl OfficialExportBuilder {
    pub fn new(title: &str) -> Self {
        Self { title: Some(title.to_string()), nodes: Vec::new(), current_node: None }
    }

    pub fn untitled() -> Self {
        Self { title: None, nodes: Vec::new(), current_node: None }
    }

    /// Add a text message node
    pub fn message(mut self, id: &str, parent: Option<&str>, role: &str, text: &str) -> Self {
        self.nodes.push((
            id.to_string(),
            json!({
                "id": id,
                "parent": parent,
                "message": {
                    "author": {"role": role},
                    "content": {"content_type": "text", "parts": [text]},
                    "create_time": 1700000000.0 + self.nodes.len() as f64,
                },
            }),
        ));
        self
    }

    /// Add a node with an arbitrary `message` payload
    pub fn raw(mut self, id: &str, parent: Option<&str>, message: Value) -> Self {
        self.nodes.push((id.to_string(), json!({"id": id, "parent": parent, "message": message})));
        self
    }

    /// Add a node without a message (a structural container)
    pub fn container(mut self, id: &str, parent: Option<&str>) -> Self {
        self.nodes.push((id.to_string(), json!({"id": id, "parent": parent, "message": null})));
        self
    }

    /// A linear user/assistant exchange of `turns` message pairs
    pub fn linear(title: &str, turns: usize) -> Self {
        let mut builder = Self::new(title);
        let mut parent: Option<String> = None;
        for i in 0..turns {
            let user = format!("u{}", i);
            let assistant = format!("a{}", i);
            builder = builder.message(&user, parent.as_deref(), "user", &format!("Question {}", i));
            let answer = format!("Answer {}", i);
            builder = builder.message(&assistant, Some(&user), "assistant", &answer);
            parent = Some(assistant);
        }
        builder.current_node = parent;
        builder
    }

    pub fn current_node(mut self, id: &str) -> Self {
        self.current_node = Some(id.to_string());
        self
    }

    /// Render to JSON, filling each node's `children` from the parent links
    pub fn to_json(&self) -> Value {
        let mut mapping = serde_json::Map::new();
        for (id, node) in &self.nodes {
            let children: Vec<&str> = self
                .nodes
                .iter()
                .filter(|(_, n)| n["parent"].as_str() == Some(id.as_str()))
                .map(|(child, _)| child.as_str())
                .collect();
            let mut node = node.clone();
            node["children"] = json!(children);
            mapping.insert(id.clone(), node);
        }

        let mut export = json!({"mapping": mapping, "current_node": self.current_node});
        if let Some(title) = &self.title {
            export["title"] = json!(title);
        }
        export
    }
}

/// One record of a summarized-conversations file
pub fn conversation_record(id: &str, title: &str, topic: &str, keywords: &[&str]) -> Value {
    json!({
        "id": id,
        "title": title,
        "excerpt": format!("{} excerpt", title),
        "message_count": 6,
        "char_length": 420,
        "metadata": {
            "summary": format!("Summary of {}", title),
            "keywords": keywords,
            "sentiment": "neutral",
            "topic": topic,
        },
        "hash": format!("hash-{}", id),
        "timestamp": "2024-03-01T10:00:00Z",
    })
}

pub fn conversations_file(records: Vec<Value>) -> Value {
    json!({
        "source_file": "conversations.json",
        "conversation_count": records.len(),
        "conversations": records,
        "completed": true,
    })
}

/// Wrap embedded page data the way a shared-conversation page does
pub fn share_page(conversation: &Value) -> String {
    format!(
        r#"<html><head></head><body><script id="__NEXT_DATA__" type="application/json">{}</script></body></html>"#,
        json!({"props": {"pageProps": {"serverResponse": {"data": conversation}}}})
    )
}

/// Notifier that keeps every notification
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.notifications.borrow().iter().map(|n| n.kind).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications.borrow().iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}

/// Fetcher serving one fixed response
pub struct StaticFetcher {
    response: Result<String, String>,
}

impl StaticFetcher {
    pub fn page(html: String) -> Self {
        Self { response: Ok(html) }
    }

    pub fn failing(reason: &str) -> Self {
        Self { response: Err(reason.to_string()) }
    }

    /// For imports that never touch the network
    pub fn unused() -> Self {
        Self::failing("no network in tests")
    }
}

impl TextFetcher for StaticFetcher {
    fn fetch_text(&self, _url: &str) -> ImportResult<String> {
        self.response.clone().map_err(ImportError::Network)
    }
}
