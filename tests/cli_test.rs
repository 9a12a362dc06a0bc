/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::process::Command;

use assert_cmd::prelude::*;
use common::{ExportDirBuilder, OfficialExportBuilder, conversation_record, conversations_file};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn cli(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_convo-graph"));
    cmd.env("CONVO_GRAPH_HOME", data_dir.path()).env_remove("RUST_LOG");
    cmd
}

fn batch_export() -> ExportDirBuilder {
    ExportDirBuilder::new().with_json(
        "conversations.json",
        &json!([
            OfficialExportBuilder::linear("Rust Ownership", 2).to_json(),
            OfficialExportBuilder::linear("Async Runtimes", 1).to_json(),
        ]),
    )
}

#[test]
fn test_cli_no_command_shows_help_message() {
    let data = TempDir::new().unwrap();
    cli(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_flag() {
    let data = TempDir::new().unwrap();
    cli(&data)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("knowledge graph"))
        .stdout(predicate::str::contains("structure"));
}

#[test]
fn test_cli_version_flag() {
    let data = TempDir::new().unwrap();
    cli(&data).arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let data = TempDir::new().unwrap();
    cli(&data).arg("invalid-command").assert().failure();
}

#[test]
fn test_cli_parse_lists_conversations() {
    let data = TempDir::new().unwrap();
    let exports = batch_export();
    cli(&data)
        .arg("parse")
        .arg(exports.file("conversations.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Format: OfficialBatch"))
        .stdout(predicate::str::contains("Conversations: 2"))
        .stdout(predicate::str::contains("[0] Rust Ownership (4 messages)"));
}

#[test]
fn test_cli_transcript_by_index() {
    let data = TempDir::new().unwrap();
    let exports = batch_export();
    cli(&data)
        .args(["transcript", "--index", "1"])
        .arg(exports.file("conversations.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# Async Runtimes"))
        .stdout(predicate::str::contains("## Assistant\n\n"))
        .stdout(predicate::str::contains("Answer 0"));
}

#[test]
fn test_cli_transcript_index_out_of_range() {
    let data = TempDir::new().unwrap();
    let exports = batch_export();
    cli(&data)
        .args(["transcript", "--index", "7"])
        .arg(exports.file("conversations.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No conversation at index 7"));
}

#[test]
fn test_cli_transcript_strips_escape_sequences() {
    let data = TempDir::new().unwrap();
    let exports = ExportDirBuilder::new().with_json(
        "evil.json",
        &OfficialExportBuilder::linear("\u{1b}[2JEvil\u{1b}]0;title\u{7}", 1).to_json(),
    );
    cli(&data)
        .arg("transcript")
        .arg(exports.file("evil.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# Evil"))
        .stdout(predicate::str::contains("\u{1b}").not());
}

#[test]
fn test_cli_import_then_stats() {
    let data = TempDir::new().unwrap();
    let exports = batch_export();

    cli(&data)
        .arg("import")
        .arg(exports.file("conversations.json"))
        .arg("--message-nodes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 conversation(s)"));

    assert!(data.path().join("graph.json").exists());

    cli(&data)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 8"))
        .stdout(predicate::str::contains("ConversationThread: 2"))
        .stdout(predicate::str::contains("Documents: 2"));
}

#[test]
fn test_cli_import_directory_with_custom_store() {
    let data = TempDir::new().unwrap();
    let exports = ExportDirBuilder::new()
        .with_json("a.json", &OfficialExportBuilder::linear("A", 1).to_json())
        .with_json("nested/b.json", &OfficialExportBuilder::linear("B", 1).to_json())
        .with_text("readme.txt", "not an export");
    let store = data.path().join("custom").join("store.json");

    cli(&data)
        .arg("--store")
        .arg(&store)
        .arg("import")
        .arg(exports.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 conversation(s)"));

    assert!(store.exists());
    assert!(!data.path().join("graph.json").exists());
}

#[test]
fn test_cli_import_failure_exits_nonzero() {
    let data = TempDir::new().unwrap();
    let exports = ExportDirBuilder::new().with_text("bad.json", "{\"foo\": 1}");

    cli(&data)
        .arg("import")
        .arg(exports.file("bad.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized export format"));

    assert!(!data.path().join("graph.json").exists());
}

#[test]
fn test_cli_structure_import() {
    let data = TempDir::new().unwrap();
    let exports = batch_export().with_json(
        "summaries.json",
        &conversations_file(vec![
            conversation_record("c1", "Rust Ownership", "Programming", &["rust"]),
            conversation_record("c2", "Bread", "Cooking", &["rust"]),
        ]),
    );

    cli(&data).arg("import").arg(exports.file("conversations.json")).assert().success();
    cli(&data)
        .args(["structure", "--topics", "--keywords", "--min-keyword-occurrences", "2"])
        .arg(exports.file("summaries.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported: 2"))
        .stdout(predicate::str::contains("Matched: 1"))
        .stdout(predicate::str::contains("Topics: 2"))
        .stdout(predicate::str::contains("Keywords: 1"));
}

#[test]
fn test_cli_recent_lists_imported_files() {
    let data = TempDir::new().unwrap();
    let exports = batch_export();

    cli(&data).arg("import").arg(exports.file("conversations.json")).assert().success();
    cli(&data)
        .arg("recent")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export files:"))
        .stdout(predicate::str::contains("conversations.json"));
}

#[test]
fn test_cli_rejects_newer_store_version() {
    let data = TempDir::new().unwrap();
    std::fs::write(data.path().join("graph.json"), r#"{"version": 99, "graph": {}}"#).unwrap();

    cli(&data).arg("stats").assert().failure().stderr(predicate::str::contains("version mismatch"));
}
