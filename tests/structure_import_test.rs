/// Integration tests for importing summarized conversations with topic and keyword derivation
mod common;

use convo_graph::graph::{GraphStore, MemoryGraph};
use convo_graph::import::{CONVERSATIONS_FILE_SOURCE, Importer, RecentSources};
use convo_graph::models::{EdgeType, NodeSpec, NodeType};
use convo_graph::notify::NotificationKind;
use common::{
    ExportDirBuilder, RecordingNotifier, StaticFetcher, conversation_record, conversations_file,
};

fn summaries() -> ExportDirBuilder {
    ExportDirBuilder::new().with_json(
        "summaries.json",
        &conversations_file(vec![
            conversation_record(
                "c1",
                "Borrow Checker Basics",
                "Programming",
                &["rust", "lifetimes"],
            ),
            conversation_record("c2", "Async Runtimes", "programming", &["rust", "tokio"]),
            conversation_record("c3", "Sourdough", "Cooking", &["bread", "rust"]),
            conversation_record("c4", "Tokio Channels", "Programming", &["tokio"]),
        ]),
    )
}

#[test]
fn test_structure_import_links_topics_and_keywords() {
    let dir = summaries();
    let notifier = RecordingNotifier::new();
    let fetcher = StaticFetcher::unused();
    let mut graph = MemoryGraph::new();
    let existing = graph
        .create_node(NodeSpec::new("async runtimes", NodeType::ConversationThread))
        .unwrap();

    let report = Importer::new(&mut graph, &notifier, &fetcher)
        .import_conversations_with_structure(&dir.file("summaries.json"), true, true, 3)
        .unwrap();

    assert_eq!(report.imported, 4);
    assert_eq!(report.matched, 1);
    assert_eq!(report.topics, Some(2));
    // rust: 3 conversations, tokio: 2, others: 1
    assert_eq!(report.keywords, Some(1));

    let reference: Vec<_> = graph.edges_of_type(&EdgeType::Reference).collect();
    assert_eq!(reference.len(), 1);
    assert_eq!(reference[0].from, existing);
    assert_eq!(reference[0].to, "conversation-c2");

    assert_eq!(graph.edges_of_type(&EdgeType::HasTopic).count(), 4);
    assert_eq!(graph.edges_of_type(&EdgeType::HasKeyword).count(), 3);
    let keyword = graph.nodes_of_type(&NodeType::Keyword).next().unwrap();
    assert_eq!(keyword.label, "rust");
    assert_eq!(notifier.kinds(), vec![NotificationKind::Success]);
}

#[test]
fn test_structure_import_is_idempotent() {
    let dir = summaries();
    let notifier = RecordingNotifier::new();
    let fetcher = StaticFetcher::unused();
    let mut graph = MemoryGraph::new();
    graph.create_node(NodeSpec::new("Sourdough", NodeType::ConversationThread)).unwrap();

    for _ in 0..2 {
        Importer::new(&mut graph, &notifier, &fetcher)
            .import_conversations_with_structure(&dir.file("summaries.json"), true, true, 2)
            .unwrap();
    }

    let stats = graph.stats();
    assert_eq!(stats.nodes_by_type["conversation"], 4);
    assert_eq!(stats.nodes_by_type["topic"], 2);
    assert_eq!(stats.nodes_by_type["keyword"], 2);
    assert_eq!(graph.edges_of_type(&EdgeType::Reference).count(), 1);
    assert_eq!(graph.edges_of_type(&EdgeType::HasTopic).count(), 4);
    assert_eq!(graph.edges_of_type(&EdgeType::HasKeyword).count(), 5);
}

#[test]
fn test_structure_import_without_derivation() {
    let dir = summaries();
    let notifier = RecordingNotifier::new();
    let fetcher = StaticFetcher::unused();
    let mut graph = MemoryGraph::new();
    let mut recent = RecentSources::new();

    let report = Importer::new(&mut graph, &notifier, &fetcher)
        .with_recent_sources(&mut recent)
        .import_conversations_with_structure(&dir.file("summaries.json"), false, false, 3)
        .unwrap();

    assert_eq!(report.topics, None);
    assert_eq!(report.keywords, None);
    assert_eq!(graph.nodes_of_type(&NodeType::Topic).count(), 0);
    assert_eq!(recent.list(CONVERSATIONS_FILE_SOURCE).len(), 1);
}

#[test]
fn test_structure_import_rejects_other_formats() {
    let dir = ExportDirBuilder::new()
        .with_text("summaries.json", r#"[{"role":"user","content":"hi"}]"#);
    let notifier = RecordingNotifier::new();
    let fetcher = StaticFetcher::unused();
    let mut graph = MemoryGraph::new();

    let report = Importer::new(&mut graph, &notifier, &fetcher).import_conversations_with_structure(
        &dir.file("summaries.json"),
        true,
        true,
        3,
    );

    assert!(report.is_none());
    assert_eq!(notifier.kinds(), vec![NotificationKind::Error]);
    assert!(notifier.messages()[0].contains("not a conversations file"));
    assert_eq!(graph.stats().total_nodes(), 0);
}
