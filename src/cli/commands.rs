use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::clipboard::copy_transcript;
use crate::graph::{MemoryGraph, load_graph, save_graph};
use crate::import::{
    CHATGPT_FILE_SOURCE, CHATGPT_URL_SOURCE, CONVERSATIONS_FILE_SOURCE,
    DEFAULT_MIN_KEYWORD_OCCURRENCES, ImportOptions, Importer, RecentSources,
};
use crate::notify::ConsoleNotifier;
use crate::parsers::{ParsedExport, dispatch_str};
use crate::remote::HttpFetcher;
use crate::transform::render_transcript;
use crate::utils::{
    default_store_path, discover_export_files, format_path_with_tilde, get_data_dir,
    read_export_file, recent_sources_path, sanitize_for_terminal,
};

#[derive(Parser)]
#[command(name = "convo-graph")]
#[command(version)]
#[command(
    about = "Import chat-assistant conversation exports into a knowledge graph",
    long_about = None
)]
pub struct Cli {
    /// Graph store file (defaults to graph.json in the data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the format of an export file and list its conversations
    Parse { file: PathBuf },
    /// Print one conversation of an export file as a markdown transcript
    Transcript {
        file: PathBuf,
        /// Position of the conversation in a batch export
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Also copy the transcript to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Import an export file, or every .json file under a directory
    Import {
        path: PathBuf,
        /// Create a node per message, linked in order
        #[arg(long)]
        message_nodes: bool,
        /// Fraction of a batch export to import (0.1 to 1.0)
        #[arg(long, default_value_t = 1.0)]
        ratio: f64,
    },
    /// Import a shared conversation page
    Fetch {
        url: String,
        #[arg(long)]
        message_nodes: bool,
    },
    /// Import summarized conversations and link them into the graph
    Structure {
        file: PathBuf,
        /// Create topic nodes
        #[arg(long)]
        topics: bool,
        /// Create keyword nodes
        #[arg(long)]
        keywords: bool,
        /// Conversations a keyword must appear in before it gets a node
        #[arg(long, default_value_t = DEFAULT_MIN_KEYWORD_OCCURRENCES)]
        min_keyword_occurrences: usize,
    },
    /// Show node, edge and document counts of the graph store
    Stats,
    /// List recently imported sources
    Recent,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Parse { file }) => show_parse(file),
        Some(Commands::Transcript { file, index, copy }) => show_transcript(file, *index, *copy),
        Some(Commands::Import { path, message_nodes, ratio }) => {
            let options = ImportOptions {
                create_message_nodes: *message_nodes,
                downsample_ratio: *ratio,
                ..Default::default()
            };
            import_files(cli.store.as_deref(), path, &options)
        }
        Some(Commands::Fetch { url, message_nodes }) => {
            import_url(cli.store.as_deref(), url, *message_nodes)
        }
        Some(Commands::Structure { file, topics, keywords, min_keyword_occurrences }) => {
            let options = ImportOptions {
                min_keyword_occurrences: *min_keyword_occurrences,
                ..Default::default()
            };
            import_structure(cli.store.as_deref(), file, *topics, *keywords, &options)
        }
        Some(Commands::Stats) => show_stats(cli.store.as_deref()),
        Some(Commands::Recent) => show_recent(),
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

fn parse_file(file: &Path) -> Result<ParsedExport> {
    let text = read_export_file(file)?;
    Ok(dispatch_str(&text)?)
}

fn show_parse(file: &Path) -> Result<()> {
    let parsed = parse_file(file)?;

    println!("Format: {:?}", parsed.format());
    println!("Conversations: {}", parsed.conversations().len());
    for (i, conversation) in parsed.conversations().iter().enumerate() {
        let status = match &conversation.error {
            Some(e) => format!("error: {}", sanitize_for_terminal(e)),
            None => format!("{} messages", conversation.messages.len()),
        };
        println!("  [{}] {} ({})", i, sanitize_for_terminal(&conversation.title), status);
    }
    if let ParsedExport::Batch { failures, .. } = &parsed
        && !failures.is_empty()
    {
        println!("Skipped: {}", failures.len());
        for failure in failures {
            println!("  {}", sanitize_for_terminal(&failure.to_string()));
        }
    }

    Ok(())
}

fn show_transcript(file: &Path, index: usize, copy: bool) -> Result<()> {
    let parsed = parse_file(file)?;
    let count = parsed.conversations().len();
    let Some(conversation) = parsed.conversations().get(index) else {
        bail!("No conversation at index {} ({} available)", index, count);
    };

    let transcript = render_transcript(conversation);
    println!("{}", sanitize_for_terminal(&transcript));

    if copy {
        copy_transcript(&transcript)?;
        eprintln!("Transcript copied to clipboard");
    }
    Ok(())
}

/// Graph store and recent sources loaded for one command.
struct Workspace {
    store_path: PathBuf,
    recent_path: PathBuf,
    graph: MemoryGraph,
    recent: RecentSources,
}

impl Workspace {
    fn open(store_override: Option<&Path>) -> Result<Self> {
        let data_dir = get_data_dir()?;
        let store_path =
            store_override.map(Path::to_path_buf).unwrap_or_else(|| default_store_path(&data_dir));
        let recent_path = recent_sources_path(&data_dir);

        let graph = load_graph(&store_path)?;
        let recent = RecentSources::load(&recent_path)?;
        Ok(Self { store_path, recent_path, graph, recent })
    }

    fn save(&self) -> Result<()> {
        save_graph(&self.store_path, &self.graph)?;
        self.recent.save(&self.recent_path)
    }
}

fn import_files(store: Option<&Path>, path: &Path, options: &ImportOptions) -> Result<()> {
    let files = if path.is_dir() {
        let files = discover_export_files(path);
        if files.is_empty() {
            bail!("No .json files found under {}", path.display());
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut ws = Workspace::open(store)?;
    let notifier = ConsoleNotifier;
    let fetcher = HttpFetcher::new()?;

    let mut imported = 0;
    {
        let mut importer =
            Importer::new(&mut ws.graph, &notifier, &fetcher).with_recent_sources(&mut ws.recent);
        for file in &files {
            if let Some(threads) = importer.import_chatgpt_from_file(
                file,
                options.create_message_nodes,
                options.downsample_ratio,
            ) {
                imported += threads.len();
            }
        }
    }

    if imported == 0 {
        bail!("Nothing was imported");
    }
    ws.save()?;
    println!(
        "Imported {} conversation(s) into {}",
        imported,
        format_path_with_tilde(&ws.store_path)
    );
    Ok(())
}

fn import_url(store: Option<&Path>, url: &str, message_nodes: bool) -> Result<()> {
    let mut ws = Workspace::open(store)?;
    let notifier = ConsoleNotifier;
    let fetcher = HttpFetcher::new()?;

    let id = Importer::new(&mut ws.graph, &notifier, &fetcher)
        .with_recent_sources(&mut ws.recent)
        .import_chatgpt_conversation(url, message_nodes)
        .context("Shared conversation was not imported")?;

    ws.save()?;
    println!("{}", id);
    Ok(())
}

fn import_structure(
    store: Option<&Path>,
    file: &Path,
    topics: bool,
    keywords: bool,
    options: &ImportOptions,
) -> Result<()> {
    let mut ws = Workspace::open(store)?;
    let notifier = ConsoleNotifier;
    let fetcher = HttpFetcher::new()?;

    let report = Importer::new(&mut ws.graph, &notifier, &fetcher)
        .with_recent_sources(&mut ws.recent)
        .import_conversations_with_structure(
            file,
            topics,
            keywords,
            options.min_keyword_occurrences,
        )
        .context("Conversations file was not imported")?;

    ws.save()?;
    println!("Imported: {}", report.imported);
    println!("Matched: {}", report.matched);
    if let Some(n) = report.topics {
        println!("Topics: {}", n);
    }
    if let Some(n) = report.keywords {
        println!("Keywords: {}", n);
    }
    Ok(())
}

fn show_stats(store: Option<&Path>) -> Result<()> {
    let ws = Workspace::open(store)?;
    let stats = ws.graph.stats();

    println!("Graph Store Statistics");
    println!("======================");
    println!("Nodes: {}", stats.total_nodes());
    for (node_type, count) in &stats.nodes_by_type {
        println!("  {}: {}", sanitize_for_terminal(node_type), count);
    }
    println!("Edges: {}", stats.total_edges());
    for (edge_type, count) in &stats.edges_by_type {
        println!("  {}: {}", sanitize_for_terminal(edge_type), count);
    }
    println!("Documents: {}", stats.documents);
    println!();
    println!("Store: {}", format_path_with_tilde(&ws.store_path));

    Ok(())
}

fn show_recent() -> Result<()> {
    let recent_path = recent_sources_path(&get_data_dir()?);
    let recent = RecentSources::load(&recent_path)?;

    for kind in recent.kinds() {
        let sources = recent.list(kind);
        if sources.is_empty() {
            continue;
        }
        println!("{}:", sanitize_for_terminal(recent_heading(kind)));
        for source in sources {
            println!("  {}", sanitize_for_terminal(source));
        }
    }
    Ok(())
}

fn recent_heading(kind: &str) -> &str {
    match kind {
        CHATGPT_URL_SOURCE => "Shared conversations",
        CHATGPT_FILE_SOURCE => "Export files",
        CONVERSATIONS_FILE_SOURCE => "Conversation metadata files",
        other => other,
    }
}
