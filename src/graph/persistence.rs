//! Graph store persistence: load/save with atomic writes
//!
//! The whole [`MemoryGraph`] is written as one JSON document wrapped with a schema version.
//! Writes go to a temp file next to the target and are renamed into place.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::memory::MemoryGraph;

/// Store file schema version; bump on incompatible layout changes.
pub const STORE_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    graph: &'a MemoryGraph,
}

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    graph: MemoryGraph,
}

/// Loads the graph at `path`, or an empty graph when the file does not exist yet.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not valid JSON, or was written with a
/// different schema version. A mismatched file is never silently replaced.
pub fn load_graph(path: &Path) -> Result<MemoryGraph> {
    if !path.exists() {
        return Ok(MemoryGraph::new());
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph store: {}", path.display()))?;
    let file: StoreFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse graph store: {}", path.display()))?;

    if file.version != STORE_VERSION {
        bail!(
            "Graph store version mismatch in {} (expected {}, found {})",
            path.display(),
            STORE_VERSION,
            file.version
        );
    }

    Ok(file.graph)
}

/// Saves the graph atomically (temp file + rename), creating parent directories.
pub fn save_graph(path: &Path, graph: &MemoryGraph) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&StoreFileRef { version: STORE_VERSION, graph })
        .context("Failed to serialize graph store")?;

    let temp = path.with_extension("json.tmp");
    fs::write(&temp, json).context("Failed to write graph store temp file")?;
    fs::rename(&temp, path).context("Failed to rename graph store temp file")?;

    Ok(())
}
