use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Overrides the data directory when set.
pub const DATA_DIR_ENV: &str = "CONVO_GRAPH_HOME";

const APP_DIR_NAME: &str = "convo-graph";
const GRAPH_FILE_NAME: &str = "graph.json";
const RECENT_FILE_NAME: &str = "recent-sources.json";

/// Get the data directory (`$CONVO_GRAPH_HOME`, else the platform data dir)
pub fn get_data_dir() -> Result<PathBuf> {
    resolve_data_dir(env::var_os(DATA_DIR_ENV).map(PathBuf::from), dirs::data_dir())
}

fn resolve_data_dir(
    override_dir: Option<PathBuf>,
    platform_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    platform_dir
        .map(|d| d.join(APP_DIR_NAME))
        .context("Could not determine a data directory; set CONVO_GRAPH_HOME")
}

pub fn default_store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(GRAPH_FILE_NAME)
}

pub fn recent_sources_path(data_dir: &Path) -> PathBuf {
    data_dir.join(RECENT_FILE_NAME)
}
