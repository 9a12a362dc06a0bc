use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ImportError, ImportResult};

// Maximum size of an export file: 256MB
pub const MAX_EXPORT_FILE_BYTES: u64 = 256 * 1024 * 1024;

fn io_error(path: &Path, reason: impl ToString) -> ImportError {
    ImportError::Io { path: path.display().to_string(), reason: reason.to_string() }
}

/// Validates that a file's size is within [`MAX_EXPORT_FILE_BYTES`]
///
/// Takes the open handle so the size checked is the size of the file actually read.
pub fn validate_file_size(file: &File, path: &Path) -> ImportResult<()> {
    let size = file.metadata().map_err(|e| io_error(path, e))?.len();
    if size > MAX_EXPORT_FILE_BYTES {
        return Err(io_error(
            path,
            format!("file too large ({} bytes, max {} bytes)", size, MAX_EXPORT_FILE_BYTES),
        ));
    }
    Ok(())
}

/// Reads an export file into memory after the size check.
///
/// # Errors
///
/// [`ImportError::Io`] if the file cannot be opened or read, is too large, or is not UTF-8.
pub fn read_export_file(path: &Path) -> ImportResult<String> {
    let mut file = File::open(path).map_err(|e| io_error(path, e))?;
    validate_file_size(&file, path)?;

    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|e| io_error(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "read export file");
    Ok(text)
}

/// Every `*.json` file under `root`, sorted by path. Unreadable entries are skipped.
pub fn discover_export_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
        .collect();
    files.sort();
    files
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
