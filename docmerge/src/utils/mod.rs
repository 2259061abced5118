//! Utilities for input path collection and size formatting.

use crate::{Result, error::DocMergeError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prefix Word gives the lock file it keeps next to an open document.
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern)?);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.docx"`
/// - `"./reports/*.docx"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern.as_ref()).map_err(|err| DocMergeError::Other {
        message: format!("Invalid pattern '{}': {}", pattern.as_ref(), err),
    })?;

    paths
        .map(|entry| {
            entry.map_err(|err| DocMergeError::Other {
                message: err.to_string(),
            })
        })
        .collect()
}

/// True for a `.docx` name that is not a Word lock file.
pub fn is_docx_name(name: &str) -> bool {
    !name.starts_with(LOCK_FILE_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// List the `.docx` files in a folder, sorted by file name.
///
/// Lock files are skipped. With `recursive` the whole tree is walked and the
/// result is sorted by full path.
pub fn list_docx_in_folder(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DocMergeError::invalid_config(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| DocMergeError::Other {
            message: err.to_string(),
        })?;
        if entry.file_type().is_file() && is_docx_name(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    log::debug!("Found {} .docx file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
