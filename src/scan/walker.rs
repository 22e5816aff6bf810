use serde::Serialize;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::filter::FileFilter;
use crate::config::DEFAULT_SCAN_DEPTH;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Maximum number of path components below the root
    pub depth: usize,
    /// Additional exclude globs on top of the built-in ones
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SCAN_DEPTH,
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Sorted, `/`-separated paths relative to the scan root
    pub files: Vec<String>,
    pub count: usize,
}

/// Walk `root` and return every file matching `patterns` that no exclude
/// pattern rejects. A missing root yields an empty result.
pub fn scan_directory(root: &Path, patterns: &[String], options: &ScanOptions) -> Result<ScanResult> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "scan root does not exist");
        return Ok(ScanResult::default());
    }

    let filter = FileFilter::new(root, patterns, &options.exclude)?;
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(options.depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| keep_entry(entry, root, &filter));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(relative) = relative_path(entry.path(), root) {
            if filter.should_include_file(&relative) {
                files.push(relative);
            }
        }
    }

    files.sort();
    let count = files.len();
    Ok(ScanResult { files, count })
}

fn keep_entry(entry: &DirEntry, root: &Path, filter: &FileFilter) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    if is_hidden(entry) {
        return false;
    }

    if entry.file_type().is_dir() {
        if let Some(relative) = relative_path(entry.path(), root) {
            return !filter.should_prune_dir(&relative);
        }
    }

    true
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
