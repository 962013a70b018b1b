//! Cheat-sheet directory trees: `<root>/<platform>/<command>.md`.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PackError, Result};
use crate::pipeline::types::RawEntry;

/// One platform directory and its pages, sorted by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDir {
    pub platform: String,
    pub pages: Vec<PathBuf>,
}

/// Platforms found under one root, plus the directories that could not be
/// listed.
#[derive(Debug, Default)]
pub struct Discovery {
    pub platforms: Vec<PlatformDir>,
    pub failures: Vec<(String, PackError)>,
}

/// List every platform directory under `root` with its `*.md` pages.
///
/// Platforms are discovered from the directory names, so trees for different
/// languages need not share a layout. Output is sorted for stable builds. A
/// missing root fails the whole source; a platform that cannot be listed is
/// reported in [`Discovery::failures`] and the others are still returned.
pub fn discover_platforms(source_id: &str, root: &Path) -> Result<Discovery> {
    if !root.is_dir() {
        return Err(PackError::SourceUnavailable {
            source_id: source_id.to_string(),
            location: root.display().to_string(),
            reason: "directory not found".to_string(),
        });
    }

    let mut discovery = Discovery::default();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let location = err.path().unwrap_or(root).display().to_string();
                discovery.failures.push((location, walk_error(source_id, root, &err)));
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(platform) = entry.file_name().to_str().map(ToString::to_string) else {
            continue;
        };

        match list_pages(source_id, entry.path()) {
            Ok(pages) => {
                debug!(source = source_id, platform = %platform, pages = pages.len(), "discovered platform");
                discovery.platforms.push(PlatformDir { platform, pages });
            }
            Err(err) => {
                debug!(source = source_id, platform = %platform, error = %err, "cannot list platform");
                discovery.failures.push((entry.path().display().to_string(), err));
            }
        }
    }
    Ok(discovery)
}

fn list_pages(source_id: &str, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(source_id, dir, &e))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
            pages.push(path.to_path_buf());
        }
    }
    Ok(pages)
}

fn walk_error(source_id: &str, path: &Path, err: &walkdir::Error) -> PackError {
    PackError::SourceUnavailable {
        source_id: source_id.to_string(),
        location: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Read one page as a command entry. The command name is the file stem.
pub fn read_page(path: &Path, language: &str, platform: &str) -> Result<RawEntry> {
    let document_error = |reason: String| PackError::Document {
        path: path.display().to_string(),
        reason,
    };

    let command = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| document_error("file name is not a valid command name".to_string()))?;
    let document = std::fs::read_to_string(path).map_err(|e| document_error(e.to_string()))?;

    Ok(RawEntry::command_page(command, document, language, platform))
}
