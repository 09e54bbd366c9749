//! Directory scanning: list files filtered by extension.
//!
//! Results are sorted by filename so page numbering is stable across runs —
//! `readdir` order is filesystem-dependent and would otherwise shuffle pages
//! between two identical runs.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List regular files in `dir` whose extension matches one of `extensions`
/// (case-insensitive, without dot), sorted by filename.
pub fn scan_dir(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.exists() {
        return Err(PipelineError::InputDirNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(PipelineError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort();
    debug!("scanned {}: {} matching files", dir.display(), files.len());
    Ok(files)
}

/// Case-insensitive extension match against a dot-less extension list.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            extensions.iter().any(|want| *want == e)
        })
        .unwrap_or(false)
}
