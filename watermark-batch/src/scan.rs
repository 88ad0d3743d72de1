//! Candidate file discovery.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of side-car notes stored next to the images.
const SKIPPED_EXTENSION: &str = "txt";

/// Finder metadata file name, with or without the leading dot.
const SKIPPED_NAME: &str = "DS_Store";

/// Whether a file is never treated as an image candidate.
pub fn is_excluded(path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) == Some(SKIPPED_EXTENSION) {
        return true;
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.trim_start_matches('.') == SKIPPED_NAME)
}

/// Collect every candidate file under `root`, recursively, in sorted order.
///
/// Everything that is not excluded is a candidate, whatever its extension;
/// files that fail to decode are reported later by the batch.
pub fn collect_candidates(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("root path is not a directory: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if is_excluded(entry.path()) {
            debug!("Skipping excluded file {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}
