//! Sequential batch over discovered files.

use std::path::PathBuf;

use tracing::{error, info, warn};
use watermark_engine::{FileOutcome, WatermarkError, Watermarker};

/// Summary of one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: Vec<FileOutcome>,
    /// Files in a pixel format the compositor does not handle.
    pub skipped: Vec<PathBuf>,
    /// Files that could not be read, decoded, encoded or written.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len() + self.failed.len()
    }

    pub fn processed_paths(&self) -> Vec<PathBuf> {
        self.processed.iter().map(|o| o.path.clone()).collect()
    }

    /// Bytes written back to disk across all processed files.
    pub fn bytes_written(&self) -> usize {
        self.processed.iter().filter_map(|o| o.bytes_written).sum()
    }

    /// True when no file failed. Skipped files do not count as failures.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Watermark every path in order. A bad file never stops the batch.
pub fn run_batch(watermarker: &Watermarker, paths: &[PathBuf], dry_run: bool) -> BatchReport {
    let mut report = BatchReport::default();

    for path in paths {
        match watermarker.watermark_file(path, dry_run) {
            Ok(outcome) => report.processed.push(outcome),
            Err(WatermarkError::UnsupportedFormat(color)) => {
                warn!(path = %path.display(), ?color, "Unsupported pixel format, skipping");
                report.skipped.push(path.clone());
            }
            Err(e) => {
                error!(path = %path.display(), "Failed to watermark: {e}");
                report.failed.push((path.clone(), e.to_string()));
            }
        }
    }

    info!(
        total = report.total(),
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        bytes_written = report.bytes_written(),
        dry_run,
        "Batch complete"
    );
    report
}
