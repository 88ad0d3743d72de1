pub mod config;
pub mod runner;
pub mod scan;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use watermark_engine::{Watermarker, load_font, resolve_font};

use config::AppConfig;
use runner::BatchReport;

const DOTENV_CANDIDATES: [&str; 3] = [".env", "../.env", "../../.env"];

/// Load .env from multiple candidate paths relative to the working directory.
///
/// Runs before tracing is initialised so `.env` can set `RUST_LOG`; the
/// caller logs the returned source once the subscriber exists.
pub fn load_dotenv() -> Option<PathBuf> {
    load_dotenv_in(Path::new(""))
}

/// Same as [`load_dotenv`], with candidates resolved against `base`.
pub fn load_dotenv_in(base: &Path) -> Option<PathBuf> {
    DOTENV_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| dotenvy::from_path(path).is_ok())
}

/// `RUST_LOG` filter with an `info` fallback. Build it after [`load_dotenv`].
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Resolve and parse the font, then build the compositor. Any failure here is fatal.
pub fn init_watermarker(config: &AppConfig) -> Result<Watermarker, anyhow::Error> {
    let font_path = resolve_font(&config.font, &config.font_search_dirs())?;
    info!("Using font {}", font_path.display());
    let font = load_font(&font_path)?;
    Ok(Watermarker::new(font, config.watermark_options())?)
}

/// Run one full batch: font, discovery, then every candidate in order.
pub fn run(config: &AppConfig) -> Result<BatchReport, anyhow::Error> {
    let root = config
        .root_dir
        .as_deref()
        .context("no root directory: set WATERMARK_ROOT_DIR or pass it as the first argument")?;

    let watermarker = init_watermarker(config).context("failed to initialize watermark font")?;

    let paths = scan::collect_candidates(root)?;
    info!(root = %root.display(), candidates = paths.len(), dry_run = config.dry_run, "Starting batch");

    Ok(runner::run_batch(&watermarker, &paths, config.dry_run))
}
