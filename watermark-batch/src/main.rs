//! Batch watermarking binary.
//!
//! Walks a directory tree and overwrites every image in it with a
//! watermarked copy. Configuration comes from `WATERMARK_*` environment
//! variables (a `.env` file is honored); the root directory may also be
//! given as the first argument.

use std::path::PathBuf;

use watermark_batch_lib::config::AppConfig;

fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG, so it is loaded before the filter is built
    let dotenv_source = watermark_batch_lib::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(watermark_batch_lib::log_filter())
        .init();

    match dotenv_source {
        Some(path) => tracing::info!("Loaded .env from: {}", path.display()),
        None => tracing::info!("No .env file found, using system environment variables"),
    }

    let mut config = AppConfig::load()?;
    if let Some(root) = std::env::args_os().nth(1) {
        config.root_dir = Some(PathBuf::from(root));
    }

    let report = watermark_batch_lib::run(&config)?;

    if !report.is_clean() {
        for (path, cause) in &report.failed {
            tracing::error!("{}: {cause}", path.display());
        }
        anyhow::bail!(
            "{} of {} file(s) failed",
            report.failed.len(),
            report.total()
        );
    }
    Ok(())
}
