use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use immich_folder_albums::{Synchronizer, load_config};
use snafu::{Whatever, prelude::*};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Create Immich albums from local subdirectories.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Simulate actions without creating albums.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Configuration file. `IMMICH_ALBUMS_*` environment variables take
    /// precedence over its values.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
#[snafu::report]
async fn main() -> Result<(), Whatever> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_ansi(atty::is(atty::Stream::Stdout))
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
    let config = Arc::new(
        load_config(&cli.config, cli.dry_run).whatever_context("failed to load config")?,
    );
    info!("Starting with configuration: {config}");

    let synchronizer = Synchronizer::new(config).whatever_context("failed to set up sync")?;
    let summary = synchronizer
        .run()
        .await
        .whatever_context("failed to create albums")?;
    info!("{summary}");

    Ok(())
}
