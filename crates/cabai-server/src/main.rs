//! cabai-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! record store and the upload directory, and serves the classification API
//! over HTTP.
//!
//! # Orphaned images
//!
//! To list uploaded images that no record references:
//!
//! ```
//! cargo run -p cabai-server -- --list-orphans
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use cabai_blob_fs::FsBlobStore;
use cabai_core::sweep::unreferenced_blobs;
use cabai_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Chili classification ingestion server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print uploaded images that no record references and exit.
  #[arg(long)]
  list_orphans: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let records = SqliteStore::open(&cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.database_path))?;
  let blobs = FsBlobStore::open(&cfg.upload_dir)
    .await
    .with_context(|| format!("failed to open upload dir {:?}", cfg.upload_dir))?;

  // Helper mode: report orphaned blobs and exit.
  if cli.list_orphans {
    let orphans = unreferenced_blobs(&records, &blobs)
      .await
      .context("failed to reconcile uploads with records")?;
    for key in &orphans {
      println!("{}", blobs.path_of(key).display());
    }
    tracing::info!(count = orphans.len(), "orphan scan complete");
    return Ok(());
  }

  let cleared = blobs
    .clear_staging()
    .await
    .context("failed to clear staging directory")?;
  if cleared > 0 {
    tracing::warn!(cleared, "removed staged uploads from a previous run");
  }

  let app = cabai_api::api_router(Arc::new(records), Arc::new(blobs), cfg.api_config())
    .layer(TraceLayer::new_for_http());
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
