//! Asana scoring server
//!
//! # Usage
//! ```bash
//! asana-server [--config asana.toml] [--references average_keypoints.json] \
//!              [--bind 0.0.0.0:8000] [--verbose]
//! ```

use anyhow::Context;
use asana_api::{build_scorer, serve, ApiConfig};
use asana_core::PoseReferenceTable;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Real-time yoga pose scoring over WebSocket
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML, YAML or JSON); `ASANA__*` env vars override it
    #[arg(short, long)]
    config: Option<String>,

    /// Reference pose table, overrides `references.path`
    #[arg(short, long)]
    references: Option<PathBuf>,

    /// Bind address, overrides `server.bind_addr`
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(args.verbose)
        .init();

    let mut config = match &args.config {
        Some(path) => ApiConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => ApiConfig::from_env().context("failed to load configuration from environment")?,
    };

    if let Some(path) = args.references {
        config.references.path = path;
    }
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    let references = PoseReferenceTable::from_json_file(&config.references.path)
        .with_context(|| {
            format!(
                "failed to load reference poses from {}",
                config.references.path.display()
            )
        })?;

    if references.is_empty() {
        tracing::warn!("Reference pose table is empty; every frame will fail classification");
    }

    let scorer = Arc::new(build_scorer(&config, references));
    serve(config, scorer).await?;

    Ok(())
}
