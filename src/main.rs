//! IIIF Level 0 edge server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  IIIF EDGE                   │
//!                        │                                              │
//!  Client Request        │  ┌─────────┐   ┌──────────────────────────┐  │
//!  ──────────────────────┼─▶│  http   │──▶│ iiif engine              │  │
//!                        │  │ server  │   │ method → version → path  │  │
//!                        │  └─────────┘   │ → routing → segments     │  │
//!                        │       ▲        └────────────┬─────────────┘  │
//!                        │       │        reject │ image │ info        │
//!                        │       │               ▼       ▼             │
//!  Client Response       │  ┌─────────┐   ┌──────────────────────────┐  │
//!  ◀─────────────────────┼──│response │◀──│ upstream client          │◀─┼── Image processor
//!                        │  └─────────┘   └──────────────────────────┘  │   / metadata
//!                        │                                              │
//!                        │   config (watch + reload) · observability    │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use iiif_edge::config::loader::load_config;
use iiif_edge::config::watcher::ConfigWatcher;
use iiif_edge::config::EdgeConfig;
use iiif_edge::http::HttpServer;
use iiif_edge::lifecycle::{wait_for_signal, Shutdown};
use iiif_edge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "iiif-edge")]
#[command(about = "IIIF Level 0 image edge", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("iiif-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        default_version = %config.iiif.default_version,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    let signal = wait_for_signal().await;
    tracing::info!(signal, "Shutting down");
    shutdown.trigger();

    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
