//! radio-api - Read-only HTTP query service for radio program episodes
//!
//! Loads every configured program source once at startup, freezes the
//! resulting catalog and serves list, date filter and title search queries
//! over it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use radio_common::catalog::CatalogLoader;
use radio_common::config::{DataDirResolver, TomlConfig};
use radio_api::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments for radio-api
#[derive(Parser, Debug)]
#[command(name = "radio-api")]
#[command(about = "Read-only query service for radio program episodes")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder containing the program source files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "RADIO_API_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing: RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting radio-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using built-in defaults"),
    }

    let (data_dir, _) = DataDirResolver::new()
        .with_cli_arg(args.data_dir)
        .with_config_value(config.data_dir.clone())
        .resolve();

    // One-time blocking load before any request is served
    let loader = CatalogLoader::new(data_dir);
    info!("Loading catalog from {}", loader.data_dir().display());
    let (catalog, report) = tokio::task::spawn_blocking(move || loader.load())
        .await
        .context("Catalog loading task failed")?;

    if catalog.is_empty() {
        warn!("No episodes loaded; every query will return an empty result");
    }
    info!(
        "Catalog ready: {} programs, {} episodes ({} rows skipped)",
        catalog.program_count(),
        report.total_episodes(),
        report.total_skipped()
    );

    let state = AppState::new(catalog);
    let app = build_router(state);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", host, port))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    info!("radio-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
