//! sihook - Search index hook service
//!
//! Sidecar for the dataset catalog: the catalog calls the hook endpoints on
//! every index and delete event, and sihook forwards the derived metadata
//! document to the search index.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sihook::models::LicenseOpenness;
use sihook::services::{CatalogClient, IndexGateway, IndexSyncController};
use sihook::AppState;
use sihook_common::config::TomlConfig;

/// Command-line arguments for sihook
#[derive(Parser, Debug)]
#[command(name = "sihook")]
#[command(about = "Search index hook for the dataset catalog")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SIHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "SIHOOK_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("sihook={},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = args.port.unwrap_or(config.port);
    info!("Starting sihook on port {}", port);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let catalog = Arc::new(
        CatalogClient::new(&config.catalog).context("Failed to initialize catalog client")?,
    );

    // Loaded once; an unreachable registry leaves the snapshot empty
    let openness = Arc::new(LicenseOpenness::load(catalog.as_ref()).await);

    let gateway =
        IndexGateway::new(config.search_index.clone()).context("Failed to initialize index gateway")?;
    let controller = IndexSyncController::new(gateway, catalog, openness);

    let app = sihook::build_router(AppState::new(controller));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
