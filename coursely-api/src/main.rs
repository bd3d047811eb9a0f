//! coursely-api - course review backend entry point
//!
//! Serves the course catalog, enrollment, and review submission API over
//! HTTP, backed by a SQLite database under the resolved root folder.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use coursely_api::{build_router, AppState};
use coursely_common::config::{
    ensure_root_folder, resolve_database_path, resolve_root_folder, BootstrapConfig, DEFAULT_PORT,
};
use coursely_common::db::init_database;

/// Command-line arguments for coursely-api
#[derive(Parser, Debug)]
#[command(name = "coursely-api")]
#[command(about = "Course review backend with sentiment-scored reviews")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "COURSELY_PORT")]
    port: Option<u16>,

    /// Root folder holding the database file
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Explicit database file path
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file is read before tracing init so its log_filter can seed
    // the default filter; RUST_LOG still wins when set
    let config = BootstrapConfig::load();
    let default_filter = config
        .log_filter
        .clone()
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Coursely API v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let db_path = resolve_database_path(args.database.as_deref(), &config, &root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let state = AppState::new(pool);
    let app = build_router(state);

    let port = args.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("coursely-api listening on http://{}", addr);
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
