//! Cadence - Main entry point
//!
//! Wires together the database, the event bus, the background sweeper, and
//! the HTTP server, then serves until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadence::db;
use cadence::events::EventBus;
use cadence::sweep::{SweepConfig, Sweeper};
use cadence::{build_router, AppState};

/// Command-line arguments for cadence
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Time-bounded phrase board")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "CADENCE_PORT")]
    port: u16,

    /// SQLite database path
    #[arg(short, long, default_value = "cadence.db", env = "CADENCE_DATABASE")]
    database: PathBuf,

    /// Sweep period in seconds
    #[arg(long, default_value = "5", env = "CADENCE_SWEEP_SECS")]
    sweep_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=debug,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    info!(
        "Starting cadence v{} [{}] built {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP")
    );
    info!("Database path: {}", args.database.display());

    let pool = db::init_database(&args.database)
        .await
        .context("Failed to initialize database")?;

    let events = Arc::new(EventBus::new(256));

    // The sweeper shares the pool and event bus with request handlers and
    // runs until process shutdown
    let sweeper = Arc::new(Sweeper::new(
        SweepConfig {
            period_secs: args.sweep_secs,
            enabled: true,
        },
        pool.clone(),
        events.clone(),
    ));
    sweeper.run();

    let state = AppState::new(pool, events);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("cadence listening on http://{}", addr);

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
