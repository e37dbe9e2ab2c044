//! Karaoke Queue (karaoke-queue) - Main entry point
//!
//! Serves the song queue to submitters and the moderator over HTTP.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use karaoke_common::config::{resolve_config_path, ConfigOverrides, TomlConfig};
use karaoke_common::db::init_database;
use karaoke_common::SystemClock;
use karaoke_queue::queue::{PolicyConfig, QueueEngine};
use karaoke_queue::{server, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for karaoke-queue
#[derive(Parser, Debug)]
#[command(name = "karaoke-queue")]
#[command(about = "Karaoke song queue service")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "KARAOKE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the SQLite song catalog
    #[arg(short, long, env = "KARAOKE_DATABASE")]
    database: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "KARAOKE_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long)]
    bind: Option<IpAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config = TomlConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(ConfigOverrides {
            database_path: args.database,
            bind_address: args.bind,
            port: args.port,
        });

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting karaoke-queue v{} (config: {})",
        env!("CARGO_PKG_VERSION"),
        config_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string())
    );

    let db_path = config.database_path();
    info!("Song catalog: {}", db_path.display());
    let db = init_database(&db_path)
        .await
        .context("Failed to open song catalog")?;

    let policy = PolicyConfig::from_settings(&config.policy).context("Invalid [policy] settings")?;
    info!(
        "Policy: open={}, max_times={}, same_song={}s, submissions={}s",
        policy.queue_is_open(),
        policy.max_times_song_can_be_sung(),
        policy.time_between_same_song().num_seconds(),
        policy.time_between_submissions().num_seconds()
    );
    let engine = Arc::new(QueueEngine::with_policy(policy, Arc::new(SystemClock)));

    let moderator_token = config.moderator_token().map(str::to_string);
    if moderator_token.is_none() {
        warn!("No moderator_token configured: moderator routes are unauthenticated");
    }
    let state = AppState::new(engine, db, moderator_token);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    server::serve(listener, state, shutdown_signal())
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
