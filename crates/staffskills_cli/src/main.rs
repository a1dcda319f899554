//! `staffskills` server entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and `STAFFSKILLS_*` environment variables.
//! - Initialize logging, migrate the database, then serve the HTTP API.
//!
//! # Invariants
//! - The database is migrated before the listener accepts connections.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use staffskills_api::{serve_with_shutdown, AppState};
use staffskills_core::db::open_db;
use staffskills_core::{core_version, default_log_level, init_logging};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "staffskills")]
#[command(about = "REST backend for employee records and their skills")]
#[command(version)]
struct Cli {
    /// SQLite database file; parent directories are created on demand
    #[arg(long, env = "STAFFSKILLS_DB_PATH", default_value = "staffskills.sqlite3")]
    db_path: PathBuf,

    /// Address the HTTP server binds to
    #[arg(long, env = "STAFFSKILLS_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// trace|debug|info|warn|error (defaults to debug in debug builds, info otherwise)
    #[arg(long, env = "STAFFSKILLS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr only when unset
    #[arg(long, env = "STAFFSKILLS_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    drop(
        open_db(&cli.db_path)
            .with_context(|| format!("failed to open database `{}`", cli.db_path.display()))?,
    );

    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(
        "event=server_start module=cli status=ok addr={} db_path={} version={}",
        listener.local_addr()?,
        cli.db_path.display(),
        core_version()
    );

    serve_with_shutdown(listener, AppState::new(cli.db_path), shutdown_signal())
        .await
        .context("http server failed")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=signal_listen module=cli status=error error={err}");
    }
}
