//! # Backroom Report Scheduler
//!
//! Runs the report dispatcher against the back-office database.
//!
//! ## Usage
//! ```bash
//! # Default config location
//! report-scheduler
//!
//! # Explicit config file
//! report-scheduler --config /etc/backroom/scheduler.toml
//!
//! # Verbose logs
//! RUST_LOG=debug report-scheduler
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backroom_db::{Database, DbConfig};
use report_scheduler::{Dispatcher, FileOutputRunner, SchedulerConfig};

const DEFAULT_LOG_FILTER: &str = "info,backroom_db=info,report_scheduler=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    info!("Starting Backroom report scheduler...");

    let config = SchedulerConfig::load(config_path_from_args()).context("loading scheduler config")?;
    info!(
        db_path = %config.database.path.display(),
        output_dir = %config.output.directory.display(),
        poll_interval_secs = config.dispatcher.poll_interval_secs,
        "Configuration loaded"
    );

    if let Some(parent) = config.database.path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await
    .context("opening report database")?;
    info!(active_reports = db.reports().count_active().await?, "Database ready");

    let runner = Arc::new(FileOutputRunner::new(&config.output.directory));
    let (dispatcher, handle) = Dispatcher::new(db.clone(), runner, &config);
    let task = tokio::spawn(dispatcher.run());

    shutdown_signal().await;

    handle.shutdown().await?;
    task.await.context("dispatcher task panicked")?;
    db.close().await;

    info!("Scheduler shutdown complete");
    Ok(())
}

/// `--config <PATH>` / `-c <PATH>`, if given.
fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
