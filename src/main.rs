//! Students API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────┐    ┌──────────┐    ┌──────────────┐
//!     ──────────────────▶│ listener │───▶│  router  │───▶│   handlers   │
//!                        │ (tokio)  │    │ (axum +  │    │ decode →     │
//!                        └──────────┘    │  layers) │    │ validate     │
//!                                        └──────────┘    └──────┬───────┘
//!                                                               │
//!     Client Response    ┌──────────────────────┐        ┌──────▼───────┐
//!     ◀──────────────────│ {message, error} or  │◀───────│  repository  │
//!                        │ student JSON         │        │  (SQLite)    │
//!                        └──────────────────────┘        └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! CONFIG_PATH=config/local.toml students-api
//! students-api --config config/local.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use students_api::config::{self, loader::CONFIG_PATH_ENV, AppConfig};
use students_api::lifecycle::{self, DrainOutcome, Shutdown};
use students_api::observability;
use students_api::storage::{SqliteStorage, StudentRepository};
use students_api::HttpServer;

#[derive(Parser)]
#[command(name = "students-api")]
#[command(about = "CRUD HTTP service for student records", long_about = None)]
struct Cli {
    /// Path to the TOML config file (CONFIG_PATH takes precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("students-api: {}", e);
            std::process::exit(1);
        }
    };

    observability::init_logging(&config.observability)?;

    tracing::info!(
        env = %config.env,
        address = %config.http_server.address,
        storage_path = %config.storage_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let address = config.observability.metrics_address.parse()?;
        observability::init_metrics(address)?;
    }

    let storage = SqliteStorage::open(&config.storage_path)?;
    tracing::info!(
        env = %config.env,
        storage_path = %config.storage_path,
        "Database initialized"
    );
    let repository: Arc<dyn StudentRepository> = Arc::new(storage);

    let listener = TcpListener::bind(&config.http_server.address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, repository);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        _ = lifecycle::shutdown_signal() => {}
        result = &mut server_task => {
            // Server exited before any signal; nothing to drain.
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(e.into()),
            };
        }
    }

    tracing::info!(
        grace_secs = grace.as_secs(),
        subscribers = shutdown.receiver_count(),
        "Shutting down server"
    );
    shutdown.trigger();

    match lifecycle::drain(server_task, grace).await {
        DrainOutcome::Completed(Ok(())) => tracing::info!("Server shutdown successfully"),
        DrainOutcome::Completed(Err(e)) => {
            tracing::error!(error = %e, "Failed to shutdown server")
        }
        DrainOutcome::Failed(e) => tracing::error!(error = %e, "Server task failed"),
        DrainOutcome::Forced => {
            tracing::warn!("Grace period elapsed, forcing shutdown")
        }
    }

    Ok(())
}

fn load(flag: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let path = config::resolve_config_path(std::env::var(CONFIG_PATH_ENV).ok(), flag)?;
    config::load_config(&path)
}
