//! Budget tracker API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────┐
//!                    │                  BUDGET TRACKER                     │
//!                    │                                                     │
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌────────────────┐   │
//!   ─────────────────┼─▶│net (tls)│──▶│  http    │──▶│ users / budget │   │
//!                    │  └─────────┘   │ server   │   │   services     │   │
//!                    │                └──────────┘   └───────┬────────┘   │
//!                    │                                       ▼            │
//!                    │                              ┌────────────────┐    │    ┌─────────┐
//!                    │                              │ storage (+ dead│────┼───▶│ MongoDB │
//!                    │                              │ lines)         │    │    └─────────┘
//!                    │                              └────────────────┘    │
//!                    │  ┌──────────────────────────────────────────────┐  │
//!                    │  │ config · observability · lifecycle (signals) │  │
//!                    │  └──────────────────────────────────────────────┘  │
//!                    └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;

use budget_tracker::config::{self, AppConfig, ConfigError, StorageBackend};
use budget_tracker::lifecycle::{signals, Shutdown};
use budget_tracker::observability::{logging, Observability};
use budget_tracker::resilience::TimeoutStore;
use budget_tracker::storage::{DocumentStore, MemoryStore, MongoStore, StorageClient};
use budget_tracker::{AppState, Server};

#[derive(Parser, Debug)]
#[command(name = "budget-tracker", version, about = "Budget tracker API server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "BUDGET_TRACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override `server.bind_address`
    #[arg(long, env = "BUDGET_TRACKER_BIND")]
    bind: Option<String>,

    /// Override `storage.uri`
    #[arg(long, env = "MONGODB_URI")]
    mongodb_uri: Option<String>,

    /// Serve over TLS using `[server.tls]`
    #[arg(long, env = "BUDGET_TRACKER_TLS")]
    tls: bool,
}

fn load(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    if let Some(uri) = &cli.mongodb_uri {
        config.storage.uri = uri.clone();
    }

    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn DocumentStore> = match config.storage.backend {
        StorageBackend::Mongodb => {
            let client = StorageClient::connect(&config.storage).await?;
            Arc::new(TimeoutStore::from_config(MongoStore::new(client), &config.storage))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            Arc::new(TimeoutStore::from_config(MemoryStore::new(), &config.storage))
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "budget-tracker starting");
    tracing::info!(
        bind_address = %config.server.bind_address,
        backend = ?config.storage.backend,
        database = %config.storage.database,
        tls = cli.tls,
        shutdown_timeout_secs = config.server.shutdown_timeout_secs,
        "Configuration loaded"
    );

    let observability = Arc::new(Observability::new(&config.observability));
    let store = open_store(&config).await?;
    let state = AppState::new(store, config.storage.database.as_str(), observability);

    let shutdown = Shutdown::new();
    signals::listen(shutdown.clone())?;

    let server = Server::new(config.server.clone(), Router::new(), state);
    if let Err(e) = server.start(cli.tls, shutdown).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
