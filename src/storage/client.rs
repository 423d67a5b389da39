//! MongoDB connection handle.
//!
//! # Responsibilities
//! - Parse the connection string and apply client options
//! - Own the pooled `mongodb::Client` shared by every request
//! - Log database commands as they complete

use mongodb::bson::doc;
use mongodb::event::command::CommandEvent;
use mongodb::event::EventHandler;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::config::StorageConfig;
use crate::storage::StorageError;

/// Pooled connection to a MongoDB deployment.
///
/// Cloning is cheap; every clone shares the same pool.
#[derive(Clone, Debug)]
pub struct StorageClient {
    client: Client,
}

impl StorageClient {
    /// Build a client from configuration.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation (or ping), not here.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.connect_timeout());
        options.command_event_handler = Some(EventHandler::callback(log_command));

        let client = Client::with_options(options)?;
        tracing::info!(
            app_name = %config.app_name,
            database = %config.database,
            "Storage client configured"
        );

        Ok(Self { client })
    }

    pub fn collection<T: Send + Sync>(&self, database: &str, collection: &str) -> Collection<T> {
        self.client.database(database).collection(collection)
    }

    /// Round-trip a `ping` command through the `admin` database.
    pub async fn ping(&self) -> Result<(), StorageError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

fn log_command(event: CommandEvent) {
    match event {
        CommandEvent::Succeeded(ev) => {
            tracing::debug!(
                command = %ev.command_name,
                request_id = ev.request_id,
                duration_ms = ev.duration.as_millis() as u64,
                "mongodb command succeeded"
            );
        }
        CommandEvent::Failed(ev) => {
            tracing::debug!(
                command = %ev.command_name,
                request_id = ev.request_id,
                duration_ms = ev.duration.as_millis() as u64,
                error = %ev.failure,
                "mongodb command failed"
            );
        }
        _ => {}
    }
}
