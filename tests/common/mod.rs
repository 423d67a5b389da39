//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use mongodb::bson::{oid::ObjectId, Document};
use tokio::task::JoinHandle;

use budget_tracker::config::{ObservabilityConfig, ServerConfig};
use budget_tracker::lifecycle::{PhaseTracker, Shutdown};
use budget_tracker::observability::Observability;
use budget_tracker::storage::{DocumentCursor, DocumentStore, MemoryStore, StorageError};
use budget_tracker::{AppState, Server, ServerError, ShutdownReport};

pub const DB: &str = "budget-tracker-it";

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub phases: PhaseTracker,
    pub running: JoinHandle<Result<ShutdownReport, ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a plain-HTTP server on `127.0.0.1:0` over `store`.
pub async fn spawn_server(store: Arc<dyn DocumentStore>, shutdown_timeout_secs: u64) -> TestServer {
    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        shutdown_timeout_secs,
        ..ServerConfig::default()
    };
    let observability = Arc::new(Observability::new(&ObservabilityConfig::default()));
    let state = AppState::new(store, DB, observability);

    let server = Server::new(config, Router::new(), state);
    let handle = server.handle();
    let phases = server.phases();
    let shutdown = Shutdown::new();

    let running = tokio::spawn(server.start(false, shutdown.clone()));
    let addr = tokio::time::timeout(Duration::from_secs(5), handle.listening())
        .await
        .expect("server did not start listening")
        .expect("listener closed before reporting its address");

    TestServer {
        addr,
        shutdown,
        phases,
        running,
    }
}

pub async fn spawn_memory_server() -> TestServer {
    spawn_server(Arc::new(MemoryStore::new()), 15).await
}

/// Delays reads and pings, counting how many calls are in progress.
pub struct SlowStore {
    inner: MemoryStore,
    read_delay: Duration,
    ping_delay: Duration,
    in_progress: AtomicUsize,
}

impl SlowStore {
    pub fn new(read_delay: Duration, ping_delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            read_delay,
            ping_delay,
            in_progress: AtomicUsize::new(0),
        }
    }

    pub fn in_progress(&self) -> usize {
        self.in_progress.load(Ordering::SeqCst)
    }

    async fn stall(&self, delay: Duration) {
        self.in_progress.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(delay).await;
        self.in_progress.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn find_one(&self, d: &str, c: &str, f: Document) -> Result<Document, StorageError> {
        self.stall(self.read_delay).await;
        self.inner.find_one(d, c, f).await
    }
    async fn find_many(&self, d: &str, c: &str, f: Document) -> Result<DocumentCursor, StorageError> {
        self.stall(self.read_delay).await;
        self.inner.find_many(d, c, f).await
    }
    async fn create_index(&self, d: &str, c: &str, k: Document) -> Result<(), StorageError> {
        self.inner.create_index(d, c, k).await
    }
    async fn create_one(&self, d: &str, c: &str, doc: Document) -> Result<ObjectId, StorageError> {
        self.inner.create_one(d, c, doc).await
    }
    async fn delete_one(&self, d: &str, c: &str, f: Document) -> Result<u64, StorageError> {
        self.inner.delete_one(d, c, f).await
    }
    async fn ping(&self) -> Result<(), StorageError> {
        self.stall(self.ping_delay).await;
        Ok(())
    }
}

/// Wait until `store` has `count` calls in progress.
pub async fn wait_in_progress(store: &SlowStore, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.in_progress() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("requests never reached the store");
}
