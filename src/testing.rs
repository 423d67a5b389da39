//! Test doubles shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::config::ObservabilityConfig;
use crate::observability::Observability;
use crate::state::AppState;
use crate::storage::{DocumentCursor, DocumentStore, MemoryStore, StorageError};

pub const DB: &str = "budget-tracker-test";

/// Counts every call and forwards it to an in-memory store.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl RecordingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn find_one(&self, d: &str, c: &str, f: Document) -> Result<Document, StorageError> {
        self.record();
        self.inner.find_one(d, c, f).await
    }
    async fn find_many(&self, d: &str, c: &str, f: Document) -> Result<DocumentCursor, StorageError> {
        self.record();
        self.inner.find_many(d, c, f).await
    }
    async fn create_index(&self, d: &str, c: &str, k: Document) -> Result<(), StorageError> {
        self.record();
        self.inner.create_index(d, c, k).await
    }
    async fn create_one(&self, d: &str, c: &str, doc: Document) -> Result<ObjectId, StorageError> {
        self.record();
        self.inner.create_one(d, c, doc).await
    }
    async fn delete_one(&self, d: &str, c: &str, f: Document) -> Result<u64, StorageError> {
        self.record();
        self.inner.delete_one(d, c, f).await
    }
    async fn ping(&self) -> Result<(), StorageError> {
        self.record();
        Ok(())
    }
}

pub fn app_state(store: Arc<dyn DocumentStore>) -> AppState {
    AppState::new(
        store,
        DB,
        Arc::new(Observability::new(&ObservabilityConfig::default())),
    )
}

pub fn memory_state() -> AppState {
    app_state(Arc::new(MemoryStore::new()))
}
