//! Per-call deadlines for storage operations.
//!
//! # Responsibilities
//! - Bound every query and write with the configured query timeout
//! - Bound liveness pings with the (shorter) ping timeout
//! - Leave index creation unbounded
//!
//! # Design Decisions
//! - Implemented as a `DocumentStore` decorator so every backend gets the same deadlines
//! - Expiry drops the in-flight future and reports `StorageError::Timeout`; nothing is retried

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::config::StorageConfig;
use crate::storage::{DocumentCursor, DocumentStore, StorageError};

/// Run `fut` to completion or fail with [`StorageError::Timeout`] after `limit`.
pub(crate) async fn with_deadline<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, limit_ms = limit.as_millis() as u64, "storage deadline exceeded");
            Err(StorageError::Timeout { operation, limit })
        }
    }
}

/// Wraps any store and applies deadlines to each call.
pub struct TimeoutStore<S> {
    inner: S,
    query_timeout: Duration,
    ping_timeout: Duration,
}

impl<S: DocumentStore> TimeoutStore<S> {
    pub fn new(inner: S, query_timeout: Duration, ping_timeout: Duration) -> Self {
        Self {
            inner,
            query_timeout,
            ping_timeout,
        }
    }

    pub fn from_config(inner: S, config: &StorageConfig) -> Self {
        Self::new(inner, config.query_timeout(), config.ping_timeout())
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TimeoutStore<S> {
    async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Document, StorageError> {
        with_deadline(
            "find_one",
            self.query_timeout,
            self.inner.find_one(database, collection, filter),
        )
        .await
    }

    async fn find_many(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<DocumentCursor, StorageError> {
        with_deadline(
            "find_many",
            self.query_timeout,
            self.inner.find_many(database, collection, filter),
        )
        .await
    }

    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        keys: Document,
    ) -> Result<(), StorageError> {
        self.inner.create_index(database, collection, keys).await
    }

    async fn create_one(
        &self,
        database: &str,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StorageError> {
        with_deadline(
            "create_one",
            self.query_timeout,
            self.inner.create_one(database, collection, document),
        )
        .await
    }

    async fn delete_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64, StorageError> {
        with_deadline(
            "delete_one",
            self.query_timeout,
            self.inner.delete_one(database, collection, filter),
        )
        .await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        with_deadline("ping", self.ping_timeout, self.inner.ping()).await
    }
}
