//! Storage access subsystem.
//!
//! # Data Flow
//! ```text
//! Domain operation (users, budget)
//!     → Arc<dyn DocumentStore>
//!     → TimeoutStore (per-call deadline, see resilience::timeouts)
//!     → MongoStore → StorageClient (pooled mongodb::Client)
//!       or MemoryStore (in-process collections)
//! ```
//!
//! # Design Decisions
//! - Domain code depends only on the `DocumentStore` capability, never on the driver
//! - Cursors are streams; dropping one releases it
//! - No retries, no caching: every read goes to the backend

pub mod client;
pub mod error;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use mongodb::bson::{oid::ObjectId, Document};

pub use client::StorageClient;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Lazy, forward-only sequence of documents returned by [`DocumentStore::find_many`].
///
/// Errors met while iterating are yielded as items and must be propagated by
/// the consumer.
pub type DocumentCursor = BoxStream<'static, Result<Document, StorageError>>;

/// Persistence capability shared by every backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return the first document matching `filter`, or [`StorageError::NotFound`].
    async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Document, StorageError>;

    /// Open a cursor over every document matching `filter`.
    async fn find_many(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<DocumentCursor, StorageError>;

    /// Create a unique index over `keys`. Re-creating an identical index succeeds.
    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        keys: Document,
    ) -> Result<(), StorageError>;

    /// Insert a single document and return its storage-assigned identity.
    async fn create_one(
        &self,
        database: &str,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StorageError>;

    /// Delete the first document matching `filter`, returning how many were removed.
    async fn delete_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64, StorageError>;

    /// Check connectivity with the backend.
    async fn ping(&self) -> Result<(), StorageError>;
}
