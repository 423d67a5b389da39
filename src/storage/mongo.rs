//! Production [`DocumentStore`] backed by MongoDB.

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use mongodb::bson::{oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::storage::{DocumentCursor, DocumentStore, StorageClient, StorageError};

/// Document store that owns the pooled [`StorageClient`] exclusively.
pub struct MongoStore {
    client: StorageClient,
}

impl MongoStore {
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }

    fn collection(&self, database: &str, collection: &str) -> Collection<Document> {
        self.client.collection(database, collection)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Document, StorageError> {
        self.collection(database, collection)
            .find_one(filter)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn find_many(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<DocumentCursor, StorageError> {
        let cursor = self.collection(database, collection).find(filter).await?;
        Ok(cursor.map_err(StorageError::from).boxed())
    }

    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        keys: Document,
    ) -> Result<(), StorageError> {
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let created = self.collection(database, collection).create_index(model).await?;
        tracing::debug!(%database, %collection, index = %created.index_name, "index ensured");
        Ok(())
    }

    async fn create_one(
        &self,
        database: &str,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, StorageError> {
        let result = self.collection(database, collection).insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StorageError::UnexpectedId(result.inserted_id.to_string()))
    }

    async fn delete_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64, StorageError> {
        let result = self.collection(database, collection).delete_one(filter).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.client.ping().await
    }
}
