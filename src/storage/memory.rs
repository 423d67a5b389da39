//! In-process [`DocumentStore`].
//!
//! Supports top-level equality filters, unique indexes and ObjectId
//! generation: enough to run the service without a database and to act as
//! the test double for domain code.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::storage::{DocumentCursor, DocumentStore, StorageError};

#[derive(Default)]
struct CollectionState {
    documents: Vec<Document>,
    /// Key documents of the unique indexes on this collection.
    unique_indexes: Vec<Document>,
}

impl CollectionState {
    /// Find an index whose key tuple for `document` is already taken.
    fn violated_index(&self, document: &Document) -> Option<(String, String)> {
        if let Some(id) = document.get("_id") {
            if self.documents.iter().any(|d| d.get("_id") == Some(id)) {
                return Some(("_id_".to_string(), format!("{{ _id: {} }}", id)));
            }
        }

        self.unique_indexes.iter().find_map(|keys| {
            let candidate = key_tuple(document, keys);
            self.documents
                .iter()
                .any(|d| key_tuple(d, keys) == candidate)
                .then(|| (index_name(keys), describe_key(keys, &candidate)))
        })
    }
}

/// In-memory collections grouped by `(database, collection)`.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<(String, String), CollectionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<T>(
        &self,
        database: &str,
        collection: &str,
        f: impl FnOnce(&mut CollectionState) -> T,
    ) -> T {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let state = collections
            .entry((database.to_string(), collection.to_string()))
            .or_default();
        f(state)
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn key_tuple<'a>(document: &'a Document, keys: &Document) -> Vec<Option<&'a Bson>> {
    keys.keys().map(|k| document.get(k)).collect()
}

fn index_name(keys: &Document) -> String {
    keys.iter()
        .map(|(k, v)| format!("{}_{}", k, v))
        .collect::<Vec<_>>()
        .join("_")
}

fn describe_key(keys: &Document, values: &[Option<&Bson>]) -> String {
    let pairs: Vec<String> = keys
        .keys()
        .zip(values)
        .map(|(k, v)| match v {
            Some(v) => format!("{}: {}", k, v),
            None => format!("{}: null", k),
        })
        .collect();
    format!("{{ {} }}", pairs.join(", "))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<Document, StorageError> {
        self.with_collection(database, collection, |state| {
            state
                .documents
                .iter()
                .find(|d| matches(d, &filter))
                .cloned()
                .ok_or(StorageError::NotFound)
        })
    }

    async fn find_many(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<DocumentCursor, StorageError> {
        let documents: Vec<Document> = self.with_collection(database, collection, |state| {
            state
                .documents
                .iter()
                .filter(|d| matches(d, &filter))
                .cloned()
                .collect()
        });
        Ok(stream::iter(documents.into_iter().map(Ok)).boxed())
    }

    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        keys: Document,
    ) -> Result<(), StorageError> {
        self.with_collection(database, collection, |state| {
            if state.unique_indexes.contains(&keys) {
                return Ok(());
            }

            let mut seen: Vec<Vec<Option<&Bson>>> = Vec::with_capacity(state.documents.len());
            for document in &state.documents {
                let tuple = key_tuple(document, &keys);
                if seen.contains(&tuple) {
                    return Err(StorageError::DuplicateKey(format!(
                        "index build failed: {}.{} index: {} dup key: {}",
                        database,
                        collection,
                        index_name(&keys),
                        describe_key(&keys, &tuple)
                    )));
                }
                seen.push(tuple);
            }

            state.unique_indexes.push(keys);
            Ok(())
        })
    }

    async fn create_one(
        &self,
        database: &str,
        collection: &str,
        mut document: Document,
    ) -> Result<ObjectId, StorageError> {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => return Err(StorageError::UnexpectedId(other.to_string())),
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        self.with_collection(database, collection, |state| {
            if let Some((index, key)) = state.violated_index(&document) {
                return Err(StorageError::DuplicateKey(format!(
                    "E11000 duplicate key error collection: {}.{} index: {} dup key: {}",
                    database, collection, index, key
                )));
            }
            state.documents.push(document);
            Ok(id)
        })
    }

    async fn delete_one(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
    ) -> Result<u64, StorageError> {
        self.with_collection(database, collection, |state| {
            match state.documents.iter().position(|d| matches(d, &filter)) {
                Some(pos) => {
                    state.documents.remove(pos);
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use mongodb::bson::doc;

    const DB: &str = "test-db";

    #[tokio::test]
    async fn test_insert_assigns_id_and_find_one_matches() {
        let store = MemoryStore::new();
        let id = store
            .create_one(DB, "users", doc! { "login": "alice", "email": "a@example.com" })
            .await
            .unwrap();

        let found = store.find_one(DB, "users", doc! { "_id": id }).await.unwrap();
        assert_eq!(found.get_str("login").unwrap(), "alice");

        let by_login = store.find_one(DB, "users", doc! { "login": "alice" }).await.unwrap();
        assert_eq!(by_login.get_object_id("_id").unwrap(), id);
    }

    #[tokio::test]
    async fn test_find_one_without_match_is_not_found() {
        let store = MemoryStore::new();
        let err = store.find_one(DB, "users", doc! { "login": "ghost" }).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_find_many_filters_and_keeps_insertion_order() {
        let store = MemoryStore::new();
        for (owner, alias) in [("a", "first"), ("b", "other"), ("a", "second")] {
            store
                .create_one(DB, "cards", doc! { "owner": owner, "alias": alias })
                .await
                .unwrap();
        }

        let cursor = store.find_many(DB, "cards", doc! { "owner": "a" }).await.unwrap();
        let aliases: Vec<String> = cursor
            .map_ok(|d| d.get_str("alias").unwrap().to_string())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(aliases, vec!["first", "second"]);

        let all = store.find_many(DB, "cards", doc! {}).await.unwrap();
        assert_eq!(all.count().await, 3);
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicates_and_is_idempotent() {
        let store = MemoryStore::new();
        store.create_index(DB, "users", doc! { "login": 1 }).await.unwrap();
        store.create_index(DB, "users", doc! { "login": 1 }).await.unwrap();

        store.create_one(DB, "users", doc! { "login": "bob" }).await.unwrap();
        let err = store
            .create_one(DB, "users", doc! { "login": "bob" })
            .await
            .unwrap_err();

        match err {
            StorageError::DuplicateKey(msg) => {
                assert!(msg.contains("login_1"), "{msg}");
                assert!(msg.contains("bob"), "{msg}");
            }
            other => panic!("expected duplicate key, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_index_build_fails_over_existing_duplicates() {
        let store = MemoryStore::new();
        store.create_one(DB, "users", doc! { "login": "carol" }).await.unwrap();
        store.create_one(DB, "users", doc! { "login": "carol" }).await.unwrap();

        let err = store
            .create_index(DB, "users", doc! { "login": 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_delete_one_reports_count() {
        let store = MemoryStore::new();
        let id = store.create_one(DB, "users", doc! { "login": "dave" }).await.unwrap();

        assert_eq!(store.delete_one(DB, "users", doc! { "_id": id }).await.unwrap(), 1);
        assert_eq!(store.delete_one(DB, "users", doc! { "_id": id }).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let store = MemoryStore::new();
        store.create_one("one", "users", doc! { "login": "erin" }).await.unwrap();

        let err = store
            .find_one("two", "users", doc! { "login": "erin" })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
