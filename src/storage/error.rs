//! Storage error taxonomy.

use std::time::Duration;

use mongodb::error::{ErrorKind, WriteFailure};

/// Server code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;
/// Server codes for an index that clashes with an existing definition.
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

/// Errors produced by every [`DocumentStore`](super::DocumentStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No document matched the filter.
    #[error("no document matched the filter")]
    NotFound,

    /// The operation did not finish before its deadline.
    #[error("{operation} exceeded its deadline of {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// An index with a clashing definition already exists.
    #[error("index conflict: {0}")]
    IndexConflict(String),

    /// The store assigned an identity that is not an ObjectId.
    #[error("unexpected inserted id: {0}")]
    UnexpectedId(String),

    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    /// Any other driver failure (connectivity, server selection, query errors).
    #[error("database error: {0}")]
    Database(#[source] mongodb::error::Error),
}

impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        let code = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => Some((e.code, e.message.clone())),
            ErrorKind::Command(e) => Some((e.code, e.message.clone())),
            _ => None,
        };

        match code {
            Some((DUPLICATE_KEY, message)) => StorageError::DuplicateKey(message),
            Some((INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT, message)) => {
                StorageError::IndexConflict(message)
            }
            _ => StorageError::Database(err),
        }
    }
}
