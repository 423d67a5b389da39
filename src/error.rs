//! Errors returned by the domain record operations.
//!
//! Validation failures (`EmptyPassword`, `InvalidId`) are raised before any
//! storage call. Storage failures keep their [`StorageError`] cause so the
//! HTTP layer can tell a duplicate key or timeout apart from the rest.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("empty password input")]
    EmptyPassword,

    #[error("invalid object id {0:?}")]
    InvalidId(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Validation errors are the caller's fault and carry no storage cause.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyPassword | AppError::InvalidId(_))
    }

    /// Map a storage miss to a typed `NotFound` for `entity`.
    pub(crate) fn not_found_as(entity: &'static str) -> impl FnOnce(StorageError) -> AppError {
        move |err| match err {
            StorageError::NotFound => AppError::NotFound(entity),
            other => AppError::Storage(other),
        }
    }
}
