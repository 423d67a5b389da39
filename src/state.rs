//! Shared application state.

use std::sync::Arc;

use crate::observability::Observability;
use crate::storage::DocumentStore;

/// Everything a handler or domain operation needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub database: Arc<str>,
    pub observability: Arc<Observability>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        database: impl Into<Arc<str>>,
        observability: Arc<Observability>,
    ) -> Self {
        Self {
            store,
            database: database.into(),
            observability,
        }
    }
}
