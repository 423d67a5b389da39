//! Route table.

use axum::{routing::get, Router};

use crate::http::health;
use crate::state::AppState;
use crate::{budget, users};

/// Merge the service routes into `router`.
///
/// ```text
/// GET            /health
/// GET            /metrics                      (when enabled)
/// GET, POST      /api/v1/users
/// GET            /api/v1/users/login/{login}
/// GET, DELETE    /api/v1/users/{id}
/// GET, POST      /api/v1/users/{id}/cards
/// GET, POST      /api/v1/users/{id}/balance
/// ```
pub fn bind(router: Router<AppState>, metrics_enabled: bool) -> Router<AppState> {
    let router = router
        .route("/health", get(health::health))
        .nest("/api/v1/users", users::routes().merge(budget::routes()));

    if metrics_enabled {
        router.route("/metrics", get(health::metrics))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use mongodb::bson::{oid::ObjectId, Document};
    use tower::ServiceExt;

    use crate::storage::{DocumentCursor, DocumentStore, MemoryStore, StorageError};
    use crate::testing::{app_state, memory_state};

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_healthy_database() {
        let app = bind(Router::new(), true).with_state(memory_state());

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "database": "healthy" }));
    }

    struct DownStore(MemoryStore);

    #[async_trait]
    impl DocumentStore for DownStore {
        async fn find_one(&self, d: &str, c: &str, f: Document) -> Result<Document, StorageError> {
            self.0.find_one(d, c, f).await
        }
        async fn find_many(&self, d: &str, c: &str, f: Document) -> Result<DocumentCursor, StorageError> {
            self.0.find_many(d, c, f).await
        }
        async fn create_index(&self, d: &str, c: &str, k: Document) -> Result<(), StorageError> {
            self.0.create_index(d, c, k).await
        }
        async fn create_one(&self, d: &str, c: &str, doc: Document) -> Result<ObjectId, StorageError> {
            self.0.create_one(d, c, doc).await
        }
        async fn delete_one(&self, d: &str, c: &str, f: Document) -> Result<u64, StorageError> {
            self.0.delete_one(d, c, f).await
        }
        async fn ping(&self) -> Result<(), StorageError> {
            Err(StorageError::UnexpectedId("server selection failed".into()))
        }
    }

    #[tokio::test]
    async fn test_health_reports_unhealthy_with_details() {
        let state = app_state(Arc::new(DownStore(MemoryStore::new())));
        let app = bind(Router::new(), true).with_state(state);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["database"], "unhealthy");
        assert!(body["details"].as_str().unwrap().contains("server selection failed"));
    }

    #[tokio::test]
    async fn test_metrics_route_follows_flag() {
        let app = bind(Router::new(), false).with_state(memory_state());
        let response = app.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let app = bind(Router::new(), true).with_state(memory_state());
        let response = app.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_user_routes_are_nested() {
        let app = bind(Router::new(), true).with_state(memory_state());

        let response = app.clone().oneshot(get("/api/v1/users")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));

        let response = app.oneshot(get("/api/v1/users/not-hex")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
