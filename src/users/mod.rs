//! User records.
//!
//! # Data Flow
//! ```text
//! handlers.rs (axum extractors, status codes)
//!     → service.rs (validation, hashing, span per operation)
//!     → DocumentStore (`users` collection, unique index on login)
//! ```

pub mod handlers;
pub mod model;
pub mod password;
pub mod service;

use axum::{routing::get, Router};

use crate::state::AppState;

pub use model::{NewUser, SanitizedUser, User, UserResponse};
pub use service::{create_user, delete_user, get_user, get_user_by_login, get_users};

/// Routes mounted under `/api/v1/users`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/login/{login}", get(handlers::get_user_by_login))
        .route("/{id}", get(handlers::get_user).delete(handlers::delete_user))
}
