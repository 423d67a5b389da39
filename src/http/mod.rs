//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, lifecycle, drain)
//!     → request.rs (add/propagate request ID)
//!     → middleware/ (request metrics)
//!     → routes.rs (health, metrics, /api/v1/users/...)
//!     → response.rs (domain error → status + JSON body)
//!     → Send to client
//! ```

pub mod health;
pub mod middleware;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{Server, ServerError, ShutdownReport};
