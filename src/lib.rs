//! Budget tracker API library.

pub mod budget;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod state;
pub mod storage;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use config::AppConfig;
pub use error::AppError;
pub use http::{Server, ServerError, ShutdownReport};
pub use lifecycle::{Shutdown, ShutdownReason};
pub use state::AppState;
