//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection (axum-server acceptor)
//!     → tls.rs (optional TLS handshake, ALPN selection)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and selected explicitly at startup
//! - Certificate problems are startup errors, never silent fallbacks to plain HTTP

pub mod tls;

pub use tls::{load_tls_config, offers_http2, TlsError};
