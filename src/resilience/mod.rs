//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Storage call from a domain operation:
//!     → timeouts.rs (enforce query/ping deadline)
//!     → backend store
//!     → on expiry: StorageError::Timeout surfaced to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every storage call except index builds has a deadline
//! - No retries: failures are surfaced verbatim

pub mod timeouts;

pub use timeouts::TimeoutStore;
