//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Configured → RoutesBound → TracingInitialized → Listening
//!
//! Shutdown (shutdown.rs):
//!     Trigger received → Draining (bounded window) → Stopped
//!
//! Signals (signals.rs):
//!     SIGHUP/SIGINT/SIGTERM/SIGQUIT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes and tracing, then listeners
//! - Ordered shutdown: stop accept, drain, close
//! - Shutdown has timeout: forced close after the drain window

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownReason};
pub use startup::{LifecyclePhase, PhaseTracker, TransitionError};
