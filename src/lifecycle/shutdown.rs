//! Shutdown coordination for the service.
//!
//! A [`Shutdown`] is cloned into every party that may end the process (the
//! signal listener, tests, `main`) and into the server, which waits on it.
//! The first trigger wins and is latched: late subscribers still observe it.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// What ended the serving phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Hangup,
    Interrupt,
    Terminate,
    Quit,
    /// Triggered programmatically rather than by the OS.
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownReason::Hangup => "SIGHUP",
            ShutdownReason::Interrupt => "SIGINT",
            ShutdownReason::Terminate => "SIGTERM",
            ShutdownReason::Quit => "SIGQUIT",
            ShutdownReason::Requested => "requested",
        };
        f.write_str(name)
    }
}

/// Coordinator for graceful shutdown.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the shutdown. Returns `false` if it had already been triggered.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let first = self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
        if first {
            tracing::info!(%reason, "Shutdown triggered");
        }
        first
    }

    /// The reason of the first trigger, if any.
    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.tx.borrow()
    }

    /// Resolve once the shutdown has been triggered.
    pub async fn wait(&self) -> ShutdownReason {
        let mut rx = self.tx.subscribe();
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(reason) => reason.unwrap_or(ShutdownReason::Requested),
            // The sender lives as long as `self`.
            Err(_) => ShutdownReason::Requested,
        };
        reason
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shutdown")
            .field("reason", &self.reason())
            .finish()
    }
}
