//! Server lifecycle phases.
//!
//! # Responsibilities
//! - Name the phases a server goes through from configuration to exit
//! - Reject out-of-order transitions
//! - Let callers observe the current phase (tests, readiness checks)
//!
//! # Design Decisions
//! - Fail fast: any pre-listening failure goes straight to `Stopped`
//! - Listeners start last (traffic only when routes and tracing are ready)
//! - A listener failure while serving skips `Draining`

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

/// Phases of a [`Server`](crate::http::Server), in order.
///
/// ```text
/// Configured → RoutesBound → TracingInitialized → Listening → Draining → Stopped
///                                                     └──────── fatal ──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Configured,
    RoutesBound,
    TracingInitialized,
    Listening,
    Draining,
    Stopped,
}

impl LifecyclePhase {
    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::*;
        matches!(
            (self, next),
            (Configured, RoutesBound)
                | (RoutesBound, TracingInitialized)
                | (TracingInitialized, Listening)
                | (Listening, Draining)
                | (Draining, Stopped)
                | (Listening, Stopped)
                | (Configured | RoutesBound | TracingInitialized, Stopped)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal lifecycle transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: LifecyclePhase,
    pub to: LifecyclePhase,
}

/// Observable holder of the current [`LifecyclePhase`].
#[derive(Clone, Debug)]
pub struct PhaseTracker {
    tx: Arc<watch::Sender<LifecyclePhase>>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecyclePhase::Configured);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> LifecyclePhase {
        *self.tx.borrow()
    }

    /// Move to `next` if the transition is legal.
    pub fn advance(&self, next: LifecyclePhase) -> Result<(), TransitionError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|phase| {
            if phase.can_transition_to(next) {
                tracing::debug!(from = ?*phase, to = ?next, "Lifecycle transition");
                *phase = next;
                true
            } else {
                outcome = Err(TransitionError {
                    from: *phase,
                    to: next,
                });
                false
            }
        });
        outcome
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecyclePhase> {
        self.tx.subscribe()
    }

    /// Resolve once the tracker reaches `phase`. Returns `false` if it stopped first.
    pub async fn reached(&self, phase: LifecyclePhase) -> bool {
        let mut rx = self.subscribe();
        let reached = match rx
            .wait_for(|current| *current == phase || *current == LifecyclePhase::Stopped)
            .await
        {
            Ok(current) => *current == phase,
            Err(_) => false,
        };
        reached
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecyclePhase::*;

    #[test]
    fn test_happy_path_is_accepted() {
        let tracker = PhaseTracker::new();
        for phase in [RoutesBound, TracingInitialized, Listening, Draining, Stopped] {
            tracker.advance(phase).unwrap();
            assert_eq!(tracker.current(), phase);
        }
    }

    #[test]
    fn test_skipping_phases_is_rejected() {
        let tracker = PhaseTracker::new();
        assert_eq!(
            tracker.advance(Listening),
            Err(TransitionError { from: Configured, to: Listening })
        );
        assert_eq!(tracker.current(), Configured);
    }

    #[test]
    fn test_failure_edges() {
        assert!(Listening.can_transition_to(Stopped));
        assert!(Configured.can_transition_to(Stopped));
        assert!(TracingInitialized.can_transition_to(Stopped));
        assert!(!Stopped.can_transition_to(Listening));
        assert!(!Draining.can_transition_to(Listening));
    }

    #[tokio::test]
    async fn test_reached_resolves_on_target_or_stop() {
        let tracker = PhaseTracker::new();
        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.reached(Listening).await })
        };
        tracker.advance(RoutesBound).unwrap();
        tracker.advance(Stopped).unwrap();
        assert!(!waiter.await.unwrap());

        let tracker = PhaseTracker::new();
        tracker.advance(RoutesBound).unwrap();
        tracker.advance(TracingInitialized).unwrap();
        tracker.advance(Listening).unwrap();
        assert!(tracker.reached(Listening).await);
    }
}
