//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGHUP, SIGINT, SIGTERM and SIGQUIT
//! - Translate the first delivered signal into a [`Shutdown`] trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are registered before the listener task is spawned, so a
//!   registration failure is a startup error rather than a silent no-op
//! - Every one of the four signals drains the server; SIGHUP does not reload

use std::io;

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::{Shutdown, ShutdownReason};

/// Register the handlers and spawn a task that triggers `shutdown` on the
/// first signal.
#[cfg(unix)]
pub fn listen(shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    Ok(tokio::spawn(async move {
        let reason = tokio::select! {
            _ = hangup.recv() => ShutdownReason::Hangup,
            _ = interrupt.recv() => ShutdownReason::Interrupt,
            _ = terminate.recv() => ShutdownReason::Terminate,
            _ = quit.recv() => ShutdownReason::Quit,
        };
        tracing::info!(signal = %reason, "Received signal");
        shutdown.trigger(reason);
    }))
}

#[cfg(not(unix))]
pub fn listen(shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C signal");
                shutdown.trigger(ShutdownReason::Interrupt);
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
        }
    }))
}
