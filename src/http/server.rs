//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Merge the service routes into the caller's Axum Router
//! - Wire up middleware (tracing, request ID, timeout, metrics)
//! - Bind the listener, plain or TLS, on a background task
//! - Wait for a shutdown trigger or a listener failure
//! - Drain in-flight requests within a bounded window
//!
//! # Design Decisions
//! - Every step is a [`LifecyclePhase`] transition, observable via [`Server::phases`]
//! - The listener is bound before the serving task is spawned, so bind errors
//!   are returned from `start` instead of surfacing in a detached task
//! - The drain window is enforced here rather than inside axum-server so that
//!   an expired window is reported as [`ServerError::DrainTimeout`]

use std::io;
use std::net::{AddrParseError, SocketAddr};
use std::time::{Duration, Instant};

use axum::{middleware, Router};
use axum_server::Handle;
use thiserror::Error;
use tokio::task::JoinHandle;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::http::middleware::track_metrics;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::routes;
use crate::lifecycle::{LifecyclePhase, PhaseTracker, Shutdown, ShutdownReason, TransitionError};
use crate::net::{load_tls_config, offers_http2, TlsError};
use crate::observability::tracing::trace_layer;
use crate::state::AppState;

/// Fatal server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("TLS requested but [server.tls] is not configured")]
    TlsNotConfigured,

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("listener failed: {0}")]
    Serve(#[source] io::Error),

    #[error("listener exited before shutdown was requested")]
    ListenerExited,

    #[error("{in_flight} connection(s) still open after the {timeout:?} drain window")]
    DrainTimeout { in_flight: usize, timeout: Duration },

    #[error(transparent)]
    Lifecycle(#[from] TransitionError),
}

/// Outcome of a clean shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub reason: ShutdownReason,
    pub drained_in: Duration,
}

/// HTTP server for the budget tracker API.
pub struct Server {
    config: ServerConfig,
    router: Router<AppState>,
    state: AppState,
    phases: PhaseTracker,
    handle: Handle,
}

impl Server {
    /// Create a server around a caller-supplied router. Nothing is bound yet.
    pub fn new(config: ServerConfig, router: Router<AppState>, state: AppState) -> Self {
        Self {
            config,
            router,
            state,
            phases: PhaseTracker::new(),
            handle: Handle::new(),
        }
    }

    /// Observe the lifecycle phase, before and during `start`.
    pub fn phases(&self) -> PhaseTracker {
        self.phases.clone()
    }

    /// Handle to the listener; `listening().await` yields the bound address.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Run until `shutdown` is triggered or the listener fails.
    ///
    /// Returns once the server reached [`LifecyclePhase::Stopped`].
    pub async fn start(
        self,
        serve_tls: bool,
        shutdown: Shutdown,
    ) -> Result<ShutdownReport, ServerError> {
        let phases = self.phases.clone();
        let outcome = self.run(serve_tls, shutdown).await;

        if phases.current() != LifecyclePhase::Stopped {
            phases.advance(LifecyclePhase::Stopped)?;
        }
        match &outcome {
            Ok(report) => tracing::info!(
                reason = %report.reason,
                drained_ms = report.drained_in.as_millis() as u64,
                "HTTP server stopped"
            ),
            Err(e) => tracing::error!(error = %e, "HTTP server stopped with error"),
        }
        outcome
    }

    async fn run(self, serve_tls: bool, shutdown: Shutdown) -> Result<ShutdownReport, ServerError> {
        let Server {
            config,
            router,
            state,
            phases,
            handle,
        } = self;
        let observability = state.observability.clone();

        let app = routes::bind(router, observability.metrics_enabled());
        phases.advance(LifecyclePhase::RoutesBound)?;

        #[allow(deprecated)]
        let app = app
            .layer(middleware::from_fn_with_state(state.clone(), track_metrics))
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(propagate_request_id_layer())
            .layer(trace_layer(observability.service_name().clone()))
            .layer(set_request_id_layer())
            .with_state(state);
        phases.advance(LifecyclePhase::TracingInitialized)?;

        let tls = if serve_tls {
            let tls_config = config.tls.as_ref().ok_or(ServerError::TlsNotConfigured)?;
            Some((load_tls_config(tls_config).await?, offers_http2(tls_config)))
        } else {
            None
        };

        let listener = bind(&config.bind_address)?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

        let service = app.into_make_service();
        let mut serving: JoinHandle<io::Result<()>> = match tls {
            Some((rustls, http2)) => {
                tracing::info!(address = %local_addr, tls = true, http2, "HTTP server starting");
                tokio::spawn(
                    axum_server::from_tcp_rustls(listener, rustls)
                        .handle(handle.clone())
                        .serve(service),
                )
            }
            None => {
                tracing::info!(address = %local_addr, tls = false, "HTTP server starting");
                tokio::spawn(
                    axum_server::from_tcp(listener)
                        .handle(handle.clone())
                        .serve(service),
                )
            }
        };
        phases.advance(LifecyclePhase::Listening)?;

        let reason = tokio::select! {
            reason = shutdown.wait() => reason,
            exited = &mut serving => {
                return Err(match exited {
                    Ok(Ok(())) => ServerError::ListenerExited,
                    Ok(Err(e)) => ServerError::Serve(e),
                    Err(e) => ServerError::Serve(io::Error::other(e)),
                });
            }
        };

        phases.advance(LifecyclePhase::Draining)?;
        let window = config.shutdown_timeout();
        tracing::info!(
            %reason,
            in_flight = handle.connection_count(),
            window_secs = window.as_secs(),
            "Draining connections"
        );

        let started = Instant::now();
        handle.graceful_shutdown(None);

        match tokio::time::timeout(window, &mut serving).await {
            Ok(Ok(Ok(()))) => {
                phases.advance(LifecyclePhase::Stopped)?;
                Ok(ShutdownReport {
                    reason,
                    drained_in: started.elapsed(),
                })
            }
            Ok(Ok(Err(e))) => Err(ServerError::Serve(e)),
            Ok(Err(e)) => Err(ServerError::Serve(io::Error::other(e))),
            Err(_) => {
                let in_flight = handle.connection_count();
                tracing::warn!(in_flight, "Drain window elapsed, closing connections");
                handle.shutdown();
                serving.abort();
                Err(ServerError::DrainTimeout {
                    in_flight,
                    timeout: window,
                })
            }
        }
    }
}

fn bind(address: &str) -> Result<std::net::TcpListener, ServerError> {
    let addr: SocketAddr = address.parse().map_err(|source| ServerError::InvalidAddress {
        address: address.to_string(),
        source,
    })?;
    let to_bind_error = |source| ServerError::Bind {
        address: address.to_string(),
        source,
    };

    let listener = std::net::TcpListener::bind(addr).map_err(to_bind_error)?;
    listener.set_nonblocking(true).map_err(to_bind_error)?;
    Ok(listener)
}
