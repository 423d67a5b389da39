//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (one span per request, tagged with the request id)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape of GET /metrics)
//! ```
//!
//! # Design Decisions
//! - One `Observability` value is built at startup and handed to the server
//!   and the domain layers; nothing is registered in process-wide statics
//!   apart from the log subscriber
//! - Request ID flows through all subsystems
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod tracing;

use std::sync::Arc;

use crate::config::ObservabilityConfig;

pub use self::metrics::Metrics;

/// Handles shared by everything that reports on the service.
pub struct Observability {
    service_name: Arc<str>,
    metrics_enabled: bool,
    metrics: Metrics,
}

impl Observability {
    pub fn new(config: &ObservabilityConfig) -> Self {
        Self {
            service_name: Arc::from(config.service_name.as_str()),
            metrics_enabled: config.metrics_enabled,
            metrics: Metrics::new(),
        }
    }

    pub fn service_name(&self) -> &Arc<str> {
        &self.service_name
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl std::fmt::Debug for Observability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observability")
            .field("service_name", &self.service_name)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish_non_exhaustive()
    }
}
