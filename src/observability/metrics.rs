//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (created records, requests, latency)
//! - Expose a Prometheus-compatible text rendering for `/metrics`
//!
//! # Metrics
//! - `users_created_total` (counter): users inserted
//! - `cards_created_total` (counter): credit cards inserted
//! - `http_requests_total` (counter): requests by method, status
//! - `http_request_duration_seconds` (summary): latency by method
//!
//! # Design Decisions
//! - Handles are registered on a recorder owned by this struct; no global
//!   recorder is installed
//! - Low-overhead metric updates (atomic operations)

use std::time::Instant;

use metrics::{Counter, Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Recorder plus the long-lived counters of the service.
pub struct Metrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    users_created: Counter,
    cards_created: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let users_created =
            recorder.register_counter(&Key::from_static_name("users_created_total"), &METADATA);
        let cards_created =
            recorder.register_counter(&Key::from_static_name("cards_created_total"), &METADATA);

        Self {
            recorder,
            handle,
            users_created,
            cards_created,
        }
    }

    pub fn record_user_created(&self) {
        self.users_created.increment(1);
    }

    pub fn record_card_created(&self) {
        self.cards_created.increment(1);
    }

    /// Record a finished HTTP request.
    pub fn record_request(&self, method: &str, status: u16, started: Instant) {
        let requests = Key::from_parts(
            "http_requests_total",
            vec![
                Label::new("method", method.to_string()),
                Label::new("status", status.to_string()),
            ],
        );
        self.recorder.register_counter(&requests, &METADATA).increment(1);

        let latency = Key::from_parts(
            "http_request_duration_seconds",
            vec![Label::new("method", method.to_string())],
        );
        self.recorder
            .register_histogram(&latency, &METADATA)
            .record(started.elapsed().as_secs_f64());
    }

    /// Render every registered metric in the Prometheus exposition format.
    pub fn render(&self) -> String {
        self.handle.run_upkeep();
        self.handle.render()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
