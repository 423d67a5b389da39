//! Request spans.
//!
//! # Responsibilities
//! - Open one span per HTTP request tagged with the service name
//! - Record the response status on the span and log the outcome
//!
//! # Design Decisions
//! - Server errors log at `error`, everything else at `info`
//! - The request id header set upstream is recorded on the span so log
//!   lines can be correlated with responses

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::{field, Span};

use crate::http::request::RequestIdExt;

/// Creates the `http_request` span.
#[derive(Clone, Debug)]
pub struct ServiceSpan {
    service: Arc<str>,
}

impl ServiceSpan {
    pub fn new(service: impl Into<Arc<str>>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl<B> MakeSpan<B> for ServiceSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request.request_id().unwrap_or("-");

        tracing::info_span!(
            "http_request",
            service = %self.service,
            method = %request.method(),
            uri = %request.uri(),
            request_id,
            status = field::Empty,
        )
    }
}

/// Logs the response status once the handler completes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogStatus;

impl<B> OnResponse<B> for LogStatus {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        span.record("status", field::display(status));
        let latency_ms = latency.as_millis() as u64;
        if status.is_server_error() {
            tracing::error!(%status, latency_ms, "response");
        } else {
            tracing::info!(%status, latency_ms, "response");
        }
    }
}

pub type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, ServiceSpan, DefaultOnRequest, LogStatus>;

/// Trace layer for the service router.
pub fn trace_layer(service: impl Into<Arc<str>>) -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(ServiceSpan::new(service))
        .on_response(LogStatus)
}
