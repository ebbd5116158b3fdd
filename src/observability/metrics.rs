//! Metrics collection and exposition.
//!
//! # Metrics
//! - `iiif_requests_total` (counter): requests by method, status, outcome
//! - `iiif_request_duration_seconds` (histogram): latency by outcome
//! - `iiif_rejections_total` (counter): engine rejections by segment and class
//! - `iiif_upstream_failures_total` (counter): transport failures by call
//!
//! # Design Decisions
//! - Low-overhead metric updates through the `metrics` facade
//! - Labels stay low-cardinality: never the path or identifier
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::iiif::IiifError;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Label for a request method. Anything but GET and HEAD is folded into
/// `other` so arbitrary tokens cannot create new series.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        _ => "other",
    }
}

/// Record one finished request.
pub fn record_request(method: &Method, status: u16, outcome: &'static str, start: Instant) {
    counter!(
        "iiif_requests_total",
        "method" => method_label(method),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!("iiif_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record an engine rejection. Non-segment rejections use `segment="none"`.
pub fn record_rejection(error: &IiifError) {
    let segment = match error {
        IiifError::Unsupported { segment, .. } | IiifError::Invalid { segment, .. } => segment.as_str(),
        _ => "none",
    };

    counter!(
        "iiif_rejections_total",
        "segment" => segment,
        "tier" => error.class().as_str()
    )
    .increment(1);
}

/// Record an upstream transport failure; `call` is `image` or `metadata`.
pub fn record_upstream_failure(call: &'static str) {
    counter!("iiif_upstream_failures_total", "call" => call).increment(1);
}
