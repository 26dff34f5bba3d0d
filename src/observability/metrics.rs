//! Metrics collection and exposition.
//!
//! # Metrics
//! - `servant_requests_total` (counter): dispatched requests by handler, status
//! - `servant_request_duration_seconds` (histogram): dispatch latency by handler
//!
//! Requests that match no handler are labelled `handler="none"`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Label used when no handler was selected.
pub const NO_HANDLER: &str = "none";

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one dispatched request.
pub fn record_dispatch(handler: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "servant_requests_total",
        "handler" => handler.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "servant_request_duration_seconds",
        "handler" => handler.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
