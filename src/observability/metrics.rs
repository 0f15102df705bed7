//! Metrics collection and exposition.
//!
//! # Metrics
//! - `static_requests_total` (counter): requests by method and status
//! - `static_request_duration_seconds` (histogram): time to response headers
//! - `static_variant_decisions_total` (counter): per-candidate outcome by encoding
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and costs nothing until an
//!   exporter is installed
//! - The Prometheus exporter serves its own scrape endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::encoding::Encoding;
use crate::serve::VariantCheck;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("static_requests_total", &labels).increment(1);
    metrics::histogram!("static_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record how one negotiation candidate was judged.
pub fn record_variant_decision(encoding: &Encoding, check: VariantCheck) {
    metrics::counter!(
        "static_variant_decisions_total",
        "encoding" => encoding.token,
        "outcome" => check.as_str()
    )
    .increment(1);
}
