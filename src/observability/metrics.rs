//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed calls by method and outcome,
//!   where outcome is the upstream status code or the relay error kind
//! - `relay_request_duration_seconds` (histogram): whole-call latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener. Failure to
/// install is logged; the relay then runs without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one relay call.
pub fn record_send(method: &str, outcome: &str, started: Instant) {
    let method = method.to_ascii_uppercase();
    counter!(
        "relay_requests_total",
        "method" => method.clone(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds", "method" => method)
        .record(started.elapsed().as_secs_f64());
}
