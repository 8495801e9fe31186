//! Metrics collection and exposition.
//!
//! # Metrics
//! - `key_requests_total` (counter): requests by method, status
//! - `key_request_duration_seconds` (histogram): handler latency by method
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request on the key route.
pub fn record_request(method: &'static str, status: u16, start_time: Instant) {
    metrics::counter!(
        "key_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("key_request_duration_seconds", "method" => method)
        .record(start_time.elapsed().as_secs_f64());
}
