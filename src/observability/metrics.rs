//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_requests_total` (counter): requests by method, status, backend
//! - `lb_request_duration_seconds` (histogram): end-to-end latency
//! - `lb_backend_active_requests` (gauge): in-flight requests per backend
//! - `lb_backend_selections_total` (counter): selector decisions per backend
//!
//! Without an installed recorder every call here is a no-op, so tests and
//! library users pay nothing unless `init_metrics` ran.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("backend", backend.to_string()),
    ];
    counter!("lb_requests_total", &labels).increment(1);
    histogram!("lb_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_active(backend: &str, active: usize) {
    gauge!("lb_backend_active_requests", "backend" => backend.to_string()).set(active as f64);
}

pub fn record_selection(backend: &str) {
    counter!("lb_backend_selections_total", "backend" => backend.to_string()).increment(1);
}
