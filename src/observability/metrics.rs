//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (request count, latency)
//! - Expose a Prometheus-compatible scrape endpoint when enabled
//!
//! # Metrics
//! - `students_api_requests_total` (counter): requests by method, route, status
//! - `students_api_request_duration_seconds` (histogram): latency by method, route
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Routes are labelled by template (`/api/students/{id}`), not raw path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to start metrics exporter on {address}: {source}")]
pub struct MetricsError {
    address: SocketAddr,
    #[source]
    source: BuildError,
}

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(address: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(address)
        .install()
        .map_err(|source| MetricsError { address, source })?;

    tracing::info!(address = %address, "Metrics exporter listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, route: &str, status: u16, start_time: Instant) {
    let elapsed = start_time.elapsed().as_secs_f64();

    counter!(
        "students_api_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);

    histogram!(
        "students_api_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .record(elapsed);
}
