//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method and status
//! - `rate_limited_total` (counter): requests rejected by the rate limiter
//! - `jobs_scraped_total` (counter): jobs inserted, by source
//! - `digests_sent_total` (counter): email digests delivered

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure is logged and otherwise ignored; the service runs fine without
/// a metrics endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("rate_limited_total").increment(1);
}

pub fn record_jobs_scraped(source: &str, count: u64) {
    metrics::counter!("jobs_scraped_total", "source" => source.to_string()).increment(count);
}

pub fn record_digest_sent() {
    metrics::counter!("digests_sent_total").increment(1);
}
