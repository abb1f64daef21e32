//! Metrics collection and exposition.
//!
//! # Metrics
//! - `whatsmyip_requests_total` (counter): requests by method, status
//! - `whatsmyip_request_duration_seconds` (histogram): latency distribution
//! - `whatsmyip_whois_lookups_total` (counter): lookups by outcome
//!   (private, cache_hit, fetched, error)
//! - `whatsmyip_whois_cache_entries` (gauge): stored cache entries
//!
//! Recording is a no-op until a recorder is installed.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "whatsmyip_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("whatsmyip_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_whois_lookup(outcome: &'static str) {
    counter!("whatsmyip_whois_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("whatsmyip_whois_cache_entries").set(entries as f64);
}
