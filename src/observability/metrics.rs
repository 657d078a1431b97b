//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_requests_total` (counter): calls by provider and outcome
//! - `balancer_fallbacks_total` (counter): fallback hops by direction
//! - `balancer_preference` (gauge): current routing preference
//!
//! Without an installed recorder every call here is a no-op.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of a single provider call.
pub fn record_request(provider: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "balancer_requests_total",
        "provider" => provider.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a fallback hop from one provider to the other.
pub fn record_fallback(from: &str, to: &str) {
    metrics::counter!(
        "balancer_fallbacks_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record the current routing preference.
pub fn record_preference(preference: f64) {
    metrics::gauge!("balancer_preference").set(preference);
}
