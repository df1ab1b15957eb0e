//! Metrics collection and exposition.
//!
//! # Metrics
//! - `circuit_breaker_activations` (counter): requests routed to the fallback
//! - `redis_cache_hits` (counter): requests answered from the cache
//! - `gateway_requests_total` (counter): requests by outcome
//! - `gateway_request_duration_seconds` (histogram): orchestration latency
//!
//! # Design Decisions
//! - Counters go through the `metrics` facade; the Prometheus exporter is optional
//! - The two core counters keep process-local atomic mirrors readable in-process

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

pub const BREAKER_ACTIVATIONS: &str = "circuit_breaker_activations";
pub const CACHE_HITS: &str = "redis_cache_hits";
pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION: &str = "gateway_request_duration_seconds";

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_metrics();
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn describe_metrics() {
    describe_counter!(BREAKER_ACTIVATIONS, "Times the circuit breaker routed a request to the fallback");
    describe_counter!(CACHE_HITS, "Times a request was answered from the cache");
    describe_counter!(REQUESTS_TOTAL, "Orchestrated requests by outcome");
    describe_histogram!(REQUEST_DURATION, "Time spent orchestrating a request");
}

/// Record one orchestrated request.
pub fn record_request(outcome: &'static str, start_time: Instant) {
    counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(REQUEST_DURATION, "outcome" => outcome).record(start_time.elapsed().as_secs_f64());
}

/// Handle to the gateway's two core counters.
#[derive(Debug, Clone, Default)]
pub struct GatewayMetrics {
    breaker_activations: Arc<AtomicU64>,
    cache_hits: Arc<AtomicU64>,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_breaker_activation(&self) {
        self.breaker_activations.fetch_add(1, Ordering::Relaxed);
        counter!(BREAKER_ACTIVATIONS).increment(1);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_HITS).increment(1);
    }

    pub fn breaker_activations(&self) -> u64 {
        self.breaker_activations.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = GatewayMetrics::new();
        let handle = metrics.clone();

        handle.record_breaker_activation();
        handle.record_cache_hit();
        handle.record_cache_hit();

        assert_eq!(metrics.breaker_activations(), 1);
        assert_eq!(metrics.cache_hits(), 2);
    }
}
