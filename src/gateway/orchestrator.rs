//! Request orchestration: the single externally visible operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::CacheStore;
use crate::config::GatewayConfig;
use crate::downstream::{DownstreamClient, DownstreamError};
use crate::gateway::cache_aside::CacheAsideReader;
use crate::gateway::error::GatewayError;
use crate::gateway::fallback::FallbackRouter;
use crate::gateway::outcome::Outcome;
use crate::observability::{metrics, GatewayMetrics};
use crate::resilience::CircuitBreaker;

/// Composes the cache-aside reader, breaker and fallback router.
pub struct RequestOrchestrator<S> {
    reader: CacheAsideReader<S>,
    fallback: FallbackRouter,
    breaker: Arc<CircuitBreaker>,
    cache_key: String,
    metrics: GatewayMetrics,
}

impl<S> RequestOrchestrator<S>
where
    S: CacheStore + 'static,
{
    pub fn new(
        config: &GatewayConfig,
        store: Arc<S>,
        metrics: GatewayMetrics,
    ) -> Result<Self, DownstreamError> {
        let primary = DownstreamClient::new("service-b", &config.primary)?;
        let secondary = DownstreamClient::new("service-c", &config.secondary)?;
        let breaker = Arc::new(CircuitBreaker::from_config("service-b", &config.circuit_breaker));

        let reader = CacheAsideReader::new(
            store,
            Arc::clone(&breaker),
            primary,
            Duration::from_secs(config.cache.ttl_secs),
            metrics.clone(),
        );
        let fallback = FallbackRouter::new(secondary, metrics.clone());

        Ok(Self {
            reader,
            fallback,
            breaker,
            cache_key: config.cache.key.clone(),
            metrics,
        })
    }

    /// Serve one request. `Err` is only ever an unexpected internal error;
    /// both-dependencies-down is `Ok(Outcome::TotalFailure(..))`.
    pub async fn handle(&self) -> Result<Outcome, GatewayError> {
        let start_time = Instant::now();

        let result = match self.reader.read(&self.cache_key).await {
            Ok(outcome) => Ok(outcome),
            Err(cause) if cause.routes_to_fallback() => Ok(self.fallback.route(&cause).await),
            Err(other) => Err(other),
        };

        let label = match &result {
            Ok(outcome) => outcome.label(),
            Err(_) => "internal_error",
        };
        metrics::record_request(label, start_time);
        result
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }
}
