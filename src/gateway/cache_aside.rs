//! Cache-aside read path in front of the primary dependency.
//!
//! # Flow
//! ```text
//! GET key ── hit ──▶ CacheHit(value)
//!    │
//!   miss
//!    ▼
//! breaker → primary ── ok ──▶ PrimarySuccess(body), SETEX spawned in background
//!    │
//!  failure (open, transport, timeout, status >= 500)
//!    ▼
//! Err(..) handed to the fallback router
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cache::CacheStore;
use crate::downstream::DownstreamClient;
use crate::gateway::error::GatewayError;
use crate::gateway::outcome::Outcome;
use crate::observability::GatewayMetrics;
use crate::resilience::CircuitBreaker;

pub struct CacheAsideReader<S> {
    store: Arc<S>,
    breaker: Arc<CircuitBreaker>,
    primary: DownstreamClient,
    ttl: Duration,
    metrics: GatewayMetrics,
}

impl<S> CacheAsideReader<S>
where
    S: CacheStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        breaker: Arc<CircuitBreaker>,
        primary: DownstreamClient,
        ttl: Duration,
        metrics: GatewayMetrics,
    ) -> Self {
        Self {
            store,
            breaker,
            primary,
            ttl,
            metrics,
        }
    }

    /// Read `key` through the cache. Primary failures come back as `Err` for fallback routing;
    /// a failed lookup is an unexpected internal error.
    pub async fn read(&self, key: &str) -> Result<Outcome, GatewayError> {
        tracing::info!(component = "cache", "Checking if response is cached...");
        let cached = self
            .store
            .get(key)
            .await
            .map_err(|e| GatewayError::UnexpectedInternal(e.to_string()))?;

        // An empty cached value counts as a miss.
        if let Some(value) = cached.filter(|v| !v.is_empty()) {
            tracing::info!(
                component = "cache",
                status_code = 200,
                "Cached response retrieved: {}",
                value
            );
            self.metrics.record_cache_hit();
            return Ok(Outcome::CacheHit(value));
        }

        tracing::info!(component = "service", "Requesting Service B...");
        let response = self
            .breaker
            .call(|| self.primary.fetch_classified())
            .await?;

        self.store_in_background(key, &response.body);
        Ok(Outcome::PrimarySuccess(response.body))
    }

    /// Best-effort SETEX. The response path never waits on it.
    pub(crate) fn store_in_background(&self, key: &str, value: &str) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let key = key.to_string();
        let value = value.to_string();
        let ttl = self.ttl;

        tokio::spawn(async move {
            match store.set_with_ttl(&key, &value, ttl).await {
                Ok(()) => tracing::info!(
                    component = "cache",
                    status_code = 200,
                    "Response from B cached for {} seconds.",
                    ttl.as_secs()
                ),
                Err(e) => {
                    let error = GatewayError::CacheWrite(e.to_string());
                    tracing::error!(component = "cache", status_code = 500, "{}", error);
                }
            }
        })
    }
}
