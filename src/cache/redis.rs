//! Redis cache store.
//!
//! Uses `redis::aio::ConnectionManager` for async multiplexed connections
//! with automatic reconnection. Every command runs under the configured
//! operation timeout.

use std::time::Duration;

use crate::cache::store::{CacheError, CacheResult, CacheStore};
use crate::config::CacheConfig;
use crate::resilience::with_timeout;

#[derive(Clone)]
pub struct RedisCacheStore {
    connection_manager: redis::aio::ConnectionManager,
    operation_timeout: Duration,
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("connection_manager", &"ConnectionManager")
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl RedisCacheStore {
    /// Connect to the configured host/port. Fails if the server is unreachable.
    pub async fn connect(config: &CacheConfig) -> CacheResult<Self> {
        let url = config.redis_url();
        let operation_timeout = Duration::from_millis(config.operation_timeout_ms);

        let client = redis::Client::open(url.as_str()).map_err(|e| {
            CacheError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let connection_manager = with_timeout(
            "redis connect",
            operation_timeout.max(Duration::from_secs(2)),
            redis::aio::ConnectionManager::new(client),
        )
        .await
        .map_err(|e| CacheError::Connection(e.to_string()))?
        .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!(
            component = "redis",
            host = %config.host,
            port = config.port,
            "Redis cache store connected"
        );

        Ok(Self {
            connection_manager,
            operation_timeout,
        })
    }

    async fn run<T>(&self, operation: &'static str, cmd: redis::Cmd) -> CacheResult<T>
    where
        T: redis::FromRedisValue,
    {
        let mut conn = self.connection_manager.clone();
        let reply: redis::RedisResult<T> =
            with_timeout(operation, self.operation_timeout, cmd.query_async(&mut conn))
                .await
                .map_err(|e| CacheError::Timeout(e.to_string()))?;

        reply.map_err(|e| {
            if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
                CacheError::Connection(format!("{} failed: {}", operation, e))
            } else {
                CacheError::Backend(format!("{} failed: {}", operation, e))
            }
        })
    }
}

impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        let value: Option<String> = self.run("redis GET", cmd).await?;

        tracing::debug!(key, hit = value.is_some(), "Redis GET");
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let ttl_seconds = ttl.as_secs().max(1);
        let mut cmd = redis::cmd("SETEX");
        cmd.arg(key).arg(ttl_seconds).arg(value);
        let _: () = self.run("redis SETEX", cmd).await?;

        tracing::debug!(key, ttl_seconds, "Redis SETEX");
        Ok(())
    }

    async fn ping(&self) -> CacheResult<bool> {
        let pong: String = self.run("redis PING", redis::cmd("PING")).await?;
        Ok(pong == "PONG")
    }

    fn provider_name(&self) -> &'static str {
        "redis"
    }
}
