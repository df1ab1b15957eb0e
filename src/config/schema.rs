//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, request deadline).
    pub listener: ListenerConfig,

    /// Primary dependency ("service B"), guarded by the breaker and cache.
    pub primary: DownstreamConfig,

    /// Secondary dependency ("service C"), used as the fallback route.
    pub secondary: DownstreamConfig,

    /// Cache store settings.
    pub cache: CacheConfig,

    /// Circuit breaker thresholds.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            primary: DownstreamConfig::new("http://service-b:8000/"),
            secondary: DownstreamConfig::new("http://service-c:8000/"),
            cache: CacheConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Overall deadline for a single inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// A downstream HTTP dependency.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownstreamConfig {
    /// Base URL requested with GET.
    pub url: String,

    /// Per-call timeout in milliseconds.
    #[serde(default = "default_downstream_timeout_ms")]
    pub timeout_ms: u64,
}

impl DownstreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: default_downstream_timeout_ms(),
        }
    }
}

fn default_downstream_timeout_ms() -> u64 {
    2000
}

/// Which cache store backs the cache-aside path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheProviderKind {
    Redis,
    Memory,
}

/// Cache store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub provider: CacheProviderKind,

    pub host: String,

    pub port: u16,

    /// Key under which the primary response is cached.
    pub key: String,

    /// Entry lifetime in seconds.
    pub ttl_secs: u64,

    /// Deadline for a single cache command, in milliseconds.
    pub operation_timeout_ms: u64,

    /// Interval between liveness probes, in seconds.
    pub liveness_interval_secs: u64,
}

impl CacheConfig {
    /// Connection URL for the Redis provider.
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheProviderKind::Redis,
            host: "redis".to_string(),
            port: 6379,
            key: "service_b_response".to_string(),
            ttl_secs: 20,
            operation_timeout_ms: 500,
            liveness_interval_secs: 10,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that trip the breaker.
    pub failure_threshold: u32,

    /// Seconds the breaker stays open before admitting a trial call.
    pub reset_timeout_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
