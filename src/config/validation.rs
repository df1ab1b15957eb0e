//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate downstream URLs and value ranges (timeouts > 0, port valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use url::Url;

use crate::config::schema::{DownstreamConfig, GatewayConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    validate_downstream("primary.url", "primary.timeout_ms", &config.primary, &mut errors);
    validate_downstream("secondary.url", "secondary.timeout_ms", &config.secondary, &mut errors);

    // Worst case per request: cache GET, then primary, then secondary.
    let chain_ms = config
        .cache
        .operation_timeout_ms
        .saturating_add(config.primary.timeout_ms)
        .saturating_add(config.secondary.timeout_ms);
    if config.listener.request_timeout_secs > 0
        && config.listener.request_timeout_secs.saturating_mul(1000) < chain_ms
    {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!("must cover cache + primary + secondary timeouts ({} ms)", chain_ms),
        ));
    }

    let cache = &config.cache;
    if cache.host.trim().is_empty() {
        errors.push(ValidationError::new("cache.host", "must not be empty"));
    }
    if cache.port == 0 {
        errors.push(ValidationError::new("cache.port", "must be > 0"));
    }
    if cache.key.is_empty() {
        errors.push(ValidationError::new("cache.key", "must not be empty"));
    }
    if cache.ttl_secs == 0 {
        errors.push(ValidationError::new("cache.ttl_secs", "must be > 0"));
    }
    if cache.operation_timeout_ms == 0 {
        errors.push(ValidationError::new("cache.operation_timeout_ms", "must be > 0"));
    }
    if cache.liveness_interval_secs == 0 {
        errors.push(ValidationError::new("cache.liveness_interval_secs", "must be > 0"));
    }

    if config.circuit_breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("circuit_breaker.failure_threshold", "must be >= 1"));
    }
    if config.circuit_breaker.reset_timeout_secs == 0 {
        errors.push(ValidationError::new("circuit_breaker.reset_timeout_secs", "must be > 0"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_downstream(
    url_field: &'static str,
    timeout_field: &'static str,
    downstream: &DownstreamConfig,
    errors: &mut Vec<ValidationError>,
) {
    match Url::parse(&downstream.url) {
        // The downstream client speaks plain HTTP only.
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::new(
            url_field,
            format!("unsupported scheme '{}', expected http", url.scheme()),
        )),
        Ok(url) if url.host_str().is_none() => {
            errors.push(ValidationError::new(url_field, "missing host"))
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new(
            url_field,
            format!("'{}' is not a valid URL: {}", downstream.url, e),
        )),
    }

    if downstream.timeout_ms == 0 {
        errors.push(ValidationError::new(timeout_field, "must be > 0"));
    }
}
