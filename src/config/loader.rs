//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub const SERVICE_B_URL: &str = "SERVICE_B_URL";
pub const SERVICE_C_URL: &str = "SERVICE_C_URL";
pub const REDIS_HOST: &str = "REDIS_HOST";
pub const REDIS_PORT: &str = "REDIS_PORT";
pub const BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Load configuration: defaults, then the optional TOML file, then environment.
pub fn load(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };
    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file, without environment overrides.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(SERVICE_B_URL) {
        config.primary.url = url;
    }
    if let Some(url) = lookup(SERVICE_C_URL) {
        config.secondary.url = url;
    }
    if let Some(host) = lookup(REDIS_HOST) {
        config.cache.host = host;
    }
    if let Some(port) = lookup(REDIS_PORT) {
        config.cache.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: REDIS_PORT,
            reason: format!("'{}' is not a port: {}", port, e),
        })?;
    }
    if let Some(addr) = lookup(BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(level) = lookup(LOG_LEVEL) {
        config.observability.log_level = level;
    }
    if let Some(format) = lookup(LOG_FORMAT) {
        config.observability.log_format = match format.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(ConfigError::Env {
                    var: LOG_FORMAT,
                    reason: format!("unknown log format '{}'", other),
                })
            }
        };
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CacheProviderKind;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = apply_env_overrides(
            GatewayConfig::default(),
            env(&[
                (SERVICE_B_URL, "http://127.0.0.1:9001/"),
                (SERVICE_C_URL, "http://127.0.0.1:9002/"),
                (REDIS_HOST, "cache.local"),
                (REDIS_PORT, "6380"),
                (LOG_FORMAT, "Pretty"),
            ]),
        )
        .unwrap();

        assert_eq!(config.primary.url, "http://127.0.0.1:9001/");
        assert_eq!(config.secondary.url, "http://127.0.0.1:9002/");
        assert_eq!(config.cache.redis_url(), "redis://cache.local:6380/");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_no_env_keeps_defaults() {
        let config = apply_env_overrides(GatewayConfig::default(), env(&[])).unwrap();
        assert_eq!(config.primary.url, "http://service-b:8000/");
        assert_eq!(config.secondary.url, "http://service-c:8000/");
        assert_eq!(config.cache.host, "redis");
        assert_eq!(config.cache.port, 6379);
    }

    #[test]
    fn test_rejects_bad_port() {
        let err = apply_env_overrides(GatewayConfig::default(), env(&[(REDIS_PORT, "sixty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: REDIS_PORT, .. }));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [primary]
            url = "http://127.0.0.1:7001/"

            [cache]
            provider = "memory"
            ttl_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.primary.url, "http://127.0.0.1:7001/");
        assert_eq!(config.primary.timeout_ms, 2000);
        assert_eq!(config.secondary.url, "http://service-c:8000/");
        assert_eq!(config.cache.provider, CacheProviderKind::Memory);
        assert_eq!(config.cache.ttl_secs, 5);
        assert_eq!(config.cache.key, "service_b_response");
        assert_eq!(config.circuit_breaker.failure_threshold, 3);
    }

    #[test]
    fn test_load_config_reports_validation_errors() {
        let path = std::env::temp_dir().join(format!("gateway-config-{}.toml", std::process::id()));
        fs::write(&path, "[circuit_breaker]\nfailure_threshold = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).unwrap_or_default();

        assert!(err.to_string().contains("circuit_breaker.failure_threshold"));
    }
}
