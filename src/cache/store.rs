//! Cache store contract.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Failed to connect to the cache backend.
    #[error("Cache connection error: {0}")]
    Connection(String),

    /// Cache operation timed out.
    #[error("Cache operation timed out: {0}")]
    Timeout(String),

    /// The backend rejected or failed the command.
    #[error("Cache backend error: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Network key-value store with per-key expiry.
///
/// Values are opaque strings; expiry is enforced by the store, never by callers.
pub trait CacheStore: Send + Sync {
    /// `Ok(Some(value))` on hit, `Ok(None)` on miss or expired entry.
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<String>>> + Send;

    /// Store `value` under `key`, expiring `ttl` after the write.
    fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    /// Connectivity probe. `Ok(false)` is an explicit negative reply.
    fn ping(&self) -> impl Future<Output = CacheResult<bool>> + Send;

    fn provider_name(&self) -> &'static str;
}
