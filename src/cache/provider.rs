//! Runtime selection of the cache store.

use std::time::Duration;

use crate::cache::memory::MemoryCacheStore;
use crate::cache::redis::RedisCacheStore;
use crate::cache::store::{CacheResult, CacheStore};
use crate::config::{CacheConfig, CacheProviderKind};

/// The configured cache store, dispatched by enum rather than trait object.
#[derive(Debug, Clone)]
pub enum CacheProvider {
    Redis(RedisCacheStore),
    Memory(MemoryCacheStore),
}

impl CacheProvider {
    /// Build the provider named in config. Redis connects eagerly so startup fails fast.
    pub async fn from_config(config: &CacheConfig) -> CacheResult<Self> {
        match config.provider {
            CacheProviderKind::Redis => Ok(Self::Redis(RedisCacheStore::connect(config).await?)),
            CacheProviderKind::Memory => {
                tracing::info!(component = "cache", "Using in-memory cache store");
                Ok(Self::Memory(MemoryCacheStore::new()))
            }
        }
    }
}

impl From<MemoryCacheStore> for CacheProvider {
    fn from(store: MemoryCacheStore) -> Self {
        Self::Memory(store)
    }
}

impl CacheStore for CacheProvider {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            Self::Redis(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            Self::Redis(store) => store.set_with_ttl(key, value, ttl).await,
            Self::Memory(store) => store.set_with_ttl(key, value, ttl).await,
        }
    }

    async fn ping(&self) -> CacheResult<bool> {
        match self {
            Self::Redis(store) => store.ping().await,
            Self::Memory(store) => store.ping().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            Self::Redis(store) => store.provider_name(),
            Self::Memory(store) => store.provider_name(),
        }
    }
}
