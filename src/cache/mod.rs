// ============================================================================
// Response Cache
// ============================================================================
//
// Key-value store for raw upstream bodies with TTL-based expiration.
// Values are opaque bytes and are never decoded.
//
// - key.rs: cache key derivation and route-dependent TTLs
// - memory.rs: process-local store (default)
// - redis_store.rs: shared Redis store
//
// Entries are immutable once written; a new write for the same key
// overwrites. There is no delete or clear operation.
//
// ============================================================================

pub mod key;
pub mod memory;
pub mod redis_store;

pub use key::{cache_key, ttl_for_route, RouteCategory};
pub use memory::MemoryCacheStore;
pub use redis_store::RedisCacheStore;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{CacheBackend, CacheConfig};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache configuration error: {0}")]
    Config(String),
}

/// Key-value store with per-entry TTL
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch an unexpired entry
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Write an entry that expires after `ttl`, replacing any previous one
    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Store used when caching is turned off: every lookup misses
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledCacheStore;

#[async_trait]
impl CacheStore for DisabledCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: Bytes, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

/// Create the cache store selected by config
pub async fn create_cache_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>, CacheError> {
    match config.backend {
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| CacheError::Config("REDIS_URL is not set".to_string()))?;
            let store = tokio::time::timeout(Duration::from_secs(10), RedisCacheStore::connect(url))
                .await
                .map_err(|_| {
                    CacheError::Config("Redis connection timed out after 10 seconds".to_string())
                })??;
            Ok(Arc::new(store))
        }
        CacheBackend::Memory => Ok(Arc::new(MemoryCacheStore::new())),
        CacheBackend::Disabled => Ok(Arc::new(DisabledCacheStore)),
    }
}
