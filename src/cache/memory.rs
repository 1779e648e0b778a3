//! Process-local cache store.
//!
//! Entries carry their own expiry instant. A read that finds its entry stale
//! drops it, and every `sweep_every` writes the whole map is swept so keys
//! that are never read again do not accumulate.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{CacheError, CacheStore};

const DEFAULT_SWEEP_EVERY: usize = 1024;

#[derive(Clone, Debug)]
struct CachedEntry {
    body: Bytes,
    expires_at: Instant,
}

/// Thread-safe in-memory store with per-entry TTL
#[derive(Clone, Debug)]
pub struct MemoryCacheStore {
    entries: Arc<DashMap<String, CachedEntry>>,
    writes: Arc<AtomicUsize>,
    sweep_every: usize,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::with_sweep_every(DEFAULT_SWEEP_EVERY)
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that sweeps expired entries once every `sweep_every` writes
    pub fn with_sweep_every(sweep_every: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            writes: Arc::new(AtomicUsize::new(0)),
            sweep_every: sweep_every.max(1),
        }
    }

    /// Number of entries currently held, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let purged = before.saturating_sub(self.entries.len());

        if purged > 0 {
            tracing::debug!(purged, remaining = self.entries.len(), "Swept expired cache entries");
        }
        purged
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        if let Some(entry) = self.entries.get(key) {
            if Instant::now() < entry.expires_at {
                return Ok(Some(entry.body.clone()));
            }
            // Drop the read guard before removing
            drop(entry);
            self.entries
                .remove_if(key, |_, entry| Instant::now() >= entry.expires_at);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            CachedEntry {
                body: value,
                expires_at: Instant::now() + ttl,
            },
        );

        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % self.sweep_every == 0 {
            self.purge_expired();
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hit_within_ttl() {
        let store = MemoryCacheStore::new();
        store
            .put("api:/trending:", Bytes::from_static(b"[1,2]"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("api:/trending:").await.unwrap(),
            Some(Bytes::from_static(b"[1,2]"))
        );
    }

    #[tokio::test]
    async fn miss_for_unknown_key() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.get("api:/latest:").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_miss_and_are_evicted() {
        let store = MemoryCacheStore::new();
        store
            .put("api:/search:?query=a", Bytes::from_static(b"{}"), Duration::from_millis(1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.get("api:/search:?query=a").await.unwrap(), None);
        assert!(store.is_empty(), "stale entry should be removed on read");
    }

    #[tokio::test]
    async fn overwrite_replaces_body_and_expiry() {
        let store = MemoryCacheStore::new();
        store
            .put("k", Bytes::from_static(b"old"), Duration::from_millis(1))
            .await
            .unwrap();
        store
            .put("k", Bytes::from_static(b"new"), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.get("k").await.unwrap(), Some(Bytes::from_static(b"new")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn non_utf8_bodies_are_stored_verbatim() {
        let store = MemoryCacheStore::new();
        let body = Bytes::from_static(&[0x22, 0xff, 0xfe, 0x22]);
        store
            .put("api:/detail:?bookId=1", body.clone(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get("api:/detail:?bookId=1").await.unwrap(), Some(body));
    }

    #[tokio::test]
    async fn writes_sweep_keys_that_are_never_read_again() {
        let store = MemoryCacheStore::with_sweep_every(1000);
        for i in 0..999 {
            store
                .put(
                    &format!("api:/search:?query={}", i),
                    Bytes::from_static(b"[]"),
                    Duration::from_millis(1),
                )
                .await
                .unwrap();
        }
        assert_eq!(store.len(), 999);

        tokio::time::sleep(Duration::from_millis(50)).await;

        // The 1000th write triggers the sweep
        store
            .put("api:/trending:", Bytes::from_static(b"[]"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("api:/trending:").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn purge_keeps_live_entries() {
        let store = MemoryCacheStore::new();
        store
            .put("stale", Bytes::from_static(b"1"), Duration::from_millis(1))
            .await
            .unwrap();
        store
            .put("live", Bytes::from_static(b"2"), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("live").await.unwrap().is_some());
    }
}
