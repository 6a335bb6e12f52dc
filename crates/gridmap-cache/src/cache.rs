//! Response cache using moka
//!
//! Entries have no TTL; staleness is controlled only by invalidation.
//!
//! A read that renders a body from committed state and then stores it can
//! race with a mutation that invalidates the same key in between. To keep
//! such a body from outliving the invalidation, every invalidation bumps an
//! epoch, and [`ResponseCache::put_if_current`] drops bodies rendered
//! before the latest bump.

use crate::key::{CacheKey, InvalidationSet};
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
    /// Number of invalidation rounds so far
    pub invalidations: u64,
}

/// Invalidation counter observed before rendering a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheEpoch(u64);

/// Process-wide response cache
///
/// Construct once at startup and share it with every handler behind an
/// `Arc`.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Cache<CacheKey, Arc<str>>,
    epoch: AtomicU64,
    // Writers: invalidation rounds. Readers: conditional puts.
    gate: RwLock<()>,
}

impl ResponseCache {
    /// Create cache holding at most `max_capacity` bodies
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
            epoch: AtomicU64::new(0),
            gate: RwLock::new(()),
        }
    }

    /// Get cached body
    #[inline]
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        let hit = self.inner.get(key).await;
        tracing::debug!(%key, hit = hit.is_some(), "cache lookup");
        hit
    }

    /// Current invalidation epoch; read it before rendering a body
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> CacheEpoch {
        CacheEpoch(self.epoch.load(Ordering::Acquire))
    }

    /// Store body only if no invalidation happened since `observed`
    ///
    /// Returns whether the body was stored.
    pub async fn put_if_current(
        &self,
        key: CacheKey,
        body: impl Into<Arc<str>>,
        observed: CacheEpoch,
    ) -> bool {
        let _guard = self.gate.read().await;
        if self.epoch() != observed {
            tracing::debug!(%key, "skipping cache fill rendered before an invalidation");
            return false;
        }
        self.inner.insert(key, body.into()).await;
        true
    }

    /// Remove every key in the set; absent keys are ignored
    pub async fn invalidate(&self, keys: &InvalidationSet) {
        let _guard = self.gate.write().await;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        for key in keys {
            self.inner.invalidate(key).await;
        }
        tracing::debug!(paths = ?keys.paths(), "cache invalidated");
    }

    /// Check if key is cached
    #[inline]
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.inner.get(key).await.is_some()
    }

    /// Get cache statistics
    ///
    /// Flushes pending maintenance first so the entry count is exact.
    pub async fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks().await;
        CacheStats {
            entry_count: self.inner.entry_count(),
            invalidations: self.epoch.load(Ordering::Acquire),
        }
    }
}

impl Default for ResponseCache {
    /// Create cache with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_model::Representation;

    fn key(representation: Representation, path: &str) -> CacheKey {
        CacheKey::new(representation, path)
    }

    async fn fill(cache: &ResponseCache, key: CacheKey, body: &str) {
        let observed = cache.epoch();
        assert!(cache.put_if_current(key, body, observed).await);
    }

    #[tokio::test]
    async fn cache_put_and_get() {
        let cache = ResponseCache::new(100);
        let k = key(Representation::Plain, "/api/maps/");
        fill(&cache, k.clone(), "{\"maps\":[]}").await;
        assert_eq!(cache.get(&k).await.as_deref(), Some("{\"maps\":[]}"));
    }

    #[tokio::test]
    async fn representations_are_cached_independently() {
        let cache = ResponseCache::new(100);
        let plain = key(Representation::Plain, "/api/maps/");
        let mason = key(Representation::Hypermedia, "/api/maps/");
        fill(&cache, plain.clone(), "plain").await;
        assert!(cache.get(&mason).await.is_none());
        fill(&cache, mason.clone(), "mason").await;
        assert_eq!(cache.get(&plain).await.as_deref(), Some("plain"));
        assert_eq!(cache.get(&mason).await.as_deref(), Some("mason"));
    }

    #[tokio::test]
    async fn invalidation_removes_listed_keys_only() {
        let cache = ResponseCache::new(100);
        for path in ["/api/maps/", "/api/maps/a/", "/api/maps/b/"] {
            for k in CacheKey::all_for(path) {
                fill(&cache, k, "body").await;
            }
        }
        let set = InvalidationSet::new()
            .with_path("/api/maps/")
            .with_path("/api/maps/a/");
        cache.invalidate(&set).await;

        for k in CacheKey::all_for("/api/maps/b/") {
            assert!(cache.contains(&k).await);
        }
        for k in &set {
            assert!(!cache.contains(k).await);
        }
    }

    #[tokio::test]
    async fn invalidation_is_idempotent() {
        let cache = ResponseCache::new(100);
        let set = InvalidationSet::new().with_path("/api/maps/missing/");
        cache.invalidate(&set).await;
        cache.invalidate(&set).await;
        assert_eq!(cache.stats().await.entry_count, 0);
        assert_eq!(cache.stats().await.invalidations, 2);
    }

    #[tokio::test]
    async fn stale_fill_after_invalidation_is_dropped() {
        let cache = ResponseCache::new(100);
        let k = key(Representation::Plain, "/api/maps/a/");

        let observed = cache.epoch();
        // A mutation commits and invalidates while the body is rendered
        cache
            .invalidate(&InvalidationSet::new().with_path("/api/maps/a/"))
            .await;
        assert!(!cache.put_if_current(k.clone(), "stale", observed).await);
        assert!(cache.get(&k).await.is_none());

        let observed = cache.epoch();
        assert!(cache.put_if_current(k.clone(), "fresh", observed).await);
        assert_eq!(cache.get(&k).await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn every_fill_goes_through_the_epoch_check() {
        let cache = ResponseCache::default();
        let k = key(Representation::Hypermedia, "/api/maps/a/");
        let observed = cache.epoch();
        let unrelated = InvalidationSet::new().with_path("/api/maps/b/");
        cache.invalidate(&unrelated).await;

        // Any invalidation round rejects fills observed before it
        assert!(!cache.put_if_current(k.clone(), "stale", observed).await);
        assert_eq!(cache.stats().await, CacheStats { entry_count: 0, invalidations: 1 });
    }
}
