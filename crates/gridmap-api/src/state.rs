//! Shared application state
//!
//! Built once at startup and shared by every request. The store and the
//! cache are the only shared mutable resources.

use crate::config::GridmapConfig;
use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use gridmap_cache::{CacheKey, InvalidationSet, ResponseCache};
use gridmap_hypermedia::Renderer;
use gridmap_model::{Map, ModelError, Observer, Representation, ResourcePaths, SchemaValidator};
use gridmap_store::{MemoryStore, PersistenceGateway};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Everything a handler needs
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub store: Arc<dyn PersistenceGateway>,
    /// Response cache
    pub cache: Arc<ResponseCache>,
    /// Canonical paths under the configured prefix
    pub paths: ResourcePaths,
    /// Body renderer
    pub renderer: Renderer,
    /// Compiled entity schemas
    pub validator: Arc<SchemaValidator>,
}

impl AppState {
    /// Create state around an existing store
    ///
    /// # Errors
    /// Fails if a built-in entity schema does not compile.
    pub fn new(config: &GridmapConfig, store: Arc<dyn PersistenceGateway>) -> Result<Self, ModelError> {
        let paths = ResourcePaths::new(&config.api_prefix);
        Ok(Self {
            store,
            cache: Arc::new(ResponseCache::new(config.cache_capacity)),
            renderer: Renderer::new(paths.clone()),
            paths,
            validator: Arc::new(SchemaValidator::new()?),
        })
    }

    /// Create state backed by a fresh in-process store
    ///
    /// # Errors
    /// Fails if a built-in entity schema does not compile.
    pub fn in_memory(config: &GridmapConfig) -> Result<Self, ModelError> {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Resolve a map handle
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] for an unknown slug.
    pub async fn resolve_map(&self, slug: &str) -> ApiResult<Map> {
        self.store
            .map_by_slug(slug)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("no map with slug '{slug}'")))
    }

    /// Resolve an observer handle under a map
    ///
    /// An observer that exists but belongs to another map is not found.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] for an unknown slug.
    pub async fn resolve_observer(&self, map: &Map, slug: &str) -> ApiResult<Observer> {
        self.store
            .observer_by_slug(slug)
            .await?
            .filter(|observer| observer.map_id == map.id)
            .ok_or_else(|| {
                ApiError::not_found(format!("no observer with slug '{slug}' on map '{}'", map.slug))
            })
    }

    /// Serve a GET from the cache, rendering on a miss
    ///
    /// `render` must read everything it needs from the store itself: the
    /// epoch is taken before it runs, so a mutation that commits meanwhile
    /// keeps its (possibly stale) body out of the cache.
    ///
    /// # Errors
    /// Propagates errors from `render`.
    pub async fn cached<F, Fut>(
        &self,
        representation: Representation,
        path: String,
        render: F,
    ) -> ApiResult<ApiResponse>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<Value>>,
    {
        let key = CacheKey::new(representation, path);
        if let Some(body) = self.cache.get(&key).await {
            return Ok(ApiResponse::ok(representation, body));
        }
        let epoch = self.cache.epoch();
        let document = render().await?;
        let body: Arc<str> = Arc::from(serde_json::to_string(&document)?);
        self.cache.put_if_current(key, Arc::clone(&body), epoch).await;
        Ok(ApiResponse::ok(representation, body))
    }

    /// Drop cached bodies after a committed mutation
    pub async fn invalidate(&self, keys: &InvalidationSet) {
        self.cache.invalidate(keys).await;
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("paths", &self.paths)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
