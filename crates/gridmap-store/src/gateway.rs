//! Persistence gateway trait
//!
//! The contract the resource handlers consume. Each mutating call is one
//! atomic transaction. Uniqueness of names and slugs is decided here at
//! commit time, never by the caller.

use crate::error::StoreResult;
use async_trait::async_trait;
use gridmap_model::{
    Map, MapId, NewMap, NewObserver, NewObstacle, Observer, ObserverId, Obstacle, Slug,
};

/// Observers and obstacles owned by one map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapChildren {
    /// Observers placed on the map
    pub observers: Vec<Observer>,
    /// Obstacles placed on the map
    pub obstacles: Vec<Obstacle>,
}

impl MapChildren {
    /// Check if the map holds no children
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty() && self.obstacles.is_empty()
    }
}

/// Result of a child mutation with its parent map as of the commit
///
/// The parent may have been renamed since the caller resolved it; paths
/// derived from `map` are the ones the mutation actually touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    /// Owning map, read in the same transaction
    pub map: Map,
    /// Mutation outcome
    pub value: T,
}

/// Result of a map update
#[derive(Debug, Clone, PartialEq)]
pub struct MapUpdate {
    /// Row as it was before the update
    pub previous: Map,
    /// Observers on the map at commit time
    pub observers: Vec<Observer>,
}

/// A map removed together with its children
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedMap {
    /// Map row as it was when removed
    pub map: Map,
    /// Observers and obstacles removed with it
    pub children: MapChildren,
}

/// Transactional storage for the grid world
///
/// # Contract
/// - `insert_*` / `update_*` return [`crate::StoreError::UniquenessConflict`]
///   when a committed row already holds the same name or slug
/// - `delete_map` removes the map's observers and obstacles in the same
///   transaction
/// - deletes do not fail when the target is already gone
/// - updates take the slug the caller resolved the row by, and answer
///   [`crate::StoreError::NotFound`] if the row no longer carries it
/// - every mutation reports the rows it committed against, so callers
///   never derive paths from a possibly stale lookup
#[async_trait]
pub trait PersistenceGateway: Send + Sync + 'static {
    /// All maps, in insertion order
    async fn list_maps(&self) -> StoreResult<Vec<Map>>;

    /// Look up a map by slug
    async fn map_by_slug(&self, slug: &str) -> StoreResult<Option<Map>>;

    /// Observers and obstacles owned by a map
    async fn map_children(&self, map_id: MapId) -> StoreResult<MapChildren>;

    /// Look up an observer by slug
    async fn observer_by_slug(&self, slug: &str) -> StoreResult<Option<Observer>>;

    /// Insert a map
    async fn insert_map(&self, map: NewMap) -> StoreResult<Map>;

    /// Overwrite a map's attributes
    ///
    /// `expected` is the slug the row was resolved by.
    async fn update_map(&self, map: &Map, expected: &Slug) -> StoreResult<MapUpdate>;

    /// Delete a map together with its observers and obstacles
    ///
    /// Returns `None` if the map was already gone.
    async fn delete_map(&self, map_id: MapId) -> StoreResult<Option<RemovedMap>>;

    /// Insert an observer under a map
    async fn insert_observer(
        &self,
        map_id: MapId,
        observer: NewObserver,
    ) -> StoreResult<Committed<Observer>>;

    /// Overwrite an observer's attributes, returning the replaced row
    ///
    /// `expected` is the slug the row was resolved by.
    async fn update_observer(
        &self,
        observer: &Observer,
        expected: &Slug,
    ) -> StoreResult<Committed<Observer>>;

    /// Delete an observer, returning it if it existed
    async fn delete_observer(&self, observer_id: ObserverId)
        -> StoreResult<Option<Committed<Observer>>>;

    /// Insert an obstacle under a map
    async fn insert_obstacle(
        &self,
        map_id: MapId,
        obstacle: NewObstacle,
    ) -> StoreResult<Committed<Obstacle>>;

    /// Delete every obstacle of a map on tile `(x, y)`, returning how many
    ///
    /// Returns `None` if the map is gone.
    async fn delete_obstacles_at(
        &self,
        map_id: MapId,
        x: u32,
        y: u32,
    ) -> StoreResult<Option<Committed<usize>>>;
}
