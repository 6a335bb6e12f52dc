//! A store whose mutations can be held before they commit
//!
//! Lets a test interleave other requests between a handler's lookup and
//! its write.

use async_trait::async_trait;
use gridmap_model::{
    Map, MapId, NewMap, NewObserver, NewObstacle, Observer, ObserverId, Obstacle, Slug,
};
use gridmap_store::{
    Committed, MapChildren, MapUpdate, MemoryStore, PersistenceGateway, RemovedMap, StoreResult,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Mutation a [`Gate`] can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Held {
    UpdateMap,
    DeleteMap,
    InsertObserver,
    UpdateObserver,
    DeleteObserver,
    InsertObstacle,
    DeleteObstacles,
}

/// Holds the first call of one mutation until released
#[derive(Debug)]
pub struct Gate {
    armed: Mutex<Option<Held>>,
    reached: Notify,
    release: Notify,
}

impl Gate {
    pub fn new(held: Held) -> Self {
        Self {
            armed: Mutex::new(Some(held)),
            reached: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Wait until the held mutation is paused
    pub async fn reached(&self) {
        self.reached.notified().await;
    }

    /// Let the held mutation commit
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self, op: Held) {
        let hold = {
            let mut armed = self.armed.lock();
            if *armed == Some(op) {
                *armed = None;
                true
            } else {
                false
            }
        };
        if hold {
            self.reached.notify_one();
            self.release.notified().await;
        }
    }
}

/// [`MemoryStore`] behind a [`Gate`]
#[derive(Debug)]
pub struct GatedStore {
    inner: Arc<MemoryStore>,
    gate: Arc<Gate>,
}

impl GatedStore {
    pub fn new(inner: Arc<MemoryStore>, gate: Arc<Gate>) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl PersistenceGateway for GatedStore {
    async fn list_maps(&self) -> StoreResult<Vec<Map>> {
        self.inner.list_maps().await
    }

    async fn map_by_slug(&self, slug: &str) -> StoreResult<Option<Map>> {
        self.inner.map_by_slug(slug).await
    }

    async fn map_children(&self, map_id: MapId) -> StoreResult<MapChildren> {
        self.inner.map_children(map_id).await
    }

    async fn observer_by_slug(&self, slug: &str) -> StoreResult<Option<Observer>> {
        self.inner.observer_by_slug(slug).await
    }

    async fn insert_map(&self, map: NewMap) -> StoreResult<Map> {
        self.inner.insert_map(map).await
    }

    async fn update_map(&self, map: &Map, expected: &Slug) -> StoreResult<MapUpdate> {
        self.gate.pass(Held::UpdateMap).await;
        self.inner.update_map(map, expected).await
    }

    async fn delete_map(&self, map_id: MapId) -> StoreResult<Option<RemovedMap>> {
        self.gate.pass(Held::DeleteMap).await;
        self.inner.delete_map(map_id).await
    }

    async fn insert_observer(
        &self,
        map_id: MapId,
        observer: NewObserver,
    ) -> StoreResult<Committed<Observer>> {
        self.gate.pass(Held::InsertObserver).await;
        self.inner.insert_observer(map_id, observer).await
    }

    async fn update_observer(
        &self,
        observer: &Observer,
        expected: &Slug,
    ) -> StoreResult<Committed<Observer>> {
        self.gate.pass(Held::UpdateObserver).await;
        self.inner.update_observer(observer, expected).await
    }

    async fn delete_observer(
        &self,
        observer_id: ObserverId,
    ) -> StoreResult<Option<Committed<Observer>>> {
        self.gate.pass(Held::DeleteObserver).await;
        self.inner.delete_observer(observer_id).await
    }

    async fn insert_obstacle(
        &self,
        map_id: MapId,
        obstacle: NewObstacle,
    ) -> StoreResult<Committed<Obstacle>> {
        self.gate.pass(Held::InsertObstacle).await;
        self.inner.insert_obstacle(map_id, obstacle).await
    }

    async fn delete_obstacles_at(
        &self,
        map_id: MapId,
        x: u32,
        y: u32,
    ) -> StoreResult<Option<Committed<usize>>> {
        self.gate.pass(Held::DeleteObstacles).await;
        self.inner.delete_obstacles_at(map_id, x, y).await
    }
}
