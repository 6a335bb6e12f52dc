//! In-process transactional store
//!
//! All tables sit behind one `RwLock`. A write lock is the transaction
//! boundary: uniqueness checks and the write they guard happen under the
//! same lock, so two concurrent creators of the same name cannot both
//! commit.
//!
//! Ownership follows the maps: each map row holds the authoritative set of
//! its observer and obstacle ids. The `map_id` on a child is only used for
//! lookups.

use crate::error::{StoreError, StoreResult};
use crate::gateway::{Committed, MapChildren, MapUpdate, PersistenceGateway, RemovedMap};
use async_trait::async_trait;
use gridmap_model::{
    EntityKind, Map, MapId, NewMap, NewObserver, NewObstacle, Observer, ObserverId, Obstacle,
    ObstacleId, Placed, Slug,
};
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

/// Map row with its ownership record
#[derive(Debug, Clone)]
struct MapRow {
    map: Map,
    observers: BTreeSet<ObserverId>,
    obstacles: BTreeSet<ObstacleId>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: u64,
    maps: BTreeMap<MapId, MapRow>,
    observers: BTreeMap<ObserverId, Observer>,
    obstacles: BTreeMap<ObstacleId, Obstacle>,

    // Unique indexes
    map_names: HashMap<String, MapId>,
    map_slugs: HashMap<Slug, MapId>,
    observer_names: HashMap<String, ObserverId>,
    observer_slugs: HashMap<Slug, ObserverId>,
}

impl Tables {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn children(&self, row: &MapRow) -> MapChildren {
        MapChildren {
            observers: row
                .observers
                .iter()
                .filter_map(|id| self.observers.get(id).cloned())
                .collect(),
            obstacles: row
                .obstacles
                .iter()
                .filter_map(|id| self.obstacles.get(id).cloned())
                .collect(),
        }
    }

    fn map(&self, map_id: MapId) -> StoreResult<&Map> {
        self.maps
            .get(&map_id)
            .map(|row| &row.map)
            .ok_or(StoreError::NotFound { kind: EntityKind::Map })
    }

    fn remove_observer(&mut self, id: ObserverId) -> Option<Observer> {
        let observer = self.observers.remove(&id)?;
        self.observer_names.remove(&observer.name);
        self.observer_slugs.remove(&observer.slug);
        Some(observer)
    }
}

/// Fail if `key` is held in `index` by anyone other than `owner`
fn ensure_unique<K, Q, Id>(
    index: &HashMap<K, Id>,
    key: &Q,
    owner: Option<Id>,
    kind: EntityKind,
    field: &'static str,
) -> StoreResult<()>
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ToString + ?Sized,
    Id: Copy + PartialEq,
{
    match index.get(key) {
        Some(&holder) if Some(holder) != owner => {
            Err(StoreError::conflict(kind, field, key.to_string()))
        }
        _ => Ok(()),
    }
}

/// In-process implementation of [`PersistenceGateway`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count observers and obstacles whose back-reference points at a map
    ///
    /// Scans the child tables directly rather than the ownership record.
    #[must_use]
    pub fn children_referencing(&self, map_id: MapId) -> usize {
        let tables = self.tables.read();
        let observers = tables.observers.values().filter(|o| o.map_id == map_id).count();
        let obstacles = tables.obstacles.values().filter(|o| o.map_id == map_id).count();
        observers + obstacles
    }

    /// Number of maps
    #[must_use]
    pub fn map_count(&self) -> usize {
        self.tables.read().maps.len()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn list_maps(&self) -> StoreResult<Vec<Map>> {
        let tables = self.tables.read();
        Ok(tables.maps.values().map(|row| row.map.clone()).collect())
    }

    async fn map_by_slug(&self, slug: &str) -> StoreResult<Option<Map>> {
        let tables = self.tables.read();
        Ok(tables
            .map_slugs
            .get(slug)
            .and_then(|id| tables.maps.get(id))
            .map(|row| row.map.clone()))
    }

    async fn map_children(&self, map_id: MapId) -> StoreResult<MapChildren> {
        let tables = self.tables.read();
        let row = tables
            .maps
            .get(&map_id)
            .ok_or(StoreError::NotFound { kind: EntityKind::Map })?;
        Ok(tables.children(row))
    }

    async fn observer_by_slug(&self, slug: &str) -> StoreResult<Option<Observer>> {
        let tables = self.tables.read();
        Ok(tables
            .observer_slugs
            .get(slug)
            .and_then(|id| tables.observers.get(id))
            .cloned())
    }

    async fn insert_map(&self, map: NewMap) -> StoreResult<Map> {
        let mut tables = self.tables.write();
        ensure_unique(&tables.map_names, map.name.as_str(), None, EntityKind::Map, "name")?;
        ensure_unique(&tables.map_slugs, &map.slug, None, EntityKind::Map, "slug")?;

        let id = MapId::new(tables.allocate());
        let map = map.into_map(id);
        tables.map_names.insert(map.name.clone(), id);
        tables.map_slugs.insert(map.slug.clone(), id);
        tables.maps.insert(
            id,
            MapRow {
                map: map.clone(),
                observers: BTreeSet::new(),
                obstacles: BTreeSet::new(),
            },
        );
        tracing::debug!(%id, slug = %map.slug, "map inserted");
        Ok(map)
    }

    async fn update_map(&self, map: &Map, expected: &Slug) -> StoreResult<MapUpdate> {
        let mut tables = self.tables.write();
        let row = tables
            .maps
            .get(&map.id)
            .filter(|row| row.map.slug == *expected)
            .ok_or(StoreError::NotFound { kind: EntityKind::Map })?;
        let previous = row.map.clone();
        let children = tables.children(row);
        ensure_unique(&tables.map_names, map.name.as_str(), Some(map.id), EntityKind::Map, "name")?;
        ensure_unique(&tables.map_slugs, &map.slug, Some(map.id), EntityKind::Map, "slug")?;
        // A shrinking map must still cover every child
        for observer in &children.observers {
            StoreError::check_tile(EntityKind::Observer, map, observer.position())?;
        }
        for obstacle in &children.obstacles {
            StoreError::check_tile(EntityKind::Obstacle, map, obstacle.position())?;
        }

        tables.map_names.remove(&previous.name);
        tables.map_slugs.remove(&previous.slug);
        tables.map_names.insert(map.name.clone(), map.id);
        tables.map_slugs.insert(map.slug.clone(), map.id);
        if let Some(row) = tables.maps.get_mut(&map.id) {
            row.map = map.clone();
        }
        tracing::debug!(id = %map.id, from = %previous.slug, to = %map.slug, "map updated");
        Ok(MapUpdate {
            previous,
            observers: children.observers,
        })
    }

    async fn delete_map(&self, map_id: MapId) -> StoreResult<Option<RemovedMap>> {
        let mut tables = self.tables.write();
        let Some(row) = tables.maps.remove(&map_id) else {
            return Ok(None);
        };
        tables.map_names.remove(&row.map.name);
        tables.map_slugs.remove(&row.map.slug);
        let observers: Vec<Observer> = row
            .observers
            .iter()
            .filter_map(|id| tables.remove_observer(*id))
            .collect();
        let obstacles: Vec<Obstacle> = row
            .obstacles
            .iter()
            .filter_map(|id| tables.obstacles.remove(id))
            .collect();
        tracing::debug!(
            id = %map_id,
            slug = %row.map.slug,
            observers = observers.len(),
            obstacles = obstacles.len(),
            "map deleted with children"
        );
        Ok(Some(RemovedMap {
            map: row.map,
            children: MapChildren {
                observers,
                obstacles,
            },
        }))
    }

    async fn insert_observer(
        &self,
        map_id: MapId,
        observer: NewObserver,
    ) -> StoreResult<Committed<Observer>> {
        let mut tables = self.tables.write();
        let map = tables.map(map_id)?.clone();
        StoreError::check_tile(EntityKind::Observer, &map, (observer.x, observer.y))?;
        ensure_unique(
            &tables.observer_names,
            observer.name.as_str(),
            None,
            EntityKind::Observer,
            "name",
        )?;
        ensure_unique(&tables.observer_slugs, &observer.slug, None, EntityKind::Observer, "slug")?;

        let id = ObserverId::new(tables.allocate());
        let observer = observer.into_observer(id, map_id);
        tables.observer_names.insert(observer.name.clone(), id);
        tables.observer_slugs.insert(observer.slug.clone(), id);
        tables.observers.insert(id, observer.clone());
        if let Some(row) = tables.maps.get_mut(&map_id) {
            row.observers.insert(id);
        }
        tracing::debug!(%id, map = %map.slug, slug = %observer.slug, "observer inserted");
        Ok(Committed {
            map,
            value: observer,
        })
    }

    async fn update_observer(
        &self,
        observer: &Observer,
        expected: &Slug,
    ) -> StoreResult<Committed<Observer>> {
        let mut tables = self.tables.write();
        let previous = tables
            .observers
            .get(&observer.id)
            .filter(|stored| stored.slug == *expected)
            .cloned()
            .ok_or(StoreError::NotFound { kind: EntityKind::Observer })?;
        let map = tables.map(previous.map_id)?.clone();
        StoreError::check_tile(EntityKind::Observer, &map, observer.position())?;
        ensure_unique(
            &tables.observer_names,
            observer.name.as_str(),
            Some(observer.id),
            EntityKind::Observer,
            "name",
        )?;
        ensure_unique(
            &tables.observer_slugs,
            &observer.slug,
            Some(observer.id),
            EntityKind::Observer,
            "slug",
        )?;

        tables.observer_names.remove(&previous.name);
        tables.observer_slugs.remove(&previous.slug);
        tables.observer_names.insert(observer.name.clone(), observer.id);
        tables.observer_slugs.insert(observer.slug.clone(), observer.id);
        // The owning map never changes through an update
        let updated = Observer {
            map_id: previous.map_id,
            ..observer.clone()
        };
        tables.observers.insert(observer.id, updated);
        tracing::debug!(id = %observer.id, from = %previous.slug, to = %observer.slug, "observer updated");
        Ok(Committed {
            map,
            value: previous,
        })
    }

    async fn delete_observer(
        &self,
        observer_id: ObserverId,
    ) -> StoreResult<Option<Committed<Observer>>> {
        let mut tables = self.tables.write();
        let Some(observer) = tables.remove_observer(observer_id) else {
            return Ok(None);
        };
        let row = tables
            .maps
            .get_mut(&observer.map_id)
            .ok_or_else(|| StoreError::Internal(format!("observer {observer_id} has no map")))?;
        row.observers.remove(&observer_id);
        let map = row.map.clone();
        tracing::debug!(id = %observer_id, map = %map.slug, "observer deleted");
        Ok(Some(Committed {
            map,
            value: observer,
        }))
    }

    async fn insert_obstacle(
        &self,
        map_id: MapId,
        obstacle: NewObstacle,
    ) -> StoreResult<Committed<Obstacle>> {
        let mut tables = self.tables.write();
        let map = tables.map(map_id)?.clone();
        StoreError::check_tile(EntityKind::Obstacle, &map, (obstacle.x, obstacle.y))?;
        let id = ObstacleId::new(tables.allocate());
        let obstacle = obstacle.into_obstacle(id, map_id);
        tables.obstacles.insert(id, obstacle.clone());
        if let Some(row) = tables.maps.get_mut(&map_id) {
            row.obstacles.insert(id);
        }
        tracing::debug!(%id, map = %map.slug, x = obstacle.x, y = obstacle.y, "obstacle inserted");
        Ok(Committed {
            map,
            value: obstacle,
        })
    }

    async fn delete_obstacles_at(
        &self,
        map_id: MapId,
        x: u32,
        y: u32,
    ) -> StoreResult<Option<Committed<usize>>> {
        let mut tables = self.tables.write();
        let Some(row) = tables.maps.get(&map_id) else {
            return Ok(None);
        };
        let matching: Vec<ObstacleId> = row
            .obstacles
            .iter()
            .copied()
            .filter(|id| {
                tables
                    .obstacles
                    .get(id)
                    .is_some_and(|o| o.x == x && o.y == y)
            })
            .collect();
        for id in &matching {
            tables.obstacles.remove(id);
        }
        let Some(row) = tables.maps.get_mut(&map_id) else {
            return Ok(None);
        };
        row.obstacles.retain(|id| !matching.contains(id));
        tracing::debug!(map = %row.map.slug, x, y, removed = matching.len(), "obstacles deleted");
        Ok(Some(Committed {
            map: row.map.clone(),
            value: matching.len(),
        }))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use gridmap_model::{MapInput, ObstacleInput};
    use proptest::prelude::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn cascade_leaves_no_orphans(
            tiles in prop::collection::vec((0u32..6, 0u32..6), 0..24),
            doomed in 0usize..3,
        ) {
            block_on(async {
                let store = MemoryStore::new();
                let mut maps = Vec::new();
                for name in ["Grid A", "Grid B", "Grid C"] {
                    let draft = Map::from_input(MapInput {
                        name: name.to_string(),
                        width: 6,
                        height: 6,
                    })
                    .unwrap();
                    maps.push(store.insert_map(draft).await.unwrap());
                }
                for (i, (x, y)) in tiles.iter().copied().enumerate() {
                    let map = &maps[i % maps.len()];
                    store
                        .insert_obstacle(map.id, Obstacle::from_input(ObstacleInput { x, y }))
                        .await
                        .unwrap();
                }

                let before: Vec<usize> = maps.iter().map(|m| store.children_referencing(m.id)).collect();
                store.delete_map(maps[doomed].id).await.unwrap();

                for (i, map) in maps.iter().enumerate() {
                    let expected = if i == doomed { 0 } else { before[i] };
                    assert_eq!(store.children_referencing(map.id), expected);
                }
            });
        }
    }
}
