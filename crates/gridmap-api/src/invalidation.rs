//! Cache invalidation table
//!
//! One function per committed mutation, each returning every path whose
//! cached body embeds data the mutation changed. Handlers call these only
//! after the store reported success.
//!
//! | Mutation          | Paths                                                          |
//! |-------------------|----------------------------------------------------------------|
//! | map create        | collection, map item                                           |
//! | map update        | collection, old and new map item, observer items if renamed    |
//! | map delete        | collection, map item, its observer items                       |
//! | observer create   | observer item, map item                                        |
//! | observer update   | old and new observer item, map item                            |
//! | observer delete   | observer item, map item                                        |
//! | obstacle create   | map item                                                       |
//! | obstacle delete   | map item                                                       |
//!
//! Observer items embed `map_name` and `map_slug`, which is why map renames
//! and deletes reach them. No child mutation touches the collection.

use gridmap_cache::InvalidationSet;
use gridmap_model::{Map, Observer, ResourcePaths};

/// After inserting a map
#[must_use]
pub fn map_created(paths: &ResourcePaths, map: &Map) -> InvalidationSet {
    InvalidationSet::new()
        .with_path(paths.map_collection())
        .with_path(paths.map_item(map))
}

/// After updating a map from `before` to `after`
#[must_use]
pub fn map_updated(
    paths: &ResourcePaths,
    before: &Map,
    after: &Map,
    observers: &[Observer],
) -> InvalidationSet {
    let mut keys = InvalidationSet::new()
        .with_path(paths.map_collection())
        .with_path(paths.map_item(before))
        .with_path(paths.map_item(after));
    if before.name != after.name || before.slug != after.slug {
        for observer in observers {
            keys.add_path(paths.observer_item(before, observer));
            keys.add_path(paths.observer_item(after, observer));
        }
    }
    keys
}

/// After deleting a map and, with it, `observers`
#[must_use]
pub fn map_deleted(paths: &ResourcePaths, map: &Map, observers: &[Observer]) -> InvalidationSet {
    let mut keys = InvalidationSet::new()
        .with_path(paths.map_collection())
        .with_path(paths.map_item(map));
    for observer in observers {
        keys.add_path(paths.observer_item(map, observer));
    }
    keys
}

/// After inserting or deleting an observer
#[must_use]
pub fn observer_changed(paths: &ResourcePaths, map: &Map, observer: &Observer) -> InvalidationSet {
    InvalidationSet::new()
        .with_path(paths.map_item(map))
        .with_path(paths.observer_item(map, observer))
}

/// After updating an observer from `before` to `after`
#[must_use]
pub fn observer_updated(
    paths: &ResourcePaths,
    map: &Map,
    before: &Observer,
    after: &Observer,
) -> InvalidationSet {
    observer_changed(paths, map, before).with_path(paths.observer_item(map, after))
}

/// After inserting or deleting obstacles; they have no path of their own
#[must_use]
pub fn obstacles_changed(paths: &ResourcePaths, map: &Map) -> InvalidationSet {
    InvalidationSet::new().with_path(paths.map_item(map))
}
