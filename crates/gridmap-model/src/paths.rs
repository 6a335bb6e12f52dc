//! Canonical resource paths
//!
//! Every path the service emits (`Location` headers, control hrefs) and
//! every cache key is built here, so a resource has exactly one spelling.

use crate::map::Map;
use crate::observer::Observer;
use crate::obstacle::Obstacle;

/// Builder for canonical resource paths under an API prefix
///
/// # Examples
/// - map collection → `/api/maps/`
/// - observer item → `/api/maps/grid-a/observers/o1/`
/// - obstacle item → `/api/maps/grid-a/obstacles/3/4/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    prefix: String,
}

impl ResourcePaths {
    /// Create path builder for a prefix such as `/api`
    ///
    /// Trailing slashes are stripped; an empty prefix mounts at the root.
    #[must_use]
    pub fn new(prefix: impl AsRef<str>) -> Self {
        let trimmed = prefix.as_ref().trim_end_matches('/');
        let prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    /// API prefix, without trailing slash
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `/maps/`
    #[must_use]
    pub fn map_collection(&self) -> String {
        format!("{}/maps/", self.prefix)
    }

    /// `/maps/{slug}/`
    #[must_use]
    pub fn map_item(&self, map: &Map) -> String {
        self.map_item_slug(map.slug.as_str())
    }

    /// `/maps/{slug}/` for a raw slug
    #[must_use]
    pub fn map_item_slug(&self, map_slug: &str) -> String {
        format!("{}/maps/{map_slug}/", self.prefix)
    }

    /// `/maps/{slug}/observers/`
    #[must_use]
    pub fn map_observers(&self, map: &Map) -> String {
        format!("{}/maps/{}/observers/", self.prefix, map.slug)
    }

    /// `/maps/{slug}/obstacles/`
    #[must_use]
    pub fn map_obstacles(&self, map: &Map) -> String {
        format!("{}/maps/{}/obstacles/", self.prefix, map.slug)
    }

    /// `/maps/{map}/observers/{observer}/`
    #[must_use]
    pub fn observer_item(&self, map: &Map, observer: &Observer) -> String {
        self.observer_item_slug(map.slug.as_str(), observer.slug.as_str())
    }

    /// `/maps/{map}/observers/{observer}/` for raw slugs
    #[must_use]
    pub fn observer_item_slug(&self, map_slug: &str, observer_slug: &str) -> String {
        format!("{}/maps/{map_slug}/observers/{observer_slug}/", self.prefix)
    }

    /// `/maps/{map}/obstacles/{x}/{y}/`
    #[must_use]
    pub fn obstacle_item(&self, map: &Map, obstacle: &Obstacle) -> String {
        self.obstacle_tile(map, obstacle.x, obstacle.y)
    }

    /// `/maps/{map}/obstacles/{x}/{y}/` for a tile
    #[must_use]
    pub fn obstacle_tile(&self, map: &Map, x: u32, y: u32) -> String {
        format!("{}/maps/{}/obstacles/{x}/{y}/", self.prefix, map.slug)
    }
}

impl Default for ResourcePaths {
    /// Paths mounted under `/api`
    fn default() -> Self {
        Self::new("/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapId, MapInput, ObserverId, ObserverInput};

    fn map() -> Map {
        Map::from_input(MapInput {
            name: "Grid A".to_string(),
            width: 10,
            height: 10,
        })
        .unwrap()
        .into_map(MapId::new(1))
    }

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(ResourcePaths::new("/api/").prefix(), "/api");
        assert_eq!(ResourcePaths::new("api").prefix(), "/api");
        assert_eq!(ResourcePaths::new("").map_collection(), "/maps/");
    }

    #[test]
    fn item_paths() {
        let paths = ResourcePaths::default();
        let map = map();
        let observer = Observer::from_input(ObserverInput {
            name: "O1".to_string(),
            vision: None,
            x: 1,
            y: 1,
        })
        .unwrap()
        .into_observer(ObserverId::new(1), map.id);

        assert_eq!(paths.map_collection(), "/api/maps/");
        assert_eq!(paths.map_item(&map), "/api/maps/grid-a/");
        assert_eq!(paths.map_observers(&map), "/api/maps/grid-a/observers/");
        assert_eq!(paths.map_obstacles(&map), "/api/maps/grid-a/obstacles/");
        assert_eq!(
            paths.observer_item(&map, &observer),
            "/api/maps/grid-a/observers/o1/"
        );
        assert_eq!(paths.obstacle_tile(&map, 3, 4), "/api/maps/grid-a/obstacles/3/4/");
    }
}
