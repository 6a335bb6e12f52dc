//! Representation rendering
//!
//! Every entity renders through [`Represent::serialize`]. The plain
//! representation is the data portion alone; the hypermedia representation
//! adds the controls of the decision table row for the entity and context.

use crate::controls::{Context, ControlTable, Subject};
use crate::document::{Control, MasonDocument};
use crate::relations::{Relation, ERROR_PROFILE};
use gridmap_model::{Map, Observer, Obstacle, Representation, ResourcePaths};
use serde_json::Value;

/// Something that renders as a (possibly control-augmented) document
pub trait Represent {
    /// Render this entity
    ///
    /// Relation data (child arrays of a map, owning map of a child) is only
    /// included when `include_relations` is set. Controls are only added
    /// for the hypermedia representation.
    fn serialize(
        &self,
        table: &ControlTable,
        include_relations: bool,
        representation: Representation,
        context: Context,
    ) -> MasonDocument;
}

/// A map, optionally with its children
#[derive(Debug, Clone, Copy)]
pub struct MapView<'a> {
    /// The map
    pub map: &'a Map,
    /// Observers placed on the map
    pub observers: &'a [Observer],
    /// Obstacles placed on the map
    pub obstacles: &'a [Obstacle],
}

impl<'a> MapView<'a> {
    /// View of a map without children, for listings
    #[must_use]
    pub const fn bare(map: &'a Map) -> Self {
        Self {
            map,
            observers: &[],
            obstacles: &[],
        }
    }
}

impl Represent for MapView<'_> {
    fn serialize(
        &self,
        table: &ControlTable,
        include_relations: bool,
        representation: Representation,
        context: Context,
    ) -> MasonDocument {
        let mut doc = MasonDocument::from_fields(self.map.fields());
        if representation.is_hypermedia() {
            doc.add_controls(table.controls(Subject::Map(self.map), context));
        }
        if include_relations {
            let observers = self
                .observers
                .iter()
                .map(|observer| {
                    ObserverView {
                        observer,
                        map: self.map,
                    }
                    .serialize(table, false, representation, Context::Nested)
                })
                .collect();
            let obstacles = self
                .obstacles
                .iter()
                .map(|obstacle| {
                    ObstacleView {
                        obstacle,
                        map: self.map,
                    }
                    .serialize(table, false, representation, Context::Nested)
                })
                .collect();
            doc.insert_documents("observers", observers);
            doc.insert_documents("obstacles", obstacles);
        }
        doc
    }
}

/// An observer and the map it belongs to
#[derive(Debug, Clone, Copy)]
pub struct ObserverView<'a> {
    /// The observer
    pub observer: &'a Observer,
    /// Owning map
    pub map: &'a Map,
}

impl Represent for ObserverView<'_> {
    fn serialize(
        &self,
        table: &ControlTable,
        include_relations: bool,
        representation: Representation,
        context: Context,
    ) -> MasonDocument {
        let fields = if include_relations {
            self.observer.fields_with_map(self.map)
        } else {
            self.observer.fields()
        };
        let mut doc = MasonDocument::from_fields(fields);
        if representation.is_hypermedia() {
            let subject = Subject::Observer {
                map: self.map,
                observer: self.observer,
            };
            doc.add_controls(table.controls(subject, context));
        }
        doc
    }
}

/// An obstacle and the map it belongs to
#[derive(Debug, Clone, Copy)]
pub struct ObstacleView<'a> {
    /// The obstacle
    pub obstacle: &'a Obstacle,
    /// Owning map
    pub map: &'a Map,
}

impl Represent for ObstacleView<'_> {
    fn serialize(
        &self,
        table: &ControlTable,
        include_relations: bool,
        representation: Representation,
        context: Context,
    ) -> MasonDocument {
        let fields = if include_relations {
            self.obstacle.fields_with_map(self.map)
        } else {
            self.obstacle.fields()
        };
        let mut doc = MasonDocument::from_fields(fields);
        if representation.is_hypermedia() {
            let subject = Subject::Obstacle {
                map: self.map,
                obstacle: self.obstacle,
            };
            doc.add_controls(table.controls(subject, context));
        }
        doc
    }
}

/// Renders response bodies for every GET endpoint and for errors
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    table: ControlTable,
}

impl Renderer {
    /// Create renderer emitting hrefs under `paths`
    #[must_use]
    pub fn new(paths: ResourcePaths) -> Self {
        Self {
            table: ControlTable::new(paths),
        }
    }

    /// Control table in use
    #[inline]
    #[must_use]
    pub fn table(&self) -> &ControlTable {
        &self.table
    }

    /// `{"maps": [...]}`; listed maps never embed their children
    #[must_use]
    pub fn map_collection(&self, maps: &[Map], representation: Representation) -> Value {
        let items = maps
            .iter()
            .map(|map| {
                MapView::bare(map).serialize(&self.table, false, representation, Context::Nested)
            })
            .collect();
        let mut doc = MasonDocument::new();
        doc.insert_documents("maps", items);
        if representation.is_hypermedia() {
            doc.add_controls(
                self.table
                    .controls(Subject::MapCollection, Context::Primary),
            );
        }
        doc.into_value()
    }

    /// Map with its `observers` and `obstacles` arrays
    #[must_use]
    pub fn map_item(
        &self,
        map: &Map,
        observers: &[Observer],
        obstacles: &[Obstacle],
        representation: Representation,
    ) -> Value {
        MapView {
            map,
            observers,
            obstacles,
        }
        .serialize(&self.table, true, representation, Context::Primary)
        .into_value()
    }

    /// Observer with `map_name` and `map_slug` of its owning map
    #[must_use]
    pub fn observer_item(
        &self,
        map: &Map,
        observer: &Observer,
        representation: Representation,
    ) -> Value {
        ObserverView { observer, map }
            .serialize(&self.table, true, representation, Context::Primary)
            .into_value()
    }

    /// Error document; errors are always rendered in the hypermedia form
    #[must_use]
    pub fn error(&self, title: &str, details: &str) -> Value {
        let mut doc = MasonDocument::new();
        doc.add_error(title, details);
        doc.add_control(Relation::Profile, Control::link(ERROR_PROFILE));
        doc.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_model::{MapId, MapInput, ObstacleId, ObstacleInput, ObserverId, ObserverInput};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(name: &str, id: u64) -> Map {
        Map::from_input(MapInput {
            name: name.to_string(),
            width: 10,
            height: 10,
        })
        .unwrap()
        .into_map(MapId::new(id))
    }

    fn observer(map: &Map) -> Observer {
        Observer::from_input(ObserverInput {
            name: "O1".to_string(),
            vision: None,
            x: 1,
            y: 2,
        })
        .unwrap()
        .into_observer(ObserverId::new(5), map.id)
    }

    fn obstacle(map: &Map) -> Obstacle {
        Obstacle::from_input(ObstacleInput { x: 3, y: 4 }).into_obstacle(ObstacleId::new(6), map.id)
    }

    #[test]
    fn plain_collection_lists_data_only() {
        let renderer = Renderer::default();
        let maps = [map("Grid A", 1), map("Grid B", 2)];
        let body = renderer.map_collection(&maps, Representation::Plain);
        assert_eq!(
            body,
            json!({"maps": [
                {"name": "Grid A", "slug": "grid-a", "width": 10, "height": 10},
                {"name": "Grid B", "slug": "grid-b", "width": 10, "height": 10}
            ]})
        );
    }

    #[test]
    fn hypermedia_collection_controls() {
        let renderer = Renderer::default();
        let maps = [map("Grid A", 1)];
        let body = renderer.map_collection(&maps, Representation::Hypermedia);

        assert_eq!(body["@controls"]["self"]["href"], "/api/maps/");
        assert_eq!(body["@controls"]["gridmap:create-map"]["method"], "POST");
        assert_eq!(body["@controls"]["profile"]["href"], "/profiles/map/");
        assert_eq!(
            body["maps"][0]["@controls"],
            json!({"self": {"href": "/api/maps/grid-a/"}})
        );
        assert!(body["maps"][0].get("observers").is_none());
        assert_eq!(body["@namespaces"]["gridmap"]["name"], "/gridmap/link-relations/");
    }

    #[test]
    fn empty_map_item_has_empty_relation_arrays() {
        let renderer = Renderer::default();
        let map = map("Grid A", 1);
        let body = renderer.map_item(&map, &[], &[], Representation::Plain);
        assert_eq!(
            body,
            json!({
                "name": "Grid A", "slug": "grid-a", "width": 10, "height": 10,
                "observers": [], "obstacles": []
            })
        );
    }

    #[test]
    fn hypermedia_map_item_nests_minimal_controls() {
        let renderer = Renderer::default();
        let map = map("Grid A", 1);
        let observers = [observer(&map)];
        let obstacles = [obstacle(&map)];
        let body = renderer.map_item(&map, &observers, &obstacles, Representation::Hypermedia);

        let controls = body["@controls"].as_object().unwrap();
        let mut names: Vec<&str> = controls.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "collection",
                "edit",
                "gridmap:create-observer",
                "gridmap:create-obstacle",
                "gridmap:delete",
                "profile",
                "self"
            ]
        );
        assert_eq!(
            body["observers"][0]["@controls"],
            json!({"self": {"href": "/api/maps/grid-a/observers/o1/"}})
        );
        assert_eq!(
            body["obstacles"][0]["@controls"],
            json!({"gridmap:delete": {
                "href": "/api/maps/grid-a/obstacles/3/4/",
                "method": "DELETE",
                "title": "Delete this obstacle"
            }})
        );
        assert!(body["observers"][0].get("map_name").is_none());
    }

    #[test]
    fn data_portion_matches_plain() {
        let renderer = Renderer::default();
        let map = map("Grid A", 1);
        let observers = [observer(&map)];
        let obstacles = [obstacle(&map)];
        let plain = renderer.map_item(&map, &observers, &obstacles, Representation::Plain);
        let mut mason =
            renderer.map_item(&map, &observers, &obstacles, Representation::Hypermedia);

        let strip = |value: &mut Value| {
            if let Some(object) = value.as_object_mut() {
                object.retain(|key, _| !key.starts_with('@'));
            }
        };
        strip(&mut mason);
        for key in ["observers", "obstacles"] {
            for item in mason[key].as_array_mut().unwrap() {
                strip(item);
            }
        }
        assert_eq!(plain, mason);
    }

    #[test]
    fn observer_item_includes_owning_map() {
        let renderer = Renderer::default();
        let map = map("Grid A", 1);
        let observer = observer(&map);
        let body = renderer.observer_item(&map, &observer, Representation::Plain);
        assert_eq!(
            body,
            json!({
                "name": "O1", "slug": "o1", "vision": null, "x": 1, "y": 2,
                "map_name": "Grid A", "map_slug": "grid-a"
            })
        );

        let mason = renderer.observer_item(&map, &observer, Representation::Hypermedia);
        assert_eq!(mason["@controls"]["up"]["href"], "/api/maps/grid-a/");
        assert_eq!(mason["@controls"]["edit"]["method"], "PUT");
        assert_eq!(mason["@controls"]["profile"]["href"], "/profiles/observer/");
        assert_eq!(mason["@namespaces"]["gridmap"]["name"], "/gridmap/link-relations/");
    }

    #[test]
    fn advertised_schemas_accept_valid_documents() {
        let renderer = Renderer::default();
        let map = map("Grid A", 1);
        let body = renderer.map_item(&map, &[], &[], Representation::Hypermedia);
        let schema = &body["@controls"]["gridmap:create-observer"]["schema"];
        let compiled = jsonschema::JSONSchema::compile(schema).unwrap();
        assert!(compiled.is_valid(&json!({"name": "O2", "x": 0, "y": 0})));
        assert!(!compiled.is_valid(&json!({"name": "O2", "x": -1, "y": 0})));
    }

    #[test]
    fn error_document() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer.error("Conflict", "A map named 'Grid A' already exists"),
            json!({
                "@error": {
                    "@message": "Conflict",
                    "@messages": ["A map named 'Grid A' already exists"]
                },
                "@controls": {"profile": {"href": "/profiles/error/"}}
            })
        );
    }
}
