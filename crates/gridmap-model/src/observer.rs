//! Observer entity

use crate::entity::{Entity, EntityKind, Placed};
use crate::error::ModelResult;
use crate::ids::{MapId, ObserverId};
use crate::map::Map;
use crate::slug::{derive_slug, Slug};
use serde::Deserialize;
use serde_json::{Map as Fields, Value};

/// Persisted observer
///
/// `map_id` is a back-reference used for lookup only; the owning map
/// controls the observer's lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub id: ObserverId,
    /// Display name, unique across all maps
    pub name: String,
    pub slug: Slug,
    /// Vision range; `None` means unlimited
    pub vision: Option<f64>,
    pub map_id: MapId,
    pub x: u32,
    pub y: u32,
}

/// Observer input document (already schema-checked)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObserverInput {
    pub name: String,
    #[serde(default)]
    pub vision: Option<f64>,
    pub x: u32,
    pub y: u32,
}

/// Observer that has not been inserted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewObserver {
    pub name: String,
    pub slug: Slug,
    pub vision: Option<f64>,
    pub x: u32,
    pub y: u32,
}

impl NewObserver {
    /// Attach store identifier and owning map
    #[inline]
    #[must_use]
    pub fn into_observer(self, id: ObserverId, map_id: MapId) -> Observer {
        Observer {
            id,
            name: self.name,
            slug: self.slug,
            vision: self.vision,
            map_id,
            x: self.x,
            y: self.y,
        }
    }
}

impl Placed for NewObserver {
    fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

impl Entity for Observer {
    const KIND: EntityKind = EntityKind::Observer;
    type Input = ObserverInput;
}

impl Placed for Observer {
    fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

impl Observer {
    /// Build a new observer from input, deriving its slug from the name
    ///
    /// # Errors
    /// Returns a schema violation if the name has no letters or digits.
    pub fn from_input(input: ObserverInput) -> ModelResult<NewObserver> {
        let slug = derive_slug(EntityKind::Observer, &input.name)?;
        Ok(NewObserver {
            name: input.name,
            slug,
            vision: input.vision,
            x: input.x,
            y: input.y,
        })
    }

    /// Replace all attributes from input
    ///
    /// An omitted `vision` resets the observer to unlimited vision.
    ///
    /// # Errors
    /// Returns a schema violation if the name has no letters or digits.
    pub fn update_from_input(&mut self, input: ObserverInput) -> ModelResult<()> {
        let slug = derive_slug(EntityKind::Observer, &input.name)?;
        self.name = input.name;
        self.slug = slug;
        self.vision = input.vision;
        self.x = input.x;
        self.y = input.y;
        Ok(())
    }

    /// Client-visible data fields
    #[must_use]
    pub fn fields(&self) -> Fields<String, Value> {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("slug".to_string(), Value::from(self.slug.as_str()));
        fields.insert("vision".to_string(), self.vision.map_or(Value::Null, Value::from));
        fields.insert("x".to_string(), Value::from(self.x));
        fields.insert("y".to_string(), Value::from(self.y));
        fields
    }

    /// Data fields plus the name and slug of the owning map
    #[must_use]
    pub fn fields_with_map(&self, map: &Map) -> Fields<String, Value> {
        let mut fields = self.fields();
        fields.insert("map_name".to_string(), Value::from(map.name.clone()));
        fields.insert("map_slug".to_string(), Value::from(map.slug.as_str()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observer() -> Observer {
        let input: ObserverInput =
            serde_json::from_value(json!({"name": "Test Observer 1", "x": 1, "y": 2})).unwrap();
        Observer::from_input(input)
            .unwrap()
            .into_observer(ObserverId::new(5), MapId::new(1))
    }

    #[test]
    fn vision_defaults_to_unlimited() {
        let observer = observer();
        assert_eq!(observer.vision, None);
        assert_eq!(observer.fields()["vision"], Value::Null);
    }

    #[test]
    fn update_resets_omitted_vision() {
        let mut observer = observer();
        observer.vision = Some(3.5);
        let input: ObserverInput =
            serde_json::from_value(json!({"name": "Renamed", "x": 4, "y": 4})).unwrap();
        observer.update_from_input(input).unwrap();
        assert_eq!(observer.vision, None);
        assert_eq!(observer.slug, "renamed");
        assert_eq!(observer.position(), (4, 4));
    }

    #[test]
    fn fields_with_map_include_back_reference() {
        let map = Map::from_input(crate::MapInput {
            name: "Test Map 1".to_string(),
            width: 10,
            height: 10,
        })
        .unwrap()
        .into_map(MapId::new(1));
        let fields = observer().fields_with_map(&map);
        assert_eq!(fields["map_name"], "Test Map 1");
        assert_eq!(fields["map_slug"], "test-map-1");
        assert_eq!(fields["slug"], "test-observer-1");
    }
}
