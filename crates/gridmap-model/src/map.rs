//! Map entity
//!
//! A map is a `width × height` tile grid. It owns the observers and
//! obstacles placed on it: the store deletes them together with the map.

use crate::entity::{Entity, EntityKind};
use crate::error::ModelResult;
use crate::ids::MapId;
use crate::slug::{derive_slug, Slug};
use serde::Deserialize;
use serde_json::{Map as Fields, Value};

/// Persisted map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    /// Store-assigned identifier
    pub id: MapId,
    /// Display name, globally unique
    pub name: String,
    /// Slug derived from `name`, globally unique
    pub slug: Slug,
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
}

/// Map input document (already schema-checked)
///
/// Unknown keys such as `slug` or `id` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapInput {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Map that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMap {
    pub name: String,
    pub slug: Slug,
    pub width: u32,
    pub height: u32,
}

impl NewMap {
    /// Attach the identifier assigned by the store
    #[inline]
    #[must_use]
    pub fn into_map(self, id: MapId) -> Map {
        Map {
            id,
            name: self.name,
            slug: self.slug,
            width: self.width,
            height: self.height,
        }
    }
}

impl Entity for Map {
    const KIND: EntityKind = EntityKind::Map;
    type Input = MapInput;
}

impl Map {
    /// Build a new map from input, deriving its slug from the name
    ///
    /// # Errors
    /// Returns a schema violation if the name has no letters or digits.
    pub fn from_input(input: MapInput) -> ModelResult<NewMap> {
        let slug = derive_slug(EntityKind::Map, &input.name)?;
        Ok(NewMap {
            name: input.name,
            slug,
            width: input.width,
            height: input.height,
        })
    }

    /// Replace all attributes from input; the slug follows the new name
    ///
    /// Leaves the map untouched on error.
    ///
    /// # Errors
    /// Returns a schema violation if the name has no letters or digits.
    pub fn update_from_input(&mut self, input: MapInput) -> ModelResult<()> {
        let slug = derive_slug(EntityKind::Map, &input.name)?;
        self.name = input.name;
        self.slug = slug;
        self.width = input.width;
        self.height = input.height;
        Ok(())
    }

    /// Check if a tile lies inside this map
    #[inline]
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Client-visible data fields
    #[must_use]
    pub fn fields(&self) -> Fields<String, Value> {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("slug".to_string(), Value::from(self.slug.as_str()));
        fields.insert("width".to_string(), Value::from(self.width));
        fields.insert("height".to_string(), Value::from(self.height));
        fields
    }
}
