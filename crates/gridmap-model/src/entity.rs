//! Entity trait
//!
//! Defines the interface shared by the three grid world entities. Each
//! entity declares its input document type and the JSON schema that input
//! must satisfy before it is deserialized.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// The kinds of entity stored in the grid world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Tile grid owning observers and obstacles
    Map,
    /// Named viewer placed on a map tile
    Observer,
    /// Blocked map tile
    Obstacle,
}

impl EntityKind {
    /// All entity kinds, in schema document order
    pub const ALL: [Self; 3] = [Self::Map, Self::Observer, Self::Obstacle];

    /// Lowercase name used in messages and relation names
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Observer => "observer",
            Self::Obstacle => "obstacle",
        }
    }

    /// Capitalized name used as a schema component key
    #[inline]
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Observer => "Observer",
            Self::Obstacle => "Obstacle",
        }
    }

    /// Schema for input documents of this kind
    #[must_use]
    pub fn schema(self) -> Value {
        match self {
            Self::Map => crate::schema::map_schema(),
            Self::Observer => crate::schema::observer_schema(),
            Self::Obstacle => crate::schema::obstacle_schema(),
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for grid world entities
///
/// `Input` is the deserialized, schema-checked request document. It never
/// carries an id or a slug: ids come from the store and slugs are derived
/// from names.
pub trait Entity: Send + Sync + 'static {
    /// Entity kind tag
    const KIND: EntityKind;

    /// Deserialized input document
    type Input: DeserializeOwned;

    /// JSON schema advertised in controls and enforced on input
    #[must_use]
    fn schema() -> Value {
        Self::KIND.schema()
    }
}

/// Something occupying a tile of a map
pub trait Placed {
    /// Tile coordinates as `(x, y)`
    fn position(&self) -> (u32, u32);
}
