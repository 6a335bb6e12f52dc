//! Gridmap Model
//!
//! Entities of the grid world and the rules that bind them:
//!
//! - [`Map`] owns a tile grid of `width × height` and the observers and
//!   obstacles placed on it
//! - [`Observer`] is a named, optionally range-limited viewer on a tile
//! - [`Obstacle`] blocks a tile and is addressed only by its position
//!
//! Every write goes through the two-gate [`validation`] pipeline: schema
//! first, then spatial bounds against the parent map.
//!
//! # Example
//!
//! ```rust,ignore
//! use gridmap_model::{Map, SchemaValidator};
//! use serde_json::json;
//!
//! let validator = SchemaValidator::new()?;
//! let input = validator.parse::<Map>(&json!({"name": "Grid A", "width": 10, "height": 10}))?;
//! let draft = Map::from_input(input)?;
//! assert_eq!(draft.slug.as_str(), "grid-a");
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod entity;
pub mod error;
pub mod ids;
pub mod map;
pub mod observer;
pub mod obstacle;
pub mod paths;
pub mod representation;
pub mod schema;
pub mod slug;
pub mod validation;

// Re-exports for convenience
pub use entity::{Entity, EntityKind, Placed};
pub use error::{ModelError, ModelResult};
pub use ids::{MapId, ObserverId, ObstacleId};
pub use map::{Map, MapInput, NewMap};
pub use observer::{NewObserver, Observer, ObserverInput};
pub use obstacle::{NewObstacle, Obstacle, ObstacleInput};
pub use paths::ResourcePaths;
pub use representation::Representation;
pub use slug::Slug;
pub use validation::{check_bounds, SchemaValidator};

/// Maximum length of map and observer names
pub const MAX_NAME_LENGTH: usize = 32;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with gridmap entities
    pub use crate::{
        check_bounds, Entity, EntityKind, Map, MapId, ModelError, NewMap, NewObserver,
        NewObstacle, Observer, ObserverId, Obstacle, ObstacleId, Representation, ResourcePaths,
        SchemaValidator, Slug,
    };
}
