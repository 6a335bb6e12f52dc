//! Gridmap Hypermedia
//!
//! Builds the two response representations of gridmap resources:
//!
//! - plain: the entity data fields only (`application/json`)
//! - hypermedia: the same data plus Mason `@controls` and `@namespaces`
//!   (`application/vnd.mason+json`)
//!
//! Controls are chosen by the explicit decision table in [`controls`],
//! keyed by subject and [`Context`].

#![warn(unreachable_pub)]

pub mod controls;
pub mod document;
pub mod relations;
pub mod render;

pub use controls::{relations_for, Context, ControlTable, Subject, SubjectKind, CONTROL_TABLE};
pub use document::{Control, ControlMethod, MasonDocument};
pub use relations::{
    Relation, ERROR_PROFILE, LINK_RELATIONS, MAP_PROFILE, NAMESPACE, OBSERVER_PROFILE,
};
pub use render::{MapView, ObserverView, ObstacleView, Renderer, Represent};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
