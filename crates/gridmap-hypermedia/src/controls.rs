//! Control decision table
//!
//! Which controls a hypermedia body carries depends only on what is being
//! rendered and whether it is the main subject of the response. Both are
//! looked up in [`CONTROL_TABLE`]; nothing else decides.
//!
//! | Subject        | Primary                                                   | Nested   |
//! |----------------|-----------------------------------------------------------|----------|
//! | map collection | self, create-map, profile                                 | -        |
//! | map            | self, collection, edit, delete, profile, create-observer, create-obstacle | self |
//! | observer       | self, up, edit, delete, profile                           | self     |
//! | obstacle       | delete                                                    | delete   |

use crate::document::Control;
use crate::relations::{Relation, MAP_PROFILE, OBSERVER_PROFILE};
use gridmap_model::{Entity, Map, Observer, Obstacle, ResourcePaths};

/// Whether a document is the main subject or embedded in another's relation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Main subject of the response
    Primary,
    /// Item inside a relation array
    Nested,
}

/// Kind of thing a control row applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    /// `/maps/`
    MapCollection,
    /// A map item
    Map,
    /// An observer item
    Observer,
    /// An obstacle; has no GET endpoint of its own
    Obstacle,
}

/// Concrete subject with the data needed to build hrefs
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// The map collection
    MapCollection,
    /// A map
    Map(&'a Map),
    /// An observer and its map
    Observer {
        /// Owning map
        map: &'a Map,
        /// The observer
        observer: &'a Observer,
    },
    /// An obstacle and its map
    Obstacle {
        /// Owning map
        map: &'a Map,
        /// The obstacle
        obstacle: &'a Obstacle,
    },
}

impl Subject<'_> {
    /// Row key of this subject
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        match self {
            Self::MapCollection => SubjectKind::MapCollection,
            Self::Map(_) => SubjectKind::Map,
            Self::Observer { .. } => SubjectKind::Observer,
            Self::Obstacle { .. } => SubjectKind::Obstacle,
        }
    }
}

/// Relations advertised per subject and context, in document order
pub const CONTROL_TABLE: &[(SubjectKind, Context, &[Relation])] = &[
    (
        SubjectKind::MapCollection,
        Context::Primary,
        &[Relation::SelfLink, Relation::CreateMap, Relation::Profile],
    ),
    (
        SubjectKind::Map,
        Context::Primary,
        &[
            Relation::SelfLink,
            Relation::Collection,
            Relation::Edit,
            Relation::Delete,
            Relation::Profile,
            Relation::CreateObserver,
            Relation::CreateObstacle,
        ],
    ),
    (SubjectKind::Map, Context::Nested, &[Relation::SelfLink]),
    (
        SubjectKind::Observer,
        Context::Primary,
        &[
            Relation::SelfLink,
            Relation::Up,
            Relation::Edit,
            Relation::Delete,
            Relation::Profile,
        ],
    ),
    (SubjectKind::Observer, Context::Nested, &[Relation::SelfLink]),
    (SubjectKind::Obstacle, Context::Primary, &[Relation::Delete]),
    (SubjectKind::Obstacle, Context::Nested, &[Relation::Delete]),
];

/// Relations for a table row; empty when the row does not exist
#[must_use]
pub fn relations_for(kind: SubjectKind, context: Context) -> &'static [Relation] {
    CONTROL_TABLE
        .iter()
        .find(|(k, c, _)| *k == kind && *c == context)
        .map_or(&[], |(_, _, relations)| relations)
}

/// Builds controls from the decision table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlTable {
    paths: ResourcePaths,
}

impl ControlTable {
    /// Create table emitting hrefs under `paths`
    #[inline]
    #[must_use]
    pub fn new(paths: ResourcePaths) -> Self {
        Self { paths }
    }

    /// Path builder used for hrefs
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    /// Controls for a subject in a context
    #[must_use]
    pub fn controls(&self, subject: Subject<'_>, context: Context) -> Vec<(Relation, Control)> {
        relations_for(subject.kind(), context)
            .iter()
            .filter_map(|&relation| {
                self.control(subject, relation)
                    .map(|control| (relation, control))
            })
            .collect()
    }

    fn control(&self, subject: Subject<'_>, relation: Relation) -> Option<Control> {
        let paths = &self.paths;
        let control = match (subject, relation) {
            (Subject::MapCollection, Relation::SelfLink) => Control::link(paths.map_collection()),
            (Subject::MapCollection, Relation::CreateMap) => {
                Control::post(paths.map_collection(), "Create a new map", Map::schema())
            }
            (Subject::MapCollection | Subject::Map(_), Relation::Profile) => {
                Control::link(MAP_PROFILE)
            }

            (Subject::Map(map), Relation::SelfLink) => Control::link(paths.map_item(map)),
            (Subject::Map(_), Relation::Collection) => Control::link(paths.map_collection()),
            (Subject::Map(map), Relation::Edit) => {
                Control::put(paths.map_item(map), "Update this map", Map::schema())
            }
            (Subject::Map(map), Relation::Delete) => {
                Control::delete(paths.map_item(map), "Delete this map")
            }
            (Subject::Map(map), Relation::CreateObserver) => Control::post(
                paths.map_observers(map),
                "Place a new observer on this map",
                Observer::schema(),
            ),
            (Subject::Map(map), Relation::CreateObstacle) => Control::post(
                paths.map_obstacles(map),
                "Place a new obstacle on this map",
                Obstacle::schema(),
            ),

            (Subject::Observer { map, observer }, Relation::SelfLink) => {
                Control::link(paths.observer_item(map, observer))
            }
            (Subject::Observer { map, .. }, Relation::Up) => Control::link(paths.map_item(map)),
            (Subject::Observer { map, observer }, Relation::Edit) => Control::put(
                paths.observer_item(map, observer),
                "Update this observer",
                Observer::schema(),
            ),
            (Subject::Observer { map, observer }, Relation::Delete) => Control::delete(
                paths.observer_item(map, observer),
                "Delete this observer",
            ),
            (Subject::Observer { .. }, Relation::Profile) => Control::link(OBSERVER_PROFILE),

            (Subject::Obstacle { map, obstacle }, Relation::Delete) => Control::delete(
                paths.obstacle_item(map, obstacle),
                "Delete this obstacle",
            ),

            _ => return None,
        };
        Some(control)
    }
}
