//! Link relations and profiles

use std::fmt::{self, Display, Formatter};

/// Namespace prefix of the custom link relations
pub const NAMESPACE: &str = "gridmap";

/// URI identifying the custom link relation namespace
pub const LINK_RELATIONS: &str = "/gridmap/link-relations/";

/// Profile of the map collection and map items
pub const MAP_PROFILE: &str = "/profiles/map/";

/// Profile of observer items
pub const OBSERVER_PROFILE: &str = "/profiles/observer/";

/// Profile of error documents
pub const ERROR_PROFILE: &str = "/profiles/error/";

/// Relation name of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// `self`
    SelfLink,
    /// `collection`
    Collection,
    /// `up`
    Up,
    /// `edit`
    Edit,
    /// `profile`
    Profile,
    /// `gridmap:delete`
    Delete,
    /// `gridmap:create-map`
    CreateMap,
    /// `gridmap:create-observer`
    CreateObserver,
    /// `gridmap:create-obstacle`
    CreateObstacle,
}

impl Relation {
    /// Relation name as it appears in `@controls`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SelfLink => "self",
            Self::Collection => "collection",
            Self::Up => "up",
            Self::Edit => "edit",
            Self::Profile => "profile",
            Self::Delete => "gridmap:delete",
            Self::CreateMap => "gridmap:create-map",
            Self::CreateObserver => "gridmap:create-observer",
            Self::CreateObstacle => "gridmap:create-obstacle",
        }
    }

    /// Check if the relation lives in the custom namespace
    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(
            self,
            Self::Delete | Self::CreateMap | Self::CreateObserver | Self::CreateObstacle
        )
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_relations_carry_namespace_prefix() {
        for relation in [
            Relation::Delete,
            Relation::CreateMap,
            Relation::CreateObserver,
            Relation::CreateObstacle,
        ] {
            assert!(relation.is_custom());
            assert!(relation.name().starts_with("gridmap:"));
        }
    }

    #[test]
    fn iana_relations_are_bare() {
        for relation in [
            Relation::SelfLink,
            Relation::Collection,
            Relation::Up,
            Relation::Edit,
            Relation::Profile,
        ] {
            assert!(!relation.is_custom());
            assert!(!relation.name().contains(':'));
        }
    }
}
