//! Store-assigned entity identifiers
//!
//! Identifiers are opaque to clients; they never appear in request or
//! response bodies and are never accepted from input.

use std::fmt::{self, Display, Formatter};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw store identifier
            #[inline]
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw store identifier
            #[inline]
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`crate::Map`]
    MapId,
    "map"
);
entity_id!(
    /// Identifier of an [`crate::Observer`]
    ObserverId,
    "observer"
);
entity_id!(
    /// Identifier of an [`crate::Obstacle`]
    ObstacleId,
    "obstacle"
);
