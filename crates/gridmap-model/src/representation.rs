//! Response representations
//!
//! The two encodings a resource can be served in. Selection from the
//! `Accept` header happens upstream; everything below that point receives
//! an already-chosen [`Representation`].

use std::fmt::{self, Display, Formatter};

/// Media type of plain data responses
pub const JSON: &str = "application/json";

/// Media type of hypermedia responses
pub const MASON: &str = "application/vnd.mason+json";

/// Response encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Representation {
    /// Data fields only
    #[default]
    Plain,
    /// Data fields plus Mason controls
    Hypermedia,
}

impl Representation {
    /// Both representations, in cache key order
    pub const ALL: [Self; 2] = [Self::Plain, Self::Hypermedia];

    /// Media type served for this representation
    #[inline]
    #[must_use]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Plain => JSON,
            Self::Hypermedia => MASON,
        }
    }

    /// Short tag used in cache keys and logs
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Plain => "json-view",
            Self::Hypermedia => "mason-view",
        }
    }

    /// Check if controls are rendered
    #[inline]
    #[must_use]
    pub const fn is_hypermedia(self) -> bool {
        matches!(self, Self::Hypermedia)
    }
}

impl Display for Representation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
