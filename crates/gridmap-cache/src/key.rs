//! Cache keys and invalidation sets

use gridmap_model::Representation;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Key of one cached response
///
/// A path has one entry per representation. Serving the plain body to a
/// hypermedia client (or the reverse) is a correctness bug, so the
/// representation is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    representation: Representation,
    path: String,
}

impl CacheKey {
    /// Create key for a representation of a canonical path
    #[inline]
    #[must_use]
    pub fn new(representation: Representation, path: impl Into<String>) -> Self {
        Self {
            representation,
            path: path.into(),
        }
    }

    /// Keys of every representation of a path
    #[must_use]
    pub fn all_for(path: &str) -> [Self; 2] {
        Representation::ALL.map(|representation| Self::new(representation, path))
    }

    /// Representation of the cached body
    #[inline]
    #[must_use]
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Canonical resource path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.representation.tag(), self.path)
    }
}

/// Set of keys removed together after a committed mutation
///
/// Paths are added whole: adding a path adds the key of every
/// representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationSet {
    keys: BTreeSet<CacheKey>,
}

impl InvalidationSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every representation of a path, builder style
    #[must_use]
    pub fn with_path(mut self, path: impl AsRef<str>) -> Self {
        self.add_path(path);
        self
    }

    /// Add every representation of a path
    pub fn add_path(&mut self, path: impl AsRef<str>) {
        self.keys.extend(CacheKey::all_for(path.as_ref()));
    }

    /// Check if a key is part of the set
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.keys.contains(key)
    }

    /// Check if every representation of a path is part of the set
    #[must_use]
    pub fn covers_path(&self, path: &str) -> bool {
        CacheKey::all_for(path).iter().all(|key| self.contains(key))
    }

    /// Distinct paths in the set
    #[must_use]
    pub fn paths(&self) -> BTreeSet<&str> {
        self.keys.iter().map(CacheKey::path).collect()
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over keys
    pub fn iter(&self) -> impl Iterator<Item = &CacheKey> {
        self.keys.iter()
    }
}

impl<'a> IntoIterator for &'a InvalidationSet {
    type Item = &'a CacheKey;
    type IntoIter = std::collections::btree_set::Iter<'a, CacheKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_matches_view_prefix() {
        let key = CacheKey::new(Representation::Hypermedia, "/api/maps/");
        assert_eq!(key.to_string(), "mason-view//api/maps/");
    }

    #[test]
    fn keys_differ_by_representation() {
        let [plain, mason] = CacheKey::all_for("/api/maps/");
        assert_ne!(plain, mason);
        assert_eq!(plain.path(), mason.path());
    }

    #[test]
    fn adding_a_path_adds_both_representations() {
        let set = InvalidationSet::new()
            .with_path("/api/maps/")
            .with_path("/api/maps/grid-a/")
            .with_path("/api/maps/");
        assert_eq!(set.len(), 4);
        assert!(set.covers_path("/api/maps/grid-a/"));
        assert!(!set.covers_path("/api/maps/grid-b/"));
        assert_eq!(set.paths().len(), 2);
    }
}
