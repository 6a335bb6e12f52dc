//! Slugs: URL-safe identifiers derived from names
//!
//! A slug is a pure function of a name. It is recomputed on every name
//! change and is never accepted from clients.

use crate::entity::EntityKind;
use crate::error::{ModelError, ModelResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("separator pattern is a valid regex"));

/// Normalized, URL-safe identifier
///
/// # Examples
/// - `"Grid A"` → `grid-a`
/// - `"  Test  Observer #1 "` → `test-observer-1`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive slug from a name
    ///
    /// Lowercases the name, collapses every run of non-alphanumeric
    /// characters into a single hyphen and strips leading and trailing
    /// hyphens.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let joined = SEPARATORS.replace_all(&lowered, "-");
        Self(joined.trim_matches('-').to_string())
    }

    /// Slug text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if derivation left nothing addressable
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Derive the slug for a named entity, rejecting names with nothing addressable
pub(crate) fn derive_slug(kind: EntityKind, name: &str) -> ModelResult<Slug> {
    let slug = Slug::from_name(name);
    if slug.is_empty() {
        return Err(ModelError::schema(
            kind,
            format!("name {name:?} must contain at least one letter or digit"),
        ));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slug_from_simple_name() {
        assert_eq!(Slug::from_name("Grid A"), "grid-a");
        assert_eq!(Slug::from_name("Test Map 1"), "test-map-1");
    }

    #[test]
    fn slug_collapses_and_trims_separators() {
        assert_eq!(Slug::from_name("  Test  Observer #1 "), "test-observer-1");
        assert_eq!(Slug::from_name("a--b__c"), "a-b-c");
    }

    #[test]
    fn slug_of_symbols_is_empty() {
        assert!(Slug::from_name("!!!").is_empty());
        assert!(Slug::from_name("").is_empty());
    }

    #[test]
    fn derive_rejects_unaddressable_names() {
        let err = derive_slug(EntityKind::Map, "???").unwrap_err();
        assert!(matches!(err, ModelError::SchemaViolation { .. }));
        assert_eq!(derive_slug(EntityKind::Map, "Grid A").unwrap(), "grid-a");
    }

    #[test]
    fn slug_serializes_as_plain_string() {
        let slug = Slug::from_name("Valid Map A");
        assert_eq!(serde_json::to_value(&slug).unwrap(), "valid-map-a");
    }

    proptest! {
        #[test]
        fn slug_is_url_safe(name in ".{0,32}") {
            let slug = Slug::from_name(&name);
            prop_assert!(slug
                .as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.as_str().starts_with('-'));
            prop_assert!(!slug.as_str().ends_with('-'));
            prop_assert!(!slug.as_str().contains("--"));
        }

        #[test]
        fn slug_is_idempotent(name in "[ -~]{0,32}") {
            let once = Slug::from_name(&name);
            let twice = Slug::from_name(once.as_str());
            prop_assert_eq!(once, twice);
        }
    }
}
