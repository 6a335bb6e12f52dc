//! Error types for the persistence gateway

use gridmap_model::EntityKind;

/// Errors signalled by a persistence gateway
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A committed row already holds this unique value
    #[error("{kind} {field} '{value}' already exists")]
    UniquenessConflict {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    /// A child would sit outside its map, checked again at commit time
    #[error("{kind} at ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds {
        kind: EntityKind,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// The row to update, or the parent to insert under, no longer exists
    #[error("{kind} not found")]
    NotFound { kind: EntityKind },

    /// Storage engine failure
    #[error("storage failure: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create uniqueness conflict
    pub fn conflict(kind: EntityKind, field: &'static str, value: impl Into<String>) -> Self {
        Self::UniquenessConflict {
            kind,
            field,
            value: value.into(),
        }
    }

    /// Check if error is a uniqueness conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UniquenessConflict { .. })
    }
}

impl StoreError {
    fn out_of_bounds(kind: EntityKind, (x, y): (u32, u32), width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            kind,
            x,
            y,
            width,
            height,
        }
    }

    /// Fail unless `position` lies on `map`
    pub(crate) fn check_tile(
        kind: EntityKind,
        map: &gridmap_model::Map,
        position: (u32, u32),
    ) -> StoreResult<()> {
        if map.contains(position.0, position.1) {
            Ok(())
        } else {
            Err(Self::out_of_bounds(kind, position, map.width, map.height))
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_display() {
        let err = StoreError::conflict(EntityKind::Map, "name", "Grid A");
        assert_eq!(err.to_string(), "map name 'Grid A' already exists");
        assert!(err.is_conflict());
    }

    #[test]
    fn not_found_is_not_conflict() {
        assert!(!StoreError::NotFound { kind: EntityKind::Observer }.is_conflict());
    }
}
