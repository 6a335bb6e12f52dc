//! Error types for the entity model
//!
//! Two client-input failures come out of the validation pipeline and they
//! must stay distinguishable:
//! - Schema violations (structure, primitive types, ranges)
//! - Spatial violations (well-typed, but outside the parent grid)

use crate::entity::EntityKind;

/// Errors raised while turning input documents into entities
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Input document does not satisfy the entity schema
    #[error("schema violation for {kind}: {message}")]
    SchemaViolation {
        kind: EntityKind,
        message: String,
    },

    /// Input places a child entity outside its parent map
    #[error("{kind} at ({x}, {y}) is outside the {width}x{height} map")]
    SpatialViolation {
        kind: EntityKind,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A built-in entity schema failed to compile
    #[error("invalid schema for {kind}: {message}")]
    InvalidSchema {
        kind: EntityKind,
        message: String,
    },
}

impl ModelError {
    /// Create schema violation for entity kind
    pub fn schema(kind: EntityKind, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            kind,
            message: message.into(),
        }
    }

    /// Check if this error was caused by the submitted input
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::SchemaViolation { .. } | Self::SpatialViolation { .. }
        )
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_violation_display() {
        let err = ModelError::SpatialViolation {
            kind: EntityKind::Observer,
            x: 20,
            y: 5,
            width: 10,
            height: 10,
        };
        assert_eq!(
            err.to_string(),
            "observer at (20, 5) is outside the 10x10 map"
        );
    }

    #[test]
    fn schema_violation_is_client_error() {
        let err = ModelError::schema(EntityKind::Map, "missing 'name'");
        assert!(err.is_client_error());
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn invalid_schema_is_not_client_error() {
        let err = ModelError::InvalidSchema {
            kind: EntityKind::Obstacle,
            message: "bad".to_string(),
        };
        assert!(!err.is_client_error());
    }
}
