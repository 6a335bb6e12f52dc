//! Validation pipeline
//!
//! Two gates, always in this order:
//! 1. [`SchemaValidator`] checks the input document against the entity
//!    schema and deserializes it. Nothing has been loaded or written yet.
//! 2. [`check_bounds`] checks a child position against the parent map as
//!    it is right now. Runs after the parent handle is resolved and before
//!    any write.

use crate::entity::{Entity, EntityKind, Placed};
use crate::error::{ModelError, ModelResult};
use crate::map::Map;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fmt;

/// Compiled entity schemas
///
/// Compile once at startup and share; compiled schemas are immutable.
pub struct SchemaValidator {
    map: JSONSchema,
    observer: JSONSchema,
    obstacle: JSONSchema,
}

impl SchemaValidator {
    /// Compile the schemas of all entity kinds
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidSchema`] if a schema does not compile.
    pub fn new() -> ModelResult<Self> {
        Ok(Self {
            map: compile(EntityKind::Map)?,
            observer: compile(EntityKind::Observer)?,
            obstacle: compile(EntityKind::Obstacle)?,
        })
    }

    fn compiled(&self, kind: EntityKind) -> &JSONSchema {
        match kind {
            EntityKind::Map => &self.map,
            EntityKind::Observer => &self.observer,
            EntityKind::Obstacle => &self.obstacle,
        }
    }

    /// Check a document against the schema of `kind`
    ///
    /// # Errors
    /// Returns [`ModelError::SchemaViolation`] listing every failed check.
    pub fn validate(&self, kind: EntityKind, document: &Value) -> ModelResult<()> {
        let result = self.compiled(kind).validate(document);
        if let Err(errors) = result {
            let message = errors
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ModelError::schema(kind, message));
        }
        Ok(())
    }

    /// Validate a document and deserialize it into the entity input type
    ///
    /// Numbers the schema accepts but the input type cannot hold (for
    /// example a width beyond `u32`) are reported as schema violations.
    ///
    /// # Errors
    /// Returns [`ModelError::SchemaViolation`] on any failure.
    pub fn parse<E: Entity>(&self, document: &Value) -> ModelResult<E::Input> {
        self.validate(E::KIND, document)?;
        serde_json::from_value(document.clone()).map_err(|e| ModelError::schema(E::KIND, e.to_string()))
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("kinds", &EntityKind::ALL)
            .finish()
    }
}

fn compile(kind: EntityKind) -> ModelResult<JSONSchema> {
    let schema = kind.schema();
    JSONSchema::compile(&schema).map_err(|e| ModelError::InvalidSchema {
        kind,
        message: e.to_string(),
    })
}

/// Check that a child position lies inside the parent map
///
/// # Errors
/// Returns [`ModelError::SpatialViolation`] unless `0 ≤ x < width` and
/// `0 ≤ y < height`.
pub fn check_bounds(kind: EntityKind, map: &Map, child: &impl Placed) -> ModelResult<()> {
    let (x, y) = child.position();
    if map.contains(x, y) {
        Ok(())
    } else {
        Err(ModelError::SpatialViolation {
            kind,
            x,
            y,
            width: map.width,
            height: map.height,
        })
    }
}
