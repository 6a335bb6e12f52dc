//! Obstacle entity
//!
//! Obstacles have no name. They are addressed by `(map, x, y)` and a delete
//! removes every obstacle on that tile.

use crate::entity::{Entity, EntityKind, Placed};
use crate::ids::{MapId, ObstacleId};
use crate::map::Map;
use serde::Deserialize;
use serde_json::{Map as Fields, Value};

/// Persisted obstacle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub map_id: MapId,
    pub x: u32,
    pub y: u32,
}

/// Obstacle input document (already schema-checked)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObstacleInput {
    pub x: u32,
    pub y: u32,
}

/// Obstacle that has not been inserted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewObstacle {
    pub x: u32,
    pub y: u32,
}

impl NewObstacle {
    /// Attach store identifier and owning map
    #[inline]
    #[must_use]
    pub fn into_obstacle(self, id: ObstacleId, map_id: MapId) -> Obstacle {
        Obstacle {
            id,
            map_id,
            x: self.x,
            y: self.y,
        }
    }
}

impl Placed for NewObstacle {
    fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

impl Entity for Obstacle {
    const KIND: EntityKind = EntityKind::Obstacle;
    type Input = ObstacleInput;
}

impl Placed for Obstacle {
    fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

impl Obstacle {
    /// Build a new obstacle from input
    #[inline]
    #[must_use]
    pub fn from_input(input: ObstacleInput) -> NewObstacle {
        NewObstacle {
            x: input.x,
            y: input.y,
        }
    }

    /// Client-visible data fields
    #[must_use]
    pub fn fields(&self) -> Fields<String, Value> {
        let mut fields = Fields::new();
        fields.insert("x".to_string(), Value::from(self.x));
        fields.insert("y".to_string(), Value::from(self.y));
        fields
    }

    /// Data fields plus the name and slug of the owning map
    #[must_use]
    pub fn fields_with_map(&self, map: &Map) -> Fields<String, Value> {
        let mut fields = self.fields();
        fields.insert("map_name".to_string(), Value::from(map.name.clone()));
        fields.insert("map_slug".to_string(), Value::from(map.slug.as_str()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_fields_are_position_only() {
        let obstacle = Obstacle::from_input(ObstacleInput { x: 5, y: 6 })
            .into_obstacle(ObstacleId::new(1), MapId::new(2));
        let fields = obstacle.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["x"], 5);
        assert_eq!(obstacle.position(), (5, 6));
    }
}
