//! Entity input schemas
//!
//! Schemas are written out by hand so the advertised documents stay exactly
//! as clients see them in hypermedia controls.

use crate::MAX_NAME_LENGTH;
use serde_json::{json, Value};

/// Schema for map input
#[must_use]
pub fn map_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "width", "height"],
        "properties": {
            "name": {
                "description": "Name for the map (unique)",
                "type": "string",
                "maxLength": MAX_NAME_LENGTH
            },
            "width": {
                "description": "Map width",
                "type": "integer",
                "minimum": 1
            },
            "height": {
                "description": "Map height",
                "type": "integer",
                "minimum": 1
            }
        }
    })
}

/// Schema for observer input
#[must_use]
pub fn observer_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "x", "y"],
        "properties": {
            "name": {
                "description": "Name for referencing the observer (unique)",
                "type": "string",
                "maxLength": MAX_NAME_LENGTH
            },
            "vision": {
                "description": "Observer's vision range (infinite if omitted)",
                "type": "number",
                "minimum": 0
            },
            "x": {
                "description": "Observer's x coordinate",
                "type": "integer",
                "minimum": 0
            },
            "y": {
                "description": "Observer's y coordinate",
                "type": "integer",
                "minimum": 0
            }
        }
    })
}

/// Schema for obstacle input
#[must_use]
pub fn obstacle_schema() -> Value {
    json!({
        "type": "object",
        "required": ["x", "y"],
        "properties": {
            "x": {
                "description": "Obstacle's x coordinate",
                "type": "integer",
                "minimum": 0
            },
            "y": {
                "description": "Obstacle's y coordinate",
                "type": "integer",
                "minimum": 0
            }
        }
    })
}
