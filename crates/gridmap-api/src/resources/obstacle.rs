//! Obstacles of a map
//!
//! Obstacles have no identity of their own in the API: they are created
//! through the map and deleted by tile.

use crate::error::ApiResult;
use crate::invalidation;
use crate::negotiation::json_body;
use crate::response::ApiResponse;
use crate::state::AppState;
use gridmap_model::{check_bounds, EntityKind, Obstacle};

/// `POST /maps/{map}/obstacles/`
pub async fn create(
    state: &AppState,
    map_slug: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiResult<ApiResponse> {
    let map = state.resolve_map(map_slug).await?;
    let document = json_body(content_type, body)?;
    let input = state.validator.parse::<Obstacle>(&document)?;
    let draft = Obstacle::from_input(input);
    check_bounds(EntityKind::Obstacle, &map, &draft)?;

    let committed = state.store.insert_obstacle(map.id, draft).await?;
    let (map, obstacle) = (committed.map, committed.value);
    state
        .invalidate(&invalidation::obstacles_changed(&state.paths, &map))
        .await;
    tracing::info!(id = %obstacle.id, map = %map.slug, x = obstacle.x, y = obstacle.y, "obstacle created");
    Ok(ApiResponse::created(state.paths.obstacle_item(&map, &obstacle)))
}

/// `DELETE /maps/{map}/obstacles/{x}/{y}/`
///
/// Removes every obstacle on the tile. An empty tile or a map that is
/// already gone is not an error.
pub async fn delete(state: &AppState, map_slug: &str, x: u32, y: u32) -> ApiResult<ApiResponse> {
    let Some(map) = state.store.map_by_slug(map_slug).await? else {
        return Ok(ApiResponse::no_content());
    };
    let Some(removed) = state.store.delete_obstacles_at(map.id, x, y).await? else {
        return Ok(ApiResponse::no_content());
    };
    state
        .invalidate(&invalidation::obstacles_changed(&state.paths, &removed.map))
        .await;
    tracing::info!(map = %removed.map.slug, x, y, removed = removed.value, "obstacles deleted");
    Ok(ApiResponse::no_content())
}
