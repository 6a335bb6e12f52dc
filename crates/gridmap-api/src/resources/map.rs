//! Map collection and map item

use crate::error::{ApiError, ApiResult};
use crate::invalidation;
use crate::negotiation::json_body;
use crate::response::ApiResponse;
use crate::state::AppState;
use gridmap_model::{Map, Representation};

/// `GET /maps/`
pub async fn list(state: &AppState, representation: Representation) -> ApiResult<ApiResponse> {
    state
        .cached(representation, state.paths.map_collection(), move || async move {
            let maps = state.store.list_maps().await?;
            Ok::<_, ApiError>(state.renderer.map_collection(&maps, representation))
        })
        .await
}

/// `POST /maps/`
pub async fn create(
    state: &AppState,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiResult<ApiResponse> {
    let document = json_body(content_type, body)?;
    let input = state.validator.parse::<Map>(&document)?;
    let draft = Map::from_input(input)?;

    let map = state.store.insert_map(draft).await?;
    state
        .invalidate(&invalidation::map_created(&state.paths, &map))
        .await;
    tracing::info!(id = %map.id, slug = %map.slug, "map created");
    Ok(ApiResponse::created(state.paths.map_item(&map)))
}

/// `GET /maps/{map}/`
pub async fn get(
    state: &AppState,
    slug: &str,
    representation: Representation,
) -> ApiResult<ApiResponse> {
    state
        .cached(representation, state.paths.map_item_slug(slug), move || async move {
            let map = state.resolve_map(slug).await?;
            let children = state.store.map_children(map.id).await?;
            Ok::<_, ApiError>(state.renderer.map_item(
                &map,
                &children.observers,
                &children.obstacles,
                representation,
            ))
        })
        .await
}

/// `PUT /maps/{map}/`
///
/// Replaces name, width and height. The slug follows the name, so a
/// rename moves the map to a new path.
pub async fn update(
    state: &AppState,
    slug: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiResult<ApiResponse> {
    let current = state.resolve_map(slug).await?;
    let document = json_body(content_type, body)?;
    let input = state.validator.parse::<Map>(&document)?;
    let mut updated = current.clone();
    updated.update_from_input(input)?;

    // Shrinking below a child, or a rename committed since the lookup,
    // is rejected by the store inside the update
    let update = state.store.update_map(&updated, &current.slug).await?;
    state
        .invalidate(&invalidation::map_updated(
            &state.paths,
            &update.previous,
            &updated,
            &update.observers,
        ))
        .await;
    tracing::info!(id = %updated.id, from = %current.slug, to = %updated.slug, "map updated");
    Ok(ApiResponse::no_content())
}

/// `DELETE /maps/{map}/`
///
/// Deleting a map that is already gone succeeds the same way.
pub async fn delete(state: &AppState, slug: &str) -> ApiResult<ApiResponse> {
    let Some(map) = state.store.map_by_slug(slug).await? else {
        tracing::debug!(%slug, "map already absent");
        return Ok(ApiResponse::no_content());
    };
    let Some(removed) = state.store.delete_map(map.id).await? else {
        tracing::debug!(%slug, "map removed concurrently");
        return Ok(ApiResponse::no_content());
    };
    // The row may have been renamed since the lookup
    state
        .invalidate(&invalidation::map_deleted(
            &state.paths,
            &removed.map,
            &removed.children.observers,
        ))
        .await;
    tracing::info!(
        id = %removed.map.id,
        slug = %removed.map.slug,
        observers = removed.children.observers.len(),
        obstacles = removed.children.obstacles.len(),
        "map deleted"
    );
    Ok(ApiResponse::no_content())
}
