//! Observers of a map

use crate::error::{ApiError, ApiResult};
use crate::invalidation;
use crate::negotiation::json_body;
use crate::response::ApiResponse;
use crate::state::AppState;
use gridmap_model::{check_bounds, EntityKind, Observer, Representation};

/// `POST /maps/{map}/observers/`
pub async fn create(
    state: &AppState,
    map_slug: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiResult<ApiResponse> {
    let map = state.resolve_map(map_slug).await?;
    let document = json_body(content_type, body)?;
    let input = state.validator.parse::<Observer>(&document)?;
    let draft = Observer::from_input(input)?;
    check_bounds(EntityKind::Observer, &map, &draft)?;

    let committed = state.store.insert_observer(map.id, draft).await?;
    let (map, observer) = (committed.map, committed.value);
    state
        .invalidate(&invalidation::observer_changed(&state.paths, &map, &observer))
        .await;
    tracing::info!(id = %observer.id, map = %map.slug, slug = %observer.slug, "observer created");
    Ok(ApiResponse::created(state.paths.observer_item(&map, &observer)))
}

/// `GET /maps/{map}/observers/{observer}/`
pub async fn get(
    state: &AppState,
    map_slug: &str,
    observer_slug: &str,
    representation: Representation,
) -> ApiResult<ApiResponse> {
    let path = state.paths.observer_item_slug(map_slug, observer_slug);
    state
        .cached(representation, path, move || async move {
            let map = state.resolve_map(map_slug).await?;
            let observer = state.resolve_observer(&map, observer_slug).await?;
            Ok::<_, ApiError>(state.renderer.observer_item(&map, &observer, representation))
        })
        .await
}

/// `PUT /maps/{map}/observers/{observer}/`
///
/// Replaces every attribute; omitting `vision` makes it unlimited again.
pub async fn update(
    state: &AppState,
    map_slug: &str,
    observer_slug: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiResult<ApiResponse> {
    let map = state.resolve_map(map_slug).await?;
    let current = state.resolve_observer(&map, observer_slug).await?;
    let document = json_body(content_type, body)?;
    let input = state.validator.parse::<Observer>(&document)?;
    let mut updated = current.clone();
    updated.update_from_input(input)?;
    check_bounds(EntityKind::Observer, &map, &updated)?;

    let committed = state.store.update_observer(&updated, &current.slug).await?;
    state
        .invalidate(&invalidation::observer_updated(
            &state.paths,
            &committed.map,
            &committed.value,
            &updated,
        ))
        .await;
    tracing::info!(id = %updated.id, from = %current.slug, to = %updated.slug, "observer updated");
    Ok(ApiResponse::no_content())
}

/// `DELETE /maps/{map}/observers/{observer}/`
///
/// Succeeds the same way when the map or observer is already gone.
pub async fn delete(
    state: &AppState,
    map_slug: &str,
    observer_slug: &str,
) -> ApiResult<ApiResponse> {
    let Some(map) = state.store.map_by_slug(map_slug).await? else {
        return Ok(ApiResponse::no_content());
    };
    let observer = match state.resolve_observer(&map, observer_slug).await {
        Ok(observer) => observer,
        Err(ApiError::NotFound(_)) => {
            tracing::debug!(map = %map.slug, slug = %observer_slug, "observer already absent");
            return Ok(ApiResponse::no_content());
        }
        Err(err) => return Err(err),
    };

    let Some(removed) = state.store.delete_observer(observer.id).await? else {
        return Ok(ApiResponse::no_content());
    };
    state
        .invalidate(&invalidation::observer_changed(
            &state.paths,
            &removed.map,
            &removed.value,
        ))
        .await;
    tracing::info!(id = %removed.value.id, map = %removed.map.slug, "observer deleted");
    Ok(ApiResponse::no_content())
}
