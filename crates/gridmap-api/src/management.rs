//! Management commands
//!
//! Development helpers behind the `gridmap` binary: seeding a store with
//! a known test map, and generating API documentation fragments from the
//! live schemas and responses.

use crate::error::ApiResult;
use crate::router::{ApiRequest, Router};
use gridmap_model::representation::{JSON, MASON};
use gridmap_model::{
    Entity, EntityKind, Map, MapInput, Obstacle, ObstacleInput, Observer, ObserverInput,
};
use gridmap_store::PersistenceGateway;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use warp::http::{Method, StatusCode};

/// Name of the seeded map
pub const TEST_MAP_NAME: &str = "Test Map 1";

/// Observer positions of the seeded map, named `Test Observer {index}`
pub const TEST_OBSERVERS: [(u32, u32); 4] = [(1, 1), (40, 40), (80, 20), (10, 70)];

/// Obstacle positions of the seeded map
pub const TEST_OBSTACLES: [(u32, u32); 4] = [(5, 5), (20, 20), (50, 50), (70, 70)];

/// Insert the test map with its observers and obstacles
///
/// # Errors
/// Fails with a conflict if the test map already exists.
pub async fn seed_test_data(store: &dyn PersistenceGateway) -> ApiResult<Map> {
    let map = store
        .insert_map(Map::from_input(MapInput {
            name: TEST_MAP_NAME.to_string(),
            width: 100,
            height: 80,
        })?)
        .await?;
    for (index, (x, y)) in TEST_OBSERVERS.into_iter().enumerate() {
        let draft = Observer::from_input(ObserverInput {
            name: format!("Test Observer {index}"),
            vision: None,
            x,
            y,
        })?;
        store.insert_observer(map.id, draft).await?;
    }
    for (x, y) in TEST_OBSTACLES {
        store
            .insert_obstacle(map.id, Obstacle::from_input(ObstacleInput { x, y }))
            .await?;
    }
    tracing::info!(slug = %map.slug, "test data seeded");
    Ok(map)
}

/// Entity schemas as an OpenAPI `components.schemas` YAML fragment
///
/// # Errors
/// Fails only if YAML serialization fails.
pub fn schemas_yaml() -> Result<String, serde_yaml::Error> {
    let schemas: BTreeMap<&str, Value> = [
        (EntityKind::Map.type_name(), Map::schema()),
        (EntityKind::Observer.type_name(), Observer::schema()),
        (EntityKind::Obstacle.type_name(), Obstacle::schema()),
    ]
    .into_iter()
    .collect();
    serde_yaml::to_string(&json!({ "components": { "schemas": schemas } }))
}

/// Errors while collecting documentation examples
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// An example request did not answer 200
    #[error("GET {path} answered {status}; seed the test data first")]
    UnexpectedStatus {
        /// Requested path
        path: String,
        /// Status received
        status: StatusCode,
    },

    /// Output could not be written as YAML
    #[error("cannot serialize documentation: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// GET response examples of both representations, one document per endpoint
///
/// Endpoints are the map collection, the test map and its first observer.
/// Keys are endpoint names (`mapcollection`, `mapitem`, `observeritem`).
///
/// # Errors
/// Fails if the test data is missing.
pub async fn response_docs(router: &Router) -> Result<BTreeMap<&'static str, String>, DocsError> {
    let paths = &router.state().paths;
    let map_slug = gridmap_model::Slug::from_name(TEST_MAP_NAME);
    let observer_slug = gridmap_model::Slug::from_name("Test Observer 0");
    let endpoints = [
        ("mapcollection", paths.map_collection()),
        ("mapitem", paths.map_item_slug(map_slug.as_str())),
        (
            "observeritem",
            paths.observer_item_slug(map_slug.as_str(), observer_slug.as_str()),
        ),
    ];

    let mut docs = BTreeMap::new();
    for (endpoint, path) in endpoints {
        let mut content = serde_json::Map::new();
        for media_type in [JSON, MASON] {
            let response = router
                .handle(ApiRequest::new(Method::GET, path.clone()).with_accept(media_type))
                .await;
            if response.status() != StatusCode::OK {
                return Err(DocsError::UnexpectedStatus {
                    path,
                    status: response.status(),
                });
            }
            content.insert(media_type.to_string(), json!({ "example": response.json() }));
        }
        let doc = json!({ "responses": { "200": { "content": content } } });
        docs.insert(endpoint, serde_yaml::to_string(&doc)?);
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridmapConfig;
    use crate::state::AppState;
    use std::sync::Arc;

    #[test]
    fn schemas_fragment_lists_all_entities() {
        let yaml = schemas_yaml().unwrap();
        let doc: Value = serde_yaml::from_str(&yaml).unwrap();
        let schemas = &doc["components"]["schemas"];
        assert_eq!(schemas["Map"], Map::schema());
        assert_eq!(schemas["Observer"], Observer::schema());
        assert_eq!(schemas["Obstacle"], Obstacle::schema());
    }

    #[tokio::test]
    async fn seeded_store_holds_the_test_map() {
        let state = AppState::in_memory(&GridmapConfig::default()).unwrap();
        let map = seed_test_data(state.store.as_ref()).await.unwrap();
        assert_eq!(map.slug, "test-map-1");
        let children = state.store.map_children(map.id).await.unwrap();
        assert_eq!(children.observers.len(), 4);
        assert_eq!(children.obstacles.len(), 4);

        // A second seed collides on the map name
        assert!(seed_test_data(state.store.as_ref()).await.is_err());
    }

    #[tokio::test]
    async fn docs_need_seeded_data() {
        let state = AppState::in_memory(&GridmapConfig::default()).unwrap();
        let router = Router::new(Arc::new(state));
        assert!(matches!(
            response_docs(&router).await,
            Err(DocsError::UnexpectedStatus { .. })
        ));

        seed_test_data(router.state().store.as_ref()).await.unwrap();
        let docs = response_docs(&router).await.unwrap();
        assert_eq!(docs.len(), 3);
        let item: Value = serde_yaml::from_str(&docs["observeritem"]).unwrap();
        let content = &item["responses"]["200"]["content"];
        assert_eq!(content[JSON]["example"]["map_slug"], "test-map-1");
        assert!(content[MASON]["example"]["@controls"]["up"].is_object());
    }
}
