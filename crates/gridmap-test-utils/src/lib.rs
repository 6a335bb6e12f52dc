//! Testing utilities for the gridmap workspace
//!
//! Fixtures for a populated store, a client that drives the router
//! without a socket, and a gated store for interleaving requests.

#![allow(missing_docs)]

mod gate;

pub use gate::{Gate, GatedStore, Held};

use gridmap_api::{ApiRequest, ApiResponse, AppState, GridmapConfig, Router};
use gridmap_model::representation::MASON;
use gridmap_model::{Map, MapId, MapInput, Obstacle, ObstacleInput, Observer, ObserverInput};
use gridmap_store::{MemoryStore, PersistenceGateway};
use serde_json::{json, Value};
use std::sync::Arc;
use warp::http::Method;

/// Fixed map holding one observer and two obstacles
pub const FIXED_MAP: &str = "/api/maps/test-map-1/";
pub const FIXED_OBSERVER: &str = "/api/maps/test-map-1/observers/test-observer-1/";
pub const COLLECTION: &str = "/api/maps/";

pub fn map_json(name: &str, width: u32, height: u32) -> Value {
    json!({ "name": name, "width": width, "height": height })
}

pub fn observer_json(name: &str, x: u32, y: u32) -> Value {
    json!({ "name": name, "x": x, "y": y })
}

pub fn obstacle_json(x: u32, y: u32) -> Value {
    json!({ "x": x, "y": y })
}

/// Populate a store
///
/// - "Test Map 1" (50×40): "Test Observer 1" at (1, 1) with vision 10.5,
///   obstacles at (5, 5) and (49, 39)
/// - "Test Map 2" and "Test Map 3" (20×20), empty
pub async fn populate(store: &dyn PersistenceGateway) {
    let fixed = store
        .insert_map(new_map("Test Map 1", 50, 40))
        .await
        .unwrap();
    store
        .insert_observer(
            fixed.id,
            Observer::from_input(ObserverInput {
                name: "Test Observer 1".to_string(),
                vision: Some(10.5),
                x: 1,
                y: 1,
            })
            .unwrap(),
        )
        .await
        .unwrap();
    for (x, y) in [(5, 5), (49, 39)] {
        store
            .insert_obstacle(fixed.id, Obstacle::from_input(ObstacleInput { x, y }))
            .await
            .unwrap();
    }
    for name in ["Test Map 2", "Test Map 3"] {
        store.insert_map(new_map(name, 20, 20)).await.unwrap();
    }
}

fn new_map(name: &str, width: u32, height: u32) -> gridmap_model::NewMap {
    Map::from_input(MapInput {
        name: name.to_string(),
        width,
        height,
    })
    .unwrap()
}

/// Client driving a [`Router`] in process
#[derive(Debug, Clone)]
pub struct TestClient {
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestClient {
    /// Client over an empty store
    pub fn empty() -> Self {
        Self::with_config(&GridmapConfig::default())
    }

    pub fn with_config(config: &GridmapConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::over(config, store.clone(), store)
    }

    /// Client over an empty store whose `held` mutation pauses once
    pub fn gated(held: Held) -> (Self, Arc<Gate>) {
        let store = Arc::new(MemoryStore::new());
        let gate = Arc::new(Gate::new(held));
        let gated = Arc::new(GatedStore::new(store.clone(), gate.clone()));
        (Self::over(&GridmapConfig::default(), gated, store), gate)
    }

    fn over(
        config: &GridmapConfig,
        gateway: Arc<dyn PersistenceGateway>,
        store: Arc<MemoryStore>,
    ) -> Self {
        let state = AppState::new(config, gateway).unwrap();
        Self {
            router: Router::new(Arc::new(state)),
            store,
        }
    }

    /// Client over a store filled by [`populate`]
    pub async fn populated() -> Self {
        let client = Self::empty();
        populate(client.store.as_ref()).await;
        client
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn state(&self) -> &AppState {
        self.router.state()
    }

    /// Concrete store, for checks the gateway does not expose
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Id of the map behind `slug`, if stored
    pub async fn map_id(&self, slug: &str) -> Option<MapId> {
        self.store.map_by_slug(slug).await.unwrap().map(|map| map.id)
    }

    pub async fn send(&self, request: ApiRequest) -> ApiResponse {
        self.router.handle(request).await
    }

    /// GET with plain JSON accepted
    pub async fn get(&self, path: &str) -> ApiResponse {
        self.send(ApiRequest::new(Method::GET, path)).await
    }

    /// GET with Mason accepted
    pub async fn get_mason(&self, path: &str) -> ApiResponse {
        self.send(ApiRequest::new(Method::GET, path).with_accept(MASON))
            .await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> ApiResponse {
        self.send(ApiRequest::new(Method::POST, path).with_json(body))
            .await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> ApiResponse {
        self.send(ApiRequest::new(Method::PUT, path).with_json(body))
            .await
    }

    /// POST with an arbitrary content type
    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> ApiResponse {
        self.send(ApiRequest::new(Method::POST, path).with_body(content_type, body))
            .await
    }

    /// PUT with an arbitrary content type
    pub async fn put_raw(&self, path: &str, content_type: &str, body: &str) -> ApiResponse {
        self.send(ApiRequest::new(Method::PUT, path).with_body(content_type, body))
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResponse {
        self.send(ApiRequest::new(Method::DELETE, path)).await
    }

    /// Send the request a Mason control describes, with `body` for POST/PUT
    pub async fn follow(&self, control: &Value, body: Option<&Value>) -> ApiResponse {
        let href = control["href"].as_str().unwrap();
        let method = control["method"].as_str().unwrap_or("GET");
        let mut request = ApiRequest::new(method.parse().unwrap(), href);
        if let Some(body) = body {
            request = request.with_json(body);
        }
        self.send(request.with_accept(MASON)).await
    }
}
