//! Request routing
//!
//! Turns a framework-neutral [`ApiRequest`] into a [`Route`] under the
//! configured prefix and dispatches it. Route matching and negotiation
//! happen here, once; handlers receive resolved slugs and an already
//! chosen representation.
//!
//! | Route                                | Methods           |
//! |--------------------------------------|-------------------|
//! | `/maps/`                             | GET, POST         |
//! | `/maps/{map}/`                       | GET, PUT, DELETE  |
//! | `/maps/{map}/observers/`             | POST              |
//! | `/maps/{map}/obstacles/`             | POST              |
//! | `/maps/{map}/observers/{observer}/`  | GET, PUT, DELETE  |
//! | `/maps/{map}/obstacles/{x}/{y}/`     | DELETE            |

use crate::error::{ApiError, ApiResult};
use crate::negotiation::negotiate;
use crate::resources::{map, observer, obstacle};
use crate::response::ApiResponse;
use crate::state::AppState;
use gridmap_model::representation::JSON;
use serde_json::Value;
use std::sync::Arc;
use warp::http::Method;

/// A request as the handlers see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Full request path, prefix included
    pub path: String,
    /// `Accept` header
    pub accept: Option<String>,
    /// `Content-Type` header
    pub content_type: Option<String>,
    /// Raw body
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Create request without headers or body
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            accept: None,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// With `Accept` header
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// With raw body and content type
    #[must_use]
    pub fn with_body(mut self, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = body.into();
        self
    }

    /// With JSON body
    #[must_use]
    pub fn with_json(self, document: &Value) -> Self {
        self.with_body(JSON, document.to_string())
    }
}

/// Known resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/maps/`
    MapCollection,
    /// `/maps/{map}/`
    MapItem {
        /// Map slug
        map: String,
    },
    /// `/maps/{map}/observers/`
    MapObservers {
        /// Map slug
        map: String,
    },
    /// `/maps/{map}/obstacles/`
    MapObstacles {
        /// Map slug
        map: String,
    },
    /// `/maps/{map}/observers/{observer}/`
    ObserverItem {
        /// Map slug
        map: String,
        /// Observer slug
        observer: String,
    },
    /// `/maps/{map}/obstacles/{x}/{y}/`
    ObstacleTile {
        /// Map slug
        map: String,
        /// Tile column
        x: u32,
        /// Tile row
        y: u32,
    },
}

impl Route {
    /// Match a path under `prefix`; the trailing slash is optional
    #[must_use]
    pub fn parse(prefix: &str, path: &str) -> Option<Self> {
        let rest = path.strip_prefix(prefix)?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let mut segments = rest.split('/');
        if segments.next() != Some("") {
            return None;
        }
        let segments: Vec<&str> = segments.collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }
        let route = match segments.as_slice() {
            ["maps"] => Self::MapCollection,
            ["maps", map] => Self::MapItem { map: map.to_string() },
            ["maps", map, "observers"] => Self::MapObservers { map: map.to_string() },
            ["maps", map, "obstacles"] => Self::MapObstacles { map: map.to_string() },
            ["maps", map, "observers", observer] => Self::ObserverItem {
                map: map.to_string(),
                observer: observer.to_string(),
            },
            ["maps", map, "obstacles", x, y] => Self::ObstacleTile {
                map: map.to_string(),
                x: x.parse().ok()?,
                y: y.parse().ok()?,
            },
            _ => return None,
        };
        Some(route)
    }

    /// Methods the route answers
    #[must_use]
    pub const fn allowed(&self) -> &'static [&'static str] {
        match self {
            Self::MapCollection => &["GET", "POST"],
            Self::MapItem { .. } | Self::ObserverItem { .. } => &["GET", "PUT", "DELETE"],
            Self::MapObservers { .. } | Self::MapObstacles { .. } => &["POST"],
            Self::ObstacleTile { .. } => &["DELETE"],
        }
    }
}

/// Dispatches requests to the resource handlers
#[derive(Debug, Clone)]
pub struct Router {
    state: Arc<AppState>,
}

impl Router {
    /// Create router over shared state
    #[inline]
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Shared state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle a request; failures become `@error` responses
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        match self.dispatch(&request).await {
            Ok(response) => {
                tracing::debug!(method = %request.method, path = %request.path, status = %response.status(), "handled");
                response
            }
            Err(err) => {
                if err.is_client_error() {
                    tracing::warn!(method = %request.method, path = %request.path, %err, "request rejected");
                } else {
                    tracing::error!(method = %request.method, path = %request.path, %err, "request failed");
                }
                ApiResponse::error(&err, &self.state.renderer)
            }
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let state = &*self.state;
        let route = Route::parse(state.paths.prefix(), &request.path)
            .ok_or_else(|| ApiError::not_found(format!("no resource at {}", request.path)))?;
        let representation = negotiate(request.accept.as_deref());
        let content_type = request.content_type.as_deref();
        let body = request.body.as_slice();

        match (&route, request.method.as_str()) {
            (Route::MapCollection, "GET") => map::list(state, representation).await,
            (Route::MapCollection, "POST") => map::create(state, content_type, body).await,
            (Route::MapItem { map }, "GET") => map::get(state, map, representation).await,
            (Route::MapItem { map }, "PUT") => map::update(state, map, content_type, body).await,
            (Route::MapItem { map }, "DELETE") => map::delete(state, map).await,
            (Route::MapObservers { map }, "POST") => {
                observer::create(state, map, content_type, body).await
            }
            (Route::MapObstacles { map }, "POST") => {
                obstacle::create(state, map, content_type, body).await
            }
            (Route::ObserverItem { map, observer }, "GET") => {
                observer::get(state, map, observer, representation).await
            }
            (Route::ObserverItem { map, observer }, "PUT") => {
                observer::update(state, map, observer, content_type, body).await
            }
            (Route::ObserverItem { map, observer }, "DELETE") => {
                observer::delete(state, map, observer).await
            }
            (Route::ObstacleTile { map, x, y }, "DELETE") => {
                obstacle::delete(state, map, *x, *y).await
            }
            (route, method) => Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
                allow: route.allowed(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_route() {
        let cases = [
            ("/api/maps/", Route::MapCollection),
            ("/api/maps/grid-a/", Route::MapItem { map: "grid-a".into() }),
            ("/api/maps/grid-a", Route::MapItem { map: "grid-a".into() }),
            (
                "/api/maps/grid-a/observers/",
                Route::MapObservers { map: "grid-a".into() },
            ),
            (
                "/api/maps/grid-a/obstacles/",
                Route::MapObstacles { map: "grid-a".into() },
            ),
            (
                "/api/maps/grid-a/observers/o1/",
                Route::ObserverItem {
                    map: "grid-a".into(),
                    observer: "o1".into(),
                },
            ),
            (
                "/api/maps/grid-a/obstacles/3/4/",
                Route::ObstacleTile {
                    map: "grid-a".into(),
                    x: 3,
                    y: 4,
                },
            ),
        ];
        for (path, route) in cases {
            assert_eq!(Route::parse("/api", path), Some(route), "{path}");
        }
    }

    #[test]
    fn rejects_unknown_paths() {
        for path in [
            "/maps/",
            "/api",
            "/api/",
            "/apimaps/",
            "/api/maps//",
            "/api/maps/grid-a/walls/",
            "/api/maps/grid-a/obstacles/x/4/",
            "/api/maps/grid-a/obstacles/-1/4/",
            "/api/maps/grid-a/observers/o1/extra/",
        ] {
            assert_eq!(Route::parse("/api", path), None, "{path}");
        }
    }

    #[test]
    fn empty_prefix_mounts_at_root() {
        assert_eq!(Route::parse("", "/maps/"), Some(Route::MapCollection));
    }

    #[test]
    fn child_collections_only_accept_post() {
        let route = Route::MapObstacles { map: "a".into() };
        assert_eq!(route.allowed(), &["POST"]);
    }
}
