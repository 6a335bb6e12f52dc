//! HTTP server
//!
//! A single catch-all warp filter collects method, path, negotiation
//! headers and body, and hands them to the [`Router`].

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::router::{ApiRequest, Router};
use anyhow::Context as _;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use warp::http::Method;
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

/// Largest accepted request body; entity documents are a few dozen bytes
pub const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Body of at most [`MAX_BODY_BYTES`], or `None` when it was not read
///
/// Requests without `Content-Length` carry no body here.
fn bounded_body() -> impl Filter<Extract = (Option<Bytes>,), Error = Infallible> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES)
        .and(warp::body::bytes())
        .map(|body: Bytes| Some(body))
        .or(warp::any().map(|| None))
        .unify()
}

/// Filter serving every route of `router`
pub fn routes(
    router: Router,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::method()
        .and(warp::path::full())
        .and(warp::header::optional::<String>("accept"))
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::header::optional::<u64>("content-length"))
        .and(bounded_body())
        .and_then(
            move |method: Method,
                  path: FullPath,
                  accept: Option<String>,
                  content_type: Option<String>,
                  content_length: Option<u64>,
                  body: Option<Bytes>| {
                let router = router.clone();
                async move {
                    let body = match body {
                        Some(body) => body.to_vec(),
                        None if content_length.is_some_and(|length| length > MAX_BODY_BYTES) => {
                            let err = ApiError::PayloadTooLarge {
                                limit: MAX_BODY_BYTES,
                            };
                            tracing::warn!(path = %path.as_str(), ?content_length, %err, "request rejected");
                            return Ok::<_, Infallible>(ApiResponse::error(
                                &err,
                                &router.state().renderer,
                            ));
                        }
                        None => Vec::new(),
                    };
                    let request = ApiRequest {
                        method,
                        path: path.as_str().to_string(),
                        accept,
                        content_type,
                        body,
                    };
                    Ok::<_, Infallible>(router.handle(request).await)
                }
            },
        )
        .with(warp::trace::request())
}

/// Serve until `shutdown` resolves
///
/// # Errors
/// Fails if the address cannot be bound.
pub async fn serve_with_shutdown(
    router: Router,
    bind: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let (addr, server) = warp::serve(routes(router))
        .try_bind_with_graceful_shutdown(bind, shutdown)
        .with_context(|| format!("cannot bind {bind}"))?;
    tracing::info!(%addr, "gridmap listening");
    server.await;
    tracing::info!("gridmap stopped");
    Ok(())
}

/// Serve until Ctrl-C
///
/// # Errors
/// Fails if the address cannot be bound.
pub async fn serve(router: Router, bind: SocketAddr) -> anyhow::Result<()> {
    serve_with_shutdown(router, bind, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "cannot listen for shutdown signal");
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridmapConfig;
    use crate::state::AppState;
    use std::sync::Arc;

    fn router() -> Router {
        let state = AppState::in_memory(&GridmapConfig::default()).unwrap();
        Router::new(Arc::new(state))
    }

    #[tokio::test]
    async fn filter_forwards_headers_and_body() {
        let filter = routes(router());

        let created = warp::test::request()
            .method("POST")
            .path("/api/maps/")
            .header("content-type", "application/json")
            .body(r#"{"name": "Grid A", "width": 10, "height": 10}"#)
            .reply(&filter)
            .await;
        assert_eq!(created.status(), 201);
        assert_eq!(created.headers()["location"], "/api/maps/grid-a/");

        let fetched = warp::test::request()
            .path("/api/maps/grid-a/")
            .header("accept", "application/vnd.mason+json")
            .reply(&filter)
            .await;
        assert_eq!(fetched.status(), 200);
        assert_eq!(
            fetched.headers()["content-type"],
            "application/vnd.mason+json"
        );
        let body: serde_json::Value = serde_json::from_slice(fetched.body()).unwrap();
        assert_eq!(body["name"], "Grid A");
        assert!(body.get("@controls").is_some());
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let filter = routes(router());
        let name = "x".repeat(usize::try_from(MAX_BODY_BYTES).unwrap());
        let response = warp::test::request()
            .method("POST")
            .path("/api/maps/")
            .header("content-type", "application/json")
            .body(format!(r#"{{"name": "{name}", "width": 10, "height": 10}}"#))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 413);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["@error"]["@message"], "Request body too large");

        // Nothing was created
        let listed = warp::test::request().path("/api/maps/").reply(&filter).await;
        let body: serde_json::Value = serde_json::from_slice(listed.body()).unwrap();
        assert_eq!(body["maps"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_path_is_404_document() {
        let filter = routes(router());
        let response = warp::test::request()
            .path("/nowhere/")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), 404);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["@error"]["@message"], "Not found");
    }
}
