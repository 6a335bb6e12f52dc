//! Framework-neutral responses
//!
//! Handlers and the router produce [`ApiResponse`]; the warp layer turns it
//! into an HTTP response through [`warp::Reply`].

use crate::error::ApiError;
use gridmap_hypermedia::Renderer;
use gridmap_model::representation::MASON;
use gridmap_model::Representation;
use serde_json::Value;
use std::sync::Arc;
use warp::http::header::{HeaderName, HeaderValue, ALLOW, CONTENT_TYPE, LOCATION};
use warp::http::StatusCode;
use warp::hyper::Body;

/// Response produced by a handler
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    content_type: Option<&'static str>,
    headers: Vec<(HeaderName, String)>,
    body: Option<Arc<str>>,
}

impl ApiResponse {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 200 with a rendered body
    #[must_use]
    pub fn ok(representation: Representation, body: Arc<str>) -> Self {
        Self {
            content_type: Some(representation.media_type()),
            body: Some(body),
            ..Self::new(StatusCode::OK)
        }
    }

    /// 201 pointing at the new resource
    #[must_use]
    pub fn created(location: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED).with_header(LOCATION, location)
    }

    /// 204
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    /// Error document for a failed request
    #[must_use]
    pub fn error(err: &ApiError, renderer: &Renderer) -> Self {
        let document = renderer.error(err.title(), &err.to_string());
        let mut response = Self {
            content_type: Some(MASON),
            body: Some(Arc::from(document.to_string())),
            ..Self::new(err.status())
        };
        if let ApiError::MethodNotAllowed { allow, .. } = err {
            response = response.with_header(ALLOW, allow.join(", "));
        }
        response
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Status code
    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `Content-Type` of the body, if any
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// First value of a header
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `Location` header
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION.as_str())
    }

    /// Raw body
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Body parsed as JSON; `Null` when there is none
    #[must_use]
    pub fn json(&self) -> Value {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
            .unwrap_or(Value::Null)
    }
}

impl warp::Reply for ApiResponse {
    fn into_response(self) -> warp::reply::Response {
        let body = self
            .body
            .map_or_else(Body::empty, |body| Body::from(body.to_string()));
        let mut response = warp::reply::Response::new(body);
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(content_type) = self.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        for (name, value) in self.headers {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(err) => tracing::error!(header = %name, %err, "dropping unencodable header"),
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Reply;

    #[test]
    fn created_carries_location_and_no_body() {
        let response = ApiResponse::created("/api/maps/grid-a/");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.location(), Some("/api/maps/grid-a/"));
        assert!(response.body().is_none());
    }

    #[test]
    fn method_not_allowed_lists_allowed_methods() {
        let err = ApiError::MethodNotAllowed {
            method: "PATCH".into(),
            allow: &["GET", "POST"],
        };
        let response = ApiResponse::error(&err, &Renderer::default());
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("allow"), Some("GET, POST"));
        assert_eq!(response.content_type(), Some(MASON));
        assert_eq!(response.json()["@error"]["@message"], "Method not allowed");
    }

    #[test]
    fn into_warp_response_sets_headers() {
        let response = ApiResponse::ok(Representation::Hypermedia, Arc::from("{}")).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], MASON);
    }
}
