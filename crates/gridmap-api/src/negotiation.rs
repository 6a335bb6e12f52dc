//! Content negotiation
//!
//! Picks the response [`Representation`] from `Accept` and checks that
//! request bodies are JSON. Handlers below this point never look at either
//! header.

use crate::error::{ApiError, ApiResult};
use gridmap_model::representation::{JSON, MASON};
use gridmap_model::Representation;
use serde_json::Value;

/// Select a representation from the `Accept` header
///
/// Any mention of the Mason media type selects hypermedia; everything
/// else, including a missing header and `*/*`, gets plain JSON.
#[must_use]
pub fn negotiate(accept: Option<&str>) -> Representation {
    let wants_mason = accept.is_some_and(|accept| {
        accept
            .split(',')
            .filter_map(|range| range.split(';').next())
            .any(|media| media.trim().eq_ignore_ascii_case(MASON))
    });
    if wants_mason {
        Representation::Hypermedia
    } else {
        Representation::Plain
    }
}

/// Fail unless the request body is declared as JSON
///
/// Parameters such as `charset` are allowed.
///
/// # Errors
/// Returns [`ApiError::MalformedMediaType`] for any other content type.
pub fn require_json(content_type: Option<&str>) -> ApiResult<()> {
    let essence = content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim);
    match essence {
        Some(media) if media.eq_ignore_ascii_case(JSON) => Ok(()),
        _ => Err(ApiError::MalformedMediaType {
            found: content_type.map(str::to_string),
        }),
    }
}

/// Parse a JSON request body
///
/// # Errors
/// Returns [`ApiError::MalformedBody`] if the bytes are not JSON.
pub fn parse_body(body: &[u8]) -> ApiResult<Value> {
    serde_json::from_slice(body).map_err(|err| ApiError::MalformedBody(err.to_string()))
}

/// Content-type check followed by parsing
///
/// # Errors
/// See [`require_json`] and [`parse_body`].
pub fn json_body(content_type: Option<&str>, body: &[u8]) -> ApiResult<Value> {
    require_json(content_type)?;
    parse_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mason_accept_selects_hypermedia() {
        assert_eq!(negotiate(Some(MASON)), Representation::Hypermedia);
        assert_eq!(
            negotiate(Some("text/html, application/vnd.mason+json;q=0.9")),
            Representation::Hypermedia
        );
    }

    #[test]
    fn everything_else_is_plain() {
        for accept in [None, Some("*/*"), Some(JSON), Some("text/html")] {
            assert_eq!(negotiate(accept), Representation::Plain, "{accept:?}");
        }
    }

    #[test]
    fn json_content_type_with_parameters_is_accepted() {
        assert!(require_json(Some("application/json")).is_ok());
        assert!(require_json(Some("Application/JSON; charset=utf-8")).is_ok());
    }

    #[test]
    fn other_content_types_are_415() {
        for content_type in [None, Some("text/plain"), Some("application/xml")] {
            let err = require_json(content_type).unwrap_err();
            assert_eq!(err.status().as_u16(), 415);
        }
    }

    #[test]
    fn unparsable_body_is_400() {
        let err = json_body(Some(JSON), b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
        assert_eq!(json_body(Some(JSON), b"{}").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn content_type_is_checked_before_parsing() {
        let err = json_body(Some("text/plain"), b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::MalformedMediaType { .. }));
    }
}
