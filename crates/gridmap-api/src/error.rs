//! Error types for the resource handlers
//!
//! Every failure a request can hit maps to one distinct status. None of
//! them are retried: each is a deterministic outcome of the submitted
//! request.

use gridmap_model::ModelError;
use gridmap_store::StoreError;
use warp::http::StatusCode;

/// Request failure, resolved into a status and an `@error` document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Body sent with a media type other than JSON
    #[error("expected an application/json request body, got {}", .found.as_deref().unwrap_or("no content type"))]
    MalformedMediaType {
        /// Content type the client sent
        found: Option<String>,
    },

    /// Body longer than the server accepts
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Largest accepted body in bytes
        limit: u64,
    },

    /// Body claims JSON but does not parse
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    /// Body fails the entity schema
    #[error("{0}")]
    SchemaViolation(String),

    /// Body places a child outside its map
    #[error("{0}")]
    SpatialViolation(String),

    /// Name or slug already taken
    #[error("{0}")]
    UniquenessConflict(String),

    /// No entity behind the path
    #[error("{0}")]
    NotFound(String),

    /// Route exists but not for this method
    #[error("method {method} is not allowed here")]
    MethodNotAllowed {
        /// Method the client used
        method: String,
        /// Methods the route supports
        allow: &'static [&'static str],
    },

    /// Anything the client could not have caused
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MalformedBody(_) | Self::SchemaViolation(_) | Self::SpatialViolation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UniquenessConflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short title used as `@message`
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::MalformedMediaType { .. } => "Unsupported media type",
            Self::PayloadTooLarge { .. } => "Request body too large",
            Self::MalformedBody(_) => "Malformed request body",
            Self::SchemaViolation(_) => "Invalid request body",
            Self::SpatialViolation(_) => "Out of map bounds",
            Self::UniquenessConflict(_) => "Conflict",
            Self::NotFound(_) => "Not found",
            Self::MethodNotAllowed { .. } => "Method not allowed",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Create not-found error
    pub fn not_found(details: impl Into<String>) -> Self {
        Self::NotFound(details.into())
    }

    /// Check if the client caused this error
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::SchemaViolation { .. } => Self::SchemaViolation(err.to_string()),
            ModelError::SpatialViolation { .. } => Self::SpatialViolation(err.to_string()),
            ModelError::InvalidSchema { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniquenessConflict { .. } => Self::UniquenessConflict(err.to_string()),
            // A concurrent delete removed the target or its parent
            StoreError::NotFound { kind } => Self::NotFound(format!("{} not found", kind.type_name())),
            StoreError::OutOfBounds { .. } => Self::SpatialViolation(err.to_string()),
            StoreError::Internal(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_model::EntityKind;

    #[test]
    fn statuses_are_distinct_per_failure_class() {
        let cases = [
            (ApiError::MalformedMediaType { found: None }, 415),
            (ApiError::PayloadTooLarge { limit: 16 }, 413),
            (ApiError::MalformedBody("eof".into()), 400),
            (ApiError::SchemaViolation("x".into()), 400),
            (ApiError::SpatialViolation("x".into()), 400),
            (ApiError::UniquenessConflict("x".into()), 409),
            (ApiError::not_found("x"), 404),
            (
                ApiError::MethodNotAllowed {
                    method: "PATCH".into(),
                    allow: &["GET"],
                },
                405,
            ),
            (ApiError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn store_conflict_becomes_409() {
        let err: ApiError = StoreError::conflict(EntityKind::Map, "name", "Grid A").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "map name 'Grid A' already exists");
    }

    #[test]
    fn model_errors_keep_their_class() {
        let schema: ApiError = ModelError::schema(EntityKind::Observer, "bad").into();
        assert!(matches!(schema, ApiError::SchemaViolation(_)));

        let spatial: ApiError = ModelError::SpatialViolation {
            kind: EntityKind::Observer,
            x: 20,
            y: 5,
            width: 10,
            height: 10,
        }
        .into();
        assert!(matches!(spatial, ApiError::SpatialViolation(_)));
        assert!(spatial.is_client_error());
    }

    #[test]
    fn media_type_message_names_what_was_sent() {
        let err = ApiError::MalformedMediaType {
            found: Some("text/plain".into()),
        };
        assert!(err.to_string().contains("text/plain"));
    }
}
