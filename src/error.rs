//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache backends and the HTTP front end.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration was not a mapping, or an option had the wrong type
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not reach (or lost) the backing service
    #[error("Connection error: {0}")]
    Connection(String),

    /// Key cannot be represented by the backend's transport
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Operation is not available on this backend
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Unexpected reply from the backing service
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Stored entry could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key not found (HTTP layer only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<bincode::Error> for CacheError {
    fn from(err: bincode::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_)
            | CacheError::InvalidRequest(_)
            | CacheError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            CacheError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Protocol(_)
            | CacheError::Serialization(_)
            | CacheError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_maps_to_not_implemented() {
        let response = CacheError::Unsupported("flush").into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CacheError::InvalidKey("k".into()), StatusCode::BAD_REQUEST),
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (
                CacheError::Connection("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CacheError::Protocol("ERROR".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io(_)));
        assert!(err.to_string().contains("nope"));
    }
}
