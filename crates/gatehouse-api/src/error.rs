//! Gatehouse — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatehouse_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::FieldRequired { .. } | DomainError::FieldInvalid { .. } => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::AlreadyTaken { .. } | DomainError::OutdatedVersion { .. } => {
                StatusCode::CONFLICT
            }
            DomainError::ContractViolation(_) | DomainError::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.0.code(),
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_core::uid::Uid;

    use super::*;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        assert_eq!(
            status_of(DomainError::FieldRequired { field: "email" }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::FieldInvalid {
                field: "email",
                reason: "not an email address".into(),
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unauthorized_maps_to_401_and_forbidden_to_403() {
        assert_eq!(status_of(DomainError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::NotFound {
                entity: "User",
                id: Uid::generate(),
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflicts_map_to_409() {
        assert_eq!(
            status_of(DomainError::AlreadyTaken {
                field: "email",
                value: "ada@example.com".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::OutdatedVersion {
                aggregate_id: Uid::generate(),
                expected: 1,
                actual: 2,
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        assert_eq!(
            status_of(DomainError::ContractViolation("save without prepare".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
