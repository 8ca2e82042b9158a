//! API error types with JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use whereisit_store::StoreError;

/// Message for a mutation that affected no rows.
///
/// A missing record and a wrong key look the same to the store, so the
/// response does not tell them apart either.
pub const NOT_FOUND_OR_KEY_MISMATCH: &str = "not found or secret key does not match";

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Forbidden (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Store error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// The rejection for a mutation that affected zero rows.
    pub fn not_found_or_key_mismatch() -> Self {
        Self::Forbidden(NOT_FOUND_OR_KEY_MISMATCH.to_string())
    }

    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Store(e) => match e {
                StoreError::CategoryInUse(_) => "CONFLICT",
                StoreError::EmptyCategorySet | StoreError::UnknownCategory => "BAD_REQUEST",
                _ => "STORAGE_ERROR",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Store(e) => match e {
                StoreError::CategoryInUse(_) => StatusCode::CONFLICT,
                StoreError::EmptyCategorySet | StoreError::UnknownCategory => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message sent to the client. Storage failures are logged in full
    /// but reported generically.
    fn public_message(&self) -> String {
        match self {
            Self::Store(e) if e.is_constraint_violation() => e.to_string(),
            Self::Store(_) => "internal storage failure".to_string(),
            _ => self.to_string(),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.code().to_string(),
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use whereisit_core::CategoryId;

    #[test]
    fn test_zero_count_is_forbidden() {
        let err = ApiError::not_found_or_key_mismatch();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "FORBIDDEN");
        assert!(err.to_string().contains(NOT_FOUND_OR_KEY_MISMATCH));
    }

    #[test]
    fn test_store_error_mapping() {
        let in_use = ApiError::from(StoreError::CategoryInUse(CategoryId::new(3)));
        assert_eq!(in_use.status_code(), StatusCode::CONFLICT);
        assert_eq!(in_use.code(), "CONFLICT");

        let empty = ApiError::from(StoreError::EmptyCategorySet);
        assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

        let unknown = ApiError::from(StoreError::UnknownCategory);
        assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown.code(), "BAD_REQUEST");
        assert_eq!(unknown.public_message(), "a chosen category does not exist");

        let db = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let db = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(db.public_message(), "internal storage failure");

        let in_use = ApiError::from(StoreError::CategoryInUse(CategoryId::new(3)));
        assert!(in_use.public_message().contains("category 3"));
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse {
            error: ErrorDetails {
                code: "BAD_REQUEST".to_string(),
                message: "name is required".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "name is required");
    }
}
