//! Error types and HTTP response conversion

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::{FieldError, ValidationError};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input failed schema validation (400)
    #[error("Validation failed: {} field error(s)", .0.error_count())]
    Validation(#[from] ValidationError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the size limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// The canonical not-found error for item lookups
    pub fn item_not_found() -> Self {
        Error::NotFound("Item not found".to_string())
    }

    /// HTTP status this error renders with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Failure envelope returned for every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Error message
    pub error: String,

    /// Machine-readable error code
    pub code: String,

    /// Field-level violations for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Attach field-level details
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                ErrorResponse::with_code("CONFIG_ERROR", "Internal server error")
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::with_code("IO_ERROR", "I/O operation failed")
            }

            Error::Validation(e) => ErrorResponse::with_code("VALIDATION_ERROR", e.to_string())
                .with_details(e.errors().to_vec()),

            Error::NotFound(msg) => ErrorResponse::with_code("NOT_FOUND", msg),

            Error::BadRequest(msg) => ErrorResponse::with_code("BAD_REQUEST", msg),

            Error::PayloadTooLarge(msg) => ErrorResponse::with_code("PAYLOAD_TOO_LARGE", msg),

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::with_code("INTERNAL_ERROR", "Internal server error")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge(rejection.body_text())
        } else {
            Error::BadRequest(rejection.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: Error) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_response_with_code() {
        let err = ErrorResponse::with_code("NOT_FOUND", "Item not found");
        assert!(!err.success);
        assert_eq!(err.error, "Item not found");
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.details.is_none());
    }

    #[tokio::test]
    async fn test_validation_error_renders_details() {
        let mut validation = ValidationError::new();
        validation.add_field_error("name", "Name is required");
        validation.add_field_error("price", "Price must be a positive number");

        let (status, body) = render(Error::from(validation)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "name");
        assert_eq!(body["details"][1]["message"], "Price must be a positive number");
    }

    #[tokio::test]
    async fn test_not_found_renders_message() {
        let (status, body) = render(Error::item_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Item not found");
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = Error::from(StoreError::LockPoisoned("update"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_bad_request() {
        let (status, body) = render(Error::BadRequest("Malformed JSON".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["error"], "Malformed JSON");
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let (status, body) = render(Error::PayloadTooLarge("Body too big".to_string())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(body["success"], false);
    }
}
