//! HTTP error responses
//!
//! Every failure leaves the server as `{"error": "..."}` with a status code
//! chosen by the variant.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use dermasense::DermaError;

#[derive(Debug)]
pub enum ApiError {
    /// 400: the request itself is malformed
    BadRequest(String),
    /// 503: a collaborator (model, storage) is not configured
    Unavailable(String),
    /// 500: processing failed
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::Unavailable(m) | ApiError::Internal(m) => m,
        }
    }
}

impl From<DermaError> for ApiError {
    fn from(err: DermaError) -> Self {
        if !err.is_client_error() {
            return ApiError::Internal(err.to_string());
        }
        match err {
            DermaError::InvalidInput(message) => ApiError::BadRequest(message),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}: {}", status, self.message());
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request_with_bare_message() {
        let err = ApiError::from(DermaError::InvalidInput("All fields are required".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "All fields are required");
    }

    #[test]
    fn test_processing_errors_are_internal() {
        let err = ApiError::from(DermaError::Storage("disk full".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("disk full"));
    }
}
