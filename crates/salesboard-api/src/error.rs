//! Error types for salesboard-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use salesboard_core::error::{DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger};
use salesboard_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {}", .0.message)]
    BadRequest(ErrorDetails),

    #[error("Service unavailable: {}", .0.message)]
    ServiceUnavailable(ErrorDetails),

    #[error("Internal server error: {}", .0.message)]
    InternalError(ErrorDetails),
}

impl ApiError {
    /// Log a core failure with its request context and map it to an HTTP error
    pub fn from_core(error: CoreError, context: &ErrorContext) -> Self {
        DefaultErrorLogger.log_error(&error, context);
        let details = error.to_details();
        match details.code {
            ErrorCode::InvalidArgument => ApiError::BadRequest(details),
            ErrorCode::DataSourceError => ApiError::ServiceUnavailable(details),
            ErrorCode::InternalError => ApiError::InternalError(details),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ApiError::NotFound { .. } => None,
            ApiError::BadRequest(details)
            | ApiError::ServiceUnavailable(details)
            | ApiError::InternalError(details) => Some(details),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        ApiError::from_core(error, &ErrorContext::new("request"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match self.details() {
            Some(details) => serde_json::json!(details),
            None => serde_json::json!({ "message": self.to_string() }),
        };
        let body = serde_json::json!({
            "status": status.as_u16(),
            "error": error,
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (CoreError::invalid_argument("bad metric"), StatusCode::BAD_REQUEST),
            (CoreError::data_source("db down"), StatusCode::SERVICE_UNAVAILABLE),
            (
                CoreError::Internal {
                    message: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (core, status) in cases {
            assert_eq!(ApiError::from(core).status_code(), status);
        }
    }

    #[test]
    fn test_details_are_kept() {
        let err = ApiError::from(CoreError::data_source("db down"));
        assert_eq!(err.to_string(), "Service unavailable: Data source error: db down");
        let details = err.details().unwrap();
        assert_eq!(details.code, ErrorCode::DataSourceError);
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_not_found_has_no_details() {
        let err = ApiError::NotFound {
            resource: "/api/nothing".to_string(),
        };
        assert!(err.details().is_none());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
