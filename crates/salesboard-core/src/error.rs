//! Error types for salesboard-core
//!
//! Two failure families matter to callers: bad arguments, which the caller
//! can fix, and data source failures, which are reported as-is and never
//! retried. An empty result set is not an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed page, unsupported metric, out-of-range month
    InvalidArgument,
    /// Store unreachable or query failed
    DataSourceError,
    /// Internal error
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::DataSourceError => "DATA_SOURCE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, " (hint: {})", self.suggestions.join("; "))?;
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - request rejected, service healthy
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Main error type for salesboard-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Shorthand for a `DataSource` error
    pub fn data_source(message: impl Into<String>) -> Self {
        CoreError::DataSource {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            CoreError::DataSource { .. } => ErrorCode::DataSourceError,
            CoreError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::InvalidArgument { .. } => ErrorSeverity::Warning,
            CoreError::DataSource { .. } => ErrorSeverity::Error,
            CoreError::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::InvalidArgument { message } => {
                details = details
                    .with_detail(serde_json::json!({ "argument_message": message }))
                    .with_suggestion("Check the request parameters and try again.".to_string());
            }
            CoreError::DataSource { .. } => {
                details = details
                    .with_suggestion("Check that the billing database is reachable.".to_string())
                    .with_suggestion("Reload the page to retry the query.".to_string());
            }
            CoreError::Internal { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<rusqlite::Error> for CoreError {
    fn from(error: rusqlite::Error) -> Self {
        CoreError::DataSource {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Request path or identifier
    pub request_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            request_id: None,
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add request ID
    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "salesboard::error",
                "[{}] {} - Operation: {} - Request: {:?} - Data: {}",
                error.code(),
                error,
                context.operation,
                context.request_id,
                context.data
            ),
            _ => log::error!(
                target: "salesboard::error",
                "[{}] {} - Operation: {} - Request: {:?} - Data: {}",
                error.code(),
                error.to_details(),
                context.operation,
                context.request_id,
                context.data
            ),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidArgument.to_string(), "INVALID_ARGUMENT");
        assert_eq!(ErrorCode::DataSourceError.to_string(), "DATA_SOURCE_ERROR");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::invalid_argument("unsupported metric: revenue");
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::data_source("connection lost");
        assert_eq!(error.code(), ErrorCode::DataSourceError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_details_invalid_argument() {
        let details = CoreError::invalid_argument("month 13 out of range").to_details();
        assert_eq!(details.code, ErrorCode::InvalidArgument);
        assert!(details.details.is_some());
        assert!(details.message.contains("month 13"));
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_rusqlite_error_maps_to_data_source() {
        let error: CoreError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(error.code(), ErrorCode::DataSourceError);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("list_transactions")
            .with_request_id("/api/sales".to_string())
            .with_data("page", serde_json::json!(3));

        assert_eq!(context.operation, "list_transactions");
        assert_eq!(context.request_id.as_deref(), Some("/api/sales"));
        assert_eq!(context.data["page"], 3);
    }
}
