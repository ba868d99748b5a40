//! Error types module
//!
//! This module provides the core error types used throughout the Planhub
//! application. All failures are unified under the `AppError` enum, which
//! covers the full error taxonomy of the API: unauthenticated, forbidden,
//! not-found, validation and store failures.

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for denied authorization attempts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role/ownership check failed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entity missing, or owned by another tenant (indistinguishable by design)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request, count mismatch, or denied status transition
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
/// Reduces duplication in the ErrorMetadata impl; client_message stays
/// per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Validation(_) => (400, "VALIDATION_FAILED", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        if self.is_sensitive() {
            // Never leak internals (SQL, connection strings) to clients
            "Internal server error".to_string()
        } else {
            match self {
                AppError::Unauthorized(msg)
                | AppError::Forbidden(msg)
                | AppError::NotFound(msg)
                | AppError::Validation(msg) => msg.clone(),
                _ => self.to_string(),
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(
            AppError::Unauthorized("no token".into()).http_status_code(),
            401
        );
        assert_eq!(AppError::Forbidden("not a PM".into()).http_status_code(), 403);
        assert_eq!(AppError::NotFound("project".into()).http_status_code(), 404);
        assert_eq!(
            AppError::Validation("count mismatch".into()).http_status_code(),
            400
        );
        assert_eq!(AppError::Internal("boom".into()).http_status_code(), 500);
        assert_eq!(
            AppError::Database(SqlxError::PoolClosed).http_status_code(),
            500
        );
    }

    #[test]
    fn test_forbidden_distinct_from_not_found() {
        // A denied role check must never read as a missing entity
        let forbidden = AppError::Forbidden("x".into());
        let not_found = AppError::NotFound("x".into());
        assert_ne!(forbidden.error_code(), not_found.error_code());
        assert_ne!(forbidden.http_status_code(), not_found.http_status_code());
    }

    #[test]
    fn test_sensitive_errors_mask_details() {
        let err = AppError::Database(SqlxError::PoolClosed);
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::Internal("connection refused at 10.0.0.3".into());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_message_passthrough_for_user_errors() {
        let err = AppError::Validation("One or more dependencies do not exist".into());
        assert!(!err.is_sensitive());
        assert_eq!(err.client_message(), "One or more dependencies do not exist");
    }

    #[test]
    fn test_from_validator_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Draft {
            #[validate(length(min = 1))]
            name: String,
        }

        let draft = Draft { name: String::new() };
        let err: AppError = draft.validate().unwrap_err().into();
        assert_eq!(err.http_status_code(), 400);
    }
}
