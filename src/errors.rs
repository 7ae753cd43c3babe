//! # Application Error Types
//!
//! Common error types for the receipt OCR service. Note that the parsing
//! core never produces errors: unrecoverable fields are silently left empty.
//! Errors here cover configuration and the request-handling layer only.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Malformed or unfulfillable client requests
    Request(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Request(msg) => write!(f, "[REQUEST] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting
pub mod error_logging {
    use tracing::error;

    /// Log request handling errors with request context
    pub fn log_request_error(
        error: &impl std::fmt::Display,
        operation: &str,
        line_count: Option<usize>,
        entity_count: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            line_count = ?line_count,
            entity_count = ?entity_count,
            "Request handling failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_component_tag() {
        assert_eq!(
            AppError::Config("bad port".to_string()).to_string(),
            "[CONFIG] bad port"
        );
        assert_eq!(
            AppError::Request("no input".to_string()).to_string(),
            "[REQUEST] no input"
        );
    }

    #[test]
    fn test_from_anyhow_maps_to_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err, AppError::Internal("boom".to_string()));
    }
}
