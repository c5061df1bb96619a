//! Centralized error types for lazybooru.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// The main application error type.
///
/// Aggregates every error the application can surface, keeping the
/// underlying error for the log while offering a short message for the UI.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "No config directory on this system; pass --config with a path.".to_string()
                }
                ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => {
                    "The config file could not be written.".to_string()
                }
                ConfigError::ReadError(_) => "The config file could not be read.".to_string(),
                ConfigError::ParseError(e) => format!("config.toml is not valid TOML: {}", e),
                ConfigError::SerializeError(_) => {
                    "The configuration could not be encoded as TOML.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Bad config value: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::Forbidden(_) => "The board refused the request.".to_string(),
                ApiError::NotFound(resource) => format!("'{}' was not found.", resource),
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::ServerError(_) => "Board server error. Please try again later.".to_string(),
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::InvalidUrl(url) => format!("Invalid board URL: {}", url),
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from the board. Please try again.".to_string()
                }
                ApiError::Decode(_) => "This image format cannot be previewed.".to_string(),
            },
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
        }
    }

    /// Check if this error prevents the application from starting.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Api(ApiError::InvalidUrl(_)) | AppError::Terminal(_)
        )
    }

    /// Check if retrying the failed operation may help.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Api(e) if e.is_transient())
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix the config file or start with --config pointing elsewhere.")
            }
            AppError::Api(ApiError::RateLimited) => Some("Wait a few seconds and press 'r' to retry."),
            AppError::Api(ApiError::Network(_)) | AppError::Api(ApiError::InvalidUrl(_)) => {
                Some("Check your internet connection and the board URL.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let app_err: AppError = ApiError::RateLimited.into();
        assert!(matches!(app_err, AppError::Api(ApiError::RateLimited)));
    }

    #[test]
    fn test_user_message_not_found() {
        let err = AppError::Api(ApiError::NotFound("post 12".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("post 12"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "page_limit must be greater than zero".to_string(),
        ));
        assert!(err.user_message().contains("page_limit"));
    }

    #[test]
    fn test_is_critical_config() {
        assert!(AppError::Config(ConfigError::NoConfigDir).is_critical());
        assert!(AppError::Api(ApiError::InvalidUrl("x".to_string())).is_critical());
    }

    #[test]
    fn test_is_not_critical_rate_limited() {
        assert!(!AppError::Api(ApiError::RateLimited).is_critical());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AppError::Api(ApiError::RateLimited).is_recoverable());
        assert!(AppError::Api(ApiError::ServerError("x".to_string())).is_recoverable());
        assert!(!AppError::Api(ApiError::NotFound("x".to_string())).is_recoverable());
        assert!(!AppError::terminal("x").is_recoverable());
    }

    #[test]
    fn test_suggested_action_rate_limited() {
        let action = AppError::Api(ApiError::RateLimited).suggested_action();
        assert!(action.unwrap().contains("retry"));
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.user_message(), "Terminal error: test error");
    }
}
