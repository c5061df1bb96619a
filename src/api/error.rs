//! API error types for the image board client.

use thiserror::Error;

/// Errors that can occur when talking to the image board.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The board refused the request.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the board.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// Server-side failure.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response from the board.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Downloaded bytes could not be decoded as an image.
    #[error("Could not decode image: {0}")]
    Decode(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 | 403 => ApiError::Forbidden(context.to_string()),
            404 => ApiError::NotFound(context.to_string()),
            // Moebooru answers 421 when the user throttle trips.
            421 | 429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited | ApiError::ServerError(_) | ApiError::Network(_)
        )
    }
}
