//! Error types for the Kiln client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Kiln client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Service returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, or the raw body text
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if the service could not be reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if !e.is_decode())
    }

    /// Message reported by the service, if it answered with one
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message, .. } | Self::NotFound(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = ClientError::api_error(500, "GPU unavailable");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
        assert!(!err.is_not_found());
        assert_eq!(err.service_message(), Some("GPU unavailable"));

        let err = ClientError::api_error(404, "Task not found");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_parse_error_is_not_transport() {
        let err = ClientError::ParseError("bad json".to_string());
        assert!(!err.is_transport());
        assert!(err.service_message().is_none());
    }
}
