//! Error types for concierge-api

use thiserror::Error;

/// Result type alias using concierge-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the assistant backend
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Reading a local file for upload failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not one of the accepted document kinds
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Check if the request timed out
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if the backend itself failed (5xx)
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Status { status, .. } => (500..600).contains(status),
            Error::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_status() {
        assert!(Error::status(500, "Chat processing error").is_server_error());
        assert!(Error::status(503, "").is_server_error());
    }

    #[test]
    fn test_client_error_status_is_not_server_error() {
        assert!(!Error::status(413, "File too large").is_server_error());
        assert!(!Error::status(400, "Unsupported file type").is_server_error());
    }

    #[test]
    fn test_non_http_errors() {
        let e = Error::UnsupportedFileType("notes.md".into());
        assert!(!e.is_server_error());
        assert!(!e.is_timeout());
        assert_eq!(e.to_string(), "Unsupported file type: notes.md");
    }

    #[test]
    fn test_status_display() {
        let e = Error::status(500, "boom");
        assert_eq!(e.to_string(), "HTTP 500: boom");
    }
}
