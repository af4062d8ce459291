//! Custom error types for morty-cache
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for morty-cache operations
#[derive(Error, Debug)]
pub enum MortyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for settings and user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Permission denied while touching a file
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Transport failures talking to the remote character API
    #[error("Network error: {0}")]
    Network(String),

    /// The remote API answered, but not with something we understand
    #[error("Remote API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// Local character store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl MortyError {
    /// Create a "not found" error for characters
    pub fn character_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Character",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for files
    pub fn file_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "File",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a network or remote error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Remote { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for MortyError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                entity_type: "File",
                identifier: err.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for MortyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for MortyError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for MortyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Json(err.to_string());
        }
        match err.status() {
            Some(status) => Self::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// Result type alias for morty-cache operations
pub type MortyResult<T> = Result<T, MortyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MortyError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = MortyError::character_not_found("42");
        assert_eq!(err.to_string(), "Character not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remote_error() {
        let err = MortyError::Remote {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Remote API error (status 500): boom");
        assert!(err.is_network());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MortyError = io_err.into();
        assert!(err.is_not_found());

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: MortyError = io_err.into();
        assert!(matches!(err, MortyError::PermissionDenied(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: MortyError = io_err.into();
        assert!(matches!(err, MortyError::Io(_)));
    }
}
