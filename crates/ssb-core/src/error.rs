//! Error types for the SSB registry.
//!
//! Duplicate and not-installed conditions abort an operation before anything
//! is mutated. IO and network variants are also produced by best-effort steps
//! (favicon fetch, warm-up), where the registry logs them instead of returning.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the SSB registry.
#[derive(Debug, Error)]
pub enum SsbError {
    // Registry errors
    #[error("{name} is already installed")]
    DuplicateApp { name: String },

    #[error("Desktop entry already exists at {path}; the application may already be installed")]
    DuplicateLauncher { path: PathBuf },

    #[error("{name} is not installed")]
    NotInstalled { name: String },

    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    #[error("Nothing to change for {name}: provide a new URL or a new icon")]
    NothingToEdit { name: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status when the server answered with something other than 200.
        status: Option<u16>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Process errors
    #[error("Process error: {message}")]
    Process { message: String },
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, SsbError>;

impl From<std::io::Error> for SsbError {
    fn from(err: std::io::Error) -> Self {
        SsbError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for SsbError {
    fn from(err: serde_json::Error) -> Self {
        SsbError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for SsbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SsbError::Timeout(crate::config::SsbDefaults::FAVICON_TIMEOUT)
        } else {
            SsbError::Network {
                message: err.to_string(),
                status: err.status().map(|s| s.as_u16()),
            }
        }
    }
}

impl SsbError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        SsbError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether the error was caused by the operator's input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SsbError::DuplicateApp { .. }
                | SsbError::DuplicateLauncher { .. }
                | SsbError::NotInstalled { .. }
                | SsbError::MissingArgument { .. }
                | SsbError::NothingToEdit { .. }
                | SsbError::Validation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SsbError::NotInstalled {
            name: "Mail".into(),
        };
        assert_eq!(err.to_string(), "Mail is not installed");

        let err = SsbError::DuplicateApp {
            name: "Mail".into(),
        };
        assert_eq!(err.to_string(), "Mail is already installed");
    }

    #[test]
    fn test_user_errors() {
        assert!(SsbError::NothingToEdit { name: "x".into() }.is_user_error());
        assert!(SsbError::DuplicateLauncher {
            path: PathBuf::from("/tmp/x.desktop")
        }
        .is_user_error());
        assert!(!SsbError::Timeout(std::time::Duration::from_secs(1)).is_user_error());
        assert!(!SsbError::Network {
            message: "refused".into(),
            status: None
        }
        .is_user_error());
    }

    #[test]
    fn test_io_with_path_keeps_path() {
        let err = SsbError::io_with_path(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "/tmp/apps.json",
        );
        match err {
            SsbError::Io { path, .. } => assert_eq!(path, Some(PathBuf::from("/tmp/apps.json"))),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
