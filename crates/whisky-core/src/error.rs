//! Error types for Whisky Kit.
//!
//! One enum covers persistence, provisioning, network and bottle creation
//! failures. Callers decide per category whether an error is surfaced or only
//! logged.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Whisky library.
#[derive(Debug, Error)]
pub enum WhiskyError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Invalid version '{input}': {message}")]
    InvalidVersion { input: String, message: String },

    // Runtime provisioning errors
    #[error("WhiskyWine installation failed: {message}")]
    InstallationFailed {
        message: String,
        #[source]
        source: Option<Box<WhiskyError>>,
    },

    #[error("WhiskyWine uninstall failed: {message}")]
    UninstallFailed {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to extract {archive}: {message}")]
    ExtractionFailed { archive: PathBuf, message: String },

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(PathBuf),

    // Bottle errors
    #[error("Bottle not found: {0}")]
    BottleNotFound(PathBuf),

    #[error("Bottle already registered: {0}")]
    DuplicateBottle(PathBuf),

    #[error("Wine command failed: {message}")]
    Runtime { message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Result type alias for Whisky operations.
pub type Result<T> = std::result::Result<T, WhiskyError>;

impl From<std::io::Error> for WhiskyError {
    fn from(err: std::io::Error) -> Self {
        WhiskyError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for WhiskyError {
    fn from(err: serde_json::Error) -> Self {
        WhiskyError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for WhiskyError {
    fn from(err: reqwest::Error) -> Self {
        WhiskyError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<tokio::task::JoinError> for WhiskyError {
    fn from(err: tokio::task::JoinError) -> Self {
        WhiskyError::Task(err.to_string())
    }
}

impl WhiskyError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        WhiskyError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Wrap any failure of an install step into a single installation error.
    pub fn installation(step: &str, cause: WhiskyError) -> Self {
        WhiskyError::InstallationFailed {
            message: format!("{}: {}", step, cause),
            source: Some(Box::new(cause)),
        }
    }

    /// Whether this error belongs to the runtime provisioning category.
    pub fn is_provisioning(&self) -> bool {
        matches!(
            self,
            WhiskyError::InstallationFailed { .. }
                | WhiskyError::UninstallFailed { .. }
                | WhiskyError::ExtractionFailed { .. }
                | WhiskyError::UnsupportedArchive(_)
        )
    }
}
