//! Error types and result aliases for npmapi operations.
//!
//! Provides a unified error type that covers every failure the registry
//! client, configuration loader and CLI can surface, with actionable messages.

use thiserror::Error;

/// Unified error type for all npmapi operations
#[derive(Error, Debug)]
pub enum NpmError {
    // Config errors
    #[error("Failed to parse npmapi.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Registry errors
    #[error("Package '{name}' not found in registry")]
    PackageNotFound { name: String },

    #[error("User '{name}' not found in registry")]
    UserNotFound { name: String },

    #[error("Registry returned an empty document for '{name}'")]
    EmptyDocument { name: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to decode response: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Bulk listing returned {count} packages, expected at least {minimum}")]
    ListingTooSmall { count: usize, minimum: usize },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for npmapi operations
pub type NpmResult<T> = Result<T, NpmError>;

impl NpmError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error from any error type
    pub fn decode<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NpmError::Network { .. } | NpmError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            NpmError::PackageNotFound { .. } => {
                Some("Check the package name spelling; scoped packages look like @scope/name")
            },
            NpmError::UserNotFound { .. } => Some("Check the user name spelling"),
            NpmError::Network { .. } => {
                Some("Check your internet connection, or raise the timeout with --timeout")
            },
            NpmError::TomlParse { .. } | NpmError::ConfigValidation { .. } => {
                Some("Fix npmapi.toml or remove it to fall back to the defaults")
            },
            NpmError::ListingTooSmall { .. } => {
                Some("The registry may have served a truncated listing; try again later")
            },
            _ => None,
        }
    }
}
