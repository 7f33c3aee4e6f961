//! Configuration parsing for npmapi
//!
//! This crate handles parsing and validation of npmapi.toml files and layers
//! the global file, the project file, environment variables and command-line
//! flags into one configuration.

pub mod toml;
pub mod merge;

// Re-export main types
pub use self::toml::{ApiToml, RegistrySection, HttpSection, RetrySection};
pub use merge::{ConfigLoader, ConfigLayering, ConfigSource};

use npmapi_core::error::NpmError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, NpmError>;
