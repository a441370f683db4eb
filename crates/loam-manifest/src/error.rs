//! Error types for descriptor parsing and validation

use thiserror::Error;

/// Result type for descriptor operations
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur during descriptor operations
#[derive(Debug, Error)]
pub enum ManifestError {
    /// I/O error reading a descriptor file
    #[error("I/O error: {0}")]
    Io(String),

    /// TOML parsing error
    #[error("Failed to parse descriptor: {0}")]
    Parse(String),

    /// TOML serialization error
    #[error("Failed to serialize descriptor: {0}")]
    Serialize(String),

    /// Invalid package name
    #[error("Invalid package name: {0}")]
    InvalidPackageName(String),

    /// Invalid version
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Invalid dependency specification
    #[error("Invalid dependency specification for '{0}': {1}")]
    InvalidDependency(String, String),

    /// Malformed or missing stub header
    #[error("Invalid stub header: {0}")]
    StubHeader(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}
