//! Error types for the installed-package store

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor parsing or validation error
    #[error("Manifest error: {0}")]
    Manifest(#[from] loam_manifest::ManifestError),

    /// No full specification could be produced for an installed package
    /// by any resolution path.
    #[error(
        "the descriptor for {full_name} at {} was missing or broken; \
         run `loam store repair {name}` to rebuild the cached metadata",
        .path.display()
    )]
    Descriptor {
        full_name: String,
        name: String,
        path: PathBuf,
    },

    /// Descriptor path is not inside a store
    #[error("descriptor {} is not inside a store (expected <root>/descriptors/)", .0.display())]
    StrayDescriptor(PathBuf),

    /// Invalid package source
    #[error("Invalid package source: {0}")]
    InvalidSource(String),

    /// Glob pattern or traversal error
    #[error("Glob error: {0}")]
    Glob(String),
}
