//! Package source handling

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Package source type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceKind {
    /// Registry package with version
    Registry { version: String },
    /// Git repository
    Git {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rev: Option<String>,
    },
    /// Local path
    Path { path: PathBuf },
}

/// Where an installed package came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceOrigin {
    /// Package name
    pub name: String,
    /// Source kind
    #[serde(flatten)]
    pub kind: SourceKind,
}

impl SourceOrigin {
    /// Create a registry source
    pub fn registry(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::Registry {
                version: version.into(),
            },
        }
    }

    /// Create a git source
    pub fn git(name: impl Into<String>, url: impl Into<String>, reference: GitReference) -> Self {
        let (branch, tag, rev) = match reference {
            GitReference::Branch(b) => (Some(b), None, None),
            GitReference::Tag(t) => (None, Some(t), None),
            GitReference::Rev(r) => (None, None, Some(r)),
        };

        Self {
            name: name.into(),
            kind: SourceKind::Git {
                url: url.into(),
                branch,
                tag,
                rev,
            },
        }
    }

    /// Create a path source
    pub fn path(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::Path { path },
        }
    }

    /// Check if this is a local source (doesn't need downloading)
    pub fn is_local(&self) -> bool {
        matches!(self.kind, SourceKind::Path { .. })
    }

    /// Directory name for this package's built extensions, for sources
    /// that override the store's default layout.
    ///
    /// Git installs are keyed by ref rather than by registry version, so
    /// the store cannot derive their extension directory on its own.
    /// Registry and path sources have no such override.
    pub fn extension_dir_name(&self) -> Option<String> {
        match &self.kind {
            SourceKind::Git {
                branch, tag, rev, ..
            } => {
                let reference = rev
                    .as_deref()
                    .or(tag.as_deref())
                    .or(branch.as_deref())
                    .unwrap_or("default");
                let short = reference.get(..12).unwrap_or(reference);
                Some(format!("{}-{}", self.name, short))
            }
            _ => None,
        }
    }

    /// Validate the source
    pub fn validate(&self) -> Result<()> {
        match &self.kind {
            SourceKind::Registry { version } => {
                if version.is_empty() {
                    return Err(StoreError::InvalidSource(
                        "Registry version cannot be empty".to_string(),
                    ));
                }
            }
            SourceKind::Git {
                url,
                branch,
                tag,
                rev,
            } => {
                if url.is_empty() {
                    return Err(StoreError::InvalidSource(
                        "Git URL cannot be empty".to_string(),
                    ));
                }

                // Check that only one reference type is specified
                let refs = [branch.is_some(), tag.is_some(), rev.is_some()];
                if refs.iter().filter(|&&x| x).count() > 1 {
                    return Err(StoreError::InvalidSource(
                        "Git source can only specify one of: branch, tag, or rev".to_string(),
                    ));
                }
            }
            SourceKind::Path { path } => {
                if path.as_os_str().is_empty() {
                    return Err(StoreError::InvalidSource(
                        "Path cannot be empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Git reference type
#[derive(Debug, Clone)]
pub enum GitReference {
    Branch(String),
    Tag(String),
    Rev(String),
}
