//! Dependency specification types

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use semver::VersionReq;

/// A dependency specification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Simple version requirement: "1.0"
    Simple(String),
    /// Detailed specification
    Detailed(Dependency),
}

/// Detailed dependency specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Version requirement
    #[serde(default)]
    pub version: Option<String>,

    /// Git repository URL
    #[serde(default)]
    pub git: Option<String>,

    /// Git branch
    #[serde(default)]
    pub branch: Option<String>,

    /// Git tag
    #[serde(default)]
    pub tag: Option<String>,

    /// Git revision (commit hash)
    #[serde(default, rename = "rev")]
    pub revision: Option<String>,

    /// Local path (for development)
    #[serde(default)]
    pub path: Option<String>,

    /// Whether this is an optional dependency
    #[serde(default)]
    pub optional: bool,
}

impl DependencySpec {
    /// Validate the dependency specification
    pub fn validate(&self, name: &str) -> Result<()> {
        match self {
            DependencySpec::Simple(version) => {
                version.parse::<VersionReq>().map_err(|e| {
                    ManifestError::InvalidDependency(name.to_string(), e.to_string())
                })?;
            }
            DependencySpec::Detailed(dep) => {
                dep.validate(name)?;
            }
        }
        Ok(())
    }

    /// Get the version requirement if specified
    pub fn version_req(&self) -> Option<Result<VersionReq>> {
        match self {
            DependencySpec::Simple(v) => Some(
                v.parse::<VersionReq>()
                    .map_err(|e| ManifestError::InvalidVersion(e.to_string())),
            ),
            DependencySpec::Detailed(dep) => dep.version.as_ref().map(|v| {
                v.parse::<VersionReq>()
                    .map_err(|e| ManifestError::InvalidVersion(e.to_string()))
            }),
        }
    }

    /// Check if this is a git dependency
    pub fn is_git(&self) -> bool {
        matches!(
            self,
            DependencySpec::Detailed(dep) if dep.git.is_some()
        )
    }

    /// Check if this is a path dependency
    pub fn is_path(&self) -> bool {
        matches!(
            self,
            DependencySpec::Detailed(dep) if dep.path.is_some()
        )
    }

    /// Check if this is an optional dependency
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            DependencySpec::Detailed(dep) if dep.optional
        )
    }
}

impl Dependency {
    /// Validate the dependency
    pub fn validate(&self, name: &str) -> Result<()> {
        // Must specify at least one source
        let sources = [
            self.version.is_some(),
            self.git.is_some(),
            self.path.is_some(),
        ];

        if !sources.iter().any(|&x| x) {
            return Err(ManifestError::InvalidDependency(
                name.to_string(),
                "Must specify version, git, or path".to_string(),
            ));
        }

        // Cannot specify multiple sources
        if sources.iter().filter(|&&x| x).count() > 1 {
            return Err(ManifestError::InvalidDependency(
                name.to_string(),
                "Cannot specify multiple dependency sources (version, git, path)".to_string(),
            ));
        }

        // Git dependencies can have at most one of: branch, tag, or rev
        if self.git.is_some() {
            let git_refs = [
                self.branch.is_some(),
                self.tag.is_some(),
                self.revision.is_some(),
            ];

            if git_refs.iter().filter(|&&x| x).count() > 1 {
                return Err(ManifestError::InvalidDependency(
                    name.to_string(),
                    "Git dependency can only specify one of: branch, tag, or rev".to_string(),
                ));
            }
        }

        // Validate version if specified
        if let Some(version) = &self.version {
            version
                .parse::<VersionReq>()
                .map_err(|e| ManifestError::InvalidDependency(name.to_string(), e.to_string()))?;
        }

        Ok(())
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencySpec::Simple(v) => write!(f, "{}", v),
            DependencySpec::Detailed(dep) => {
                if let Some(version) = &dep.version {
                    write!(f, "{}", version)
                } else if let Some(git) = &dep.git {
                    write!(f, "git: {}", git)
                } else if let Some(path) = &dep.path {
                    write!(f, "path: {}", path)
                } else {
                    write!(f, "unspecified")
                }
            }
        }
    }
}
