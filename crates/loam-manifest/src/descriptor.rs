//! Descriptor structure definitions

use crate::dependency::DependencySpec;
use crate::error::{ManifestError, Result};
use crate::stub_header::StubHeader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete descriptor for an installed loam package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Descriptor {
    /// Package metadata
    pub package: Package,

    /// Dependencies
    #[serde(default)]
    pub dependencies: HashMap<String, DependencySpec>,

    /// Development dependencies (only used for tests)
    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: HashMap<String, DependencySpec>,
}

/// Package metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Package name (must be unique in a store)
    pub name: String,

    /// Semantic version
    pub version: semver::Version,

    /// Platform tag; "any" for platform-independent packages
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Relative roots of loadable sources within the package tree
    #[serde(default = "default_source_roots", rename = "source-roots")]
    pub source_roots: Vec<String>,

    /// Native extension build scripts, relative to the package tree
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Whether the package ships with the toolchain itself
    #[serde(default, rename = "default-install")]
    pub default_install: bool,

    /// Package description
    #[serde(default)]
    pub description: Option<String>,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Authors
    #[serde(default)]
    pub authors: Vec<String>,

    /// Repository URL
    #[serde(default)]
    pub repository: Option<String>,
}

fn default_platform() -> String {
    crate::DEFAULT_PLATFORM.to_string()
}

fn default_source_roots() -> Vec<String> {
    vec!["src".to_string()]
}

impl Descriptor {
    /// Validate the descriptor
    pub fn validate(&self) -> Result<()> {
        self.validate_package_name()?;
        self.validate_dependencies()?;
        Ok(())
    }

    /// Validate package name follows naming conventions
    fn validate_package_name(&self) -> Result<()> {
        let name = &self.package.name;

        // Must not be empty
        if name.is_empty() {
            return Err(ManifestError::InvalidPackageName(
                "Package name cannot be empty".to_string(),
            ));
        }

        // Must start with letter
        if !name.chars().next().unwrap().is_alphabetic() {
            return Err(ManifestError::InvalidPackageName(
                "Package name must start with a letter".to_string(),
            ));
        }

        // Can only contain alphanumeric, dash, underscore
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ManifestError::InvalidPackageName(
                "Package name can only contain letters, numbers, dashes, and underscores"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Validate dependency specifications
    fn validate_dependencies(&self) -> Result<()> {
        for (name, spec) in &self.dependencies {
            spec.validate(name)?;
        }

        for (name, spec) in &self.dev_dependencies {
            spec.validate(name)?;
        }

        Ok(())
    }

    /// Full name under which the package is installed in a store
    pub fn full_name(&self) -> String {
        if self.package.platform == crate::DEFAULT_PLATFORM {
            format!("{}-{}", self.package.name, self.package.version)
        } else {
            format!(
                "{}-{}-{}",
                self.package.name, self.package.version, self.package.platform
            )
        }
    }

    /// Stub header equivalent to this descriptor
    pub fn stub_header(&self) -> StubHeader {
        StubHeader {
            name: self.package.name.clone(),
            version: self.package.version.clone(),
            platform: self.package.platform.clone(),
            source_roots: self.package.source_roots.clone(),
            extensions: self.package.extensions.clone(),
        }
    }

    /// Serialize to the canonical descriptor document.
    ///
    /// The rendered document starts with the stub header lines, so it can
    /// be consumed by both the cheap and the full read path.
    pub fn to_document(&self) -> Result<String> {
        let body = toml::to_string_pretty(self)
            .map_err(|e| ManifestError::Serialize(e.to_string()))?;
        Ok(format!("{}\n{}", self.stub_header().render(), body))
    }
}
