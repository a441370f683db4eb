//! loam descriptor parsing and manipulation
//!
//! This crate handles parsing and validation of `package.toml` descriptor
//! files, which record the full metadata of an installed loam package:
//! identity, dependencies, native extensions, and source roots. Descriptors
//! written by the store carry a leading stub header so that summary records
//! can be built without parsing the TOML body; see [`stub_header`].

pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod stub_header;

pub use dependency::{Dependency, DependencySpec, VersionReq};
pub use descriptor::{Descriptor, Package};
pub use error::{ManifestError, Result};
pub use stub_header::StubHeader;

use std::path::Path;

/// Platform tag of packages that run anywhere.
pub const DEFAULT_PLATFORM: &str = "any";

/// Parse a descriptor from a file path
pub fn from_path(path: impl AsRef<Path>) -> Result<Descriptor> {
    let contents =
        std::fs::read_to_string(path.as_ref()).map_err(|e| ManifestError::Io(e.to_string()))?;
    from_str(&contents)
}

/// Parse a descriptor from a string
pub fn from_str(s: &str) -> Result<Descriptor> {
    toml::from_str(s).map_err(|e| ManifestError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_descriptor_parse() {
        let toml = r#"
            [package]
            name = "my-lib"
            version = "0.1.0"
            authors = ["Test Author <test@example.com>"]
        "#;

        let descriptor = from_str(toml).unwrap();
        assert_eq!(descriptor.package.name, "my-lib");
        assert_eq!(descriptor.package.version.to_string(), "0.1.0");
        assert_eq!(descriptor.package.platform, DEFAULT_PLATFORM);
        assert_eq!(descriptor.package.source_roots, vec!["src".to_string()]);
    }

    #[test]
    fn test_descriptor_with_dependencies() {
        let toml = r#"
            [package]
            name = "my-lib"
            version = "0.1.0"

            [dependencies]
            numeric = "1.0"
            dsp = { version = "2.1", optional = true }
        "#;

        let descriptor = from_str(toml).unwrap();
        assert_eq!(descriptor.dependencies.len(), 2);
        assert!(descriptor.dependencies.contains_key("numeric"));
        assert!(descriptor.dependencies.contains_key("dsp"));
    }
}
