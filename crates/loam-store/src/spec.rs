//! The full specification record and its loader

use crate::error::{Result, StoreError};
use crate::layout::StoreLayout;
use crate::source::SourceOrigin;
use loam_manifest::{DependencySpec, Descriptor};
use semver::Version;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Complete metadata record for an installed package.
///
/// Expensive to produce: requires parsing the package's whole descriptor
/// file. Proxies materialize at most one of these per package; see
/// [`crate::proxy::StubSpec`].
#[derive(Debug)]
pub struct Specification {
    descriptor: Descriptor,
    loaded_from: PathBuf,
    install_path: PathBuf,
    source: RefCell<Option<SourceOrigin>>,
}

impl Specification {
    /// Parse the descriptor at `path` into a full specification.
    pub fn load(path: impl AsRef<Path>) -> Result<Rc<Specification>> {
        let path = path.as_ref();
        log::debug!("parsing descriptor {}", path.display());

        let descriptor = loam_manifest::from_path(path)?;
        descriptor.validate()?;

        let layout = StoreLayout::for_descriptor(path)
            .ok_or_else(|| StoreError::StrayDescriptor(path.to_path_buf()))?;
        let install_path = layout.package_dir(&descriptor.full_name());

        Ok(Rc::new(Specification {
            descriptor,
            loaded_from: path.to_path_buf(),
            install_path,
            source: RefCell::new(None),
        }))
    }

    pub fn name(&self) -> &str {
        &self.descriptor.package.name
    }

    pub fn version(&self) -> &Version {
        &self.descriptor.package.version
    }

    pub fn platform(&self) -> &str {
        &self.descriptor.package.platform
    }

    pub fn full_name(&self) -> String {
        self.descriptor.full_name()
    }

    pub fn dependencies(&self) -> &HashMap<String, DependencySpec> {
        &self.descriptor.dependencies
    }

    pub fn dev_dependencies(&self) -> &HashMap<String, DependencySpec> {
        &self.descriptor.dev_dependencies
    }

    pub fn extensions(&self) -> &[String] {
        &self.descriptor.package.extensions
    }

    pub fn source_roots(&self) -> &[String] {
        &self.descriptor.package.source_roots
    }

    /// Absolute source roots under the package's install directory.
    ///
    /// Derived from the store layout, so the paths are well-defined even
    /// for a package whose tree was removed from disk.
    pub fn full_source_roots(&self) -> Vec<PathBuf> {
        self.source_roots()
            .iter()
            .map(|root| self.install_path.join(root))
            .collect()
    }

    pub fn default_install(&self) -> bool {
        self.descriptor.package.default_install
    }

    /// Path of the descriptor this record was parsed from.
    pub fn loaded_from(&self) -> &Path {
        &self.loaded_from
    }

    /// Install directory of the package tree.
    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    /// Source this package was installed from, if one has been assigned.
    pub fn source(&self) -> Option<SourceOrigin> {
        self.source.borrow().clone()
    }

    pub fn set_source(&self, source: Option<SourceOrigin>) {
        *self.source.borrow_mut() = source;
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Serialize the full descriptor document.
    pub fn to_document(&self) -> Result<String> {
        Ok(self.descriptor.to_document()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_store_descriptor(root: &Path) -> PathBuf {
        let descriptors = root.join("descriptors");
        fs::create_dir_all(&descriptors).unwrap();
        let path = descriptors.join("dsp-0.9.0.toml");
        fs::write(
            &path,
            "# stub: dsp 0.9.0 any src\n\n\
             [package]\n\
             name = \"dsp\"\n\
             version = \"0.9.0\"\n\n\
             [dependencies]\n\
             numeric = \"1.0\"\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_load_derives_install_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_store_descriptor(temp.path());

        let spec = Specification::load(&path).unwrap();
        assert_eq!(spec.full_name(), "dsp-0.9.0");
        assert_eq!(
            spec.install_path(),
            temp.path().join("packages").join("dsp-0.9.0")
        );
        assert_eq!(spec.dependencies().len(), 1);
        assert!(spec.source().is_none());
    }

    #[test]
    fn test_load_rejects_stray_descriptor() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("dsp-0.9.0.toml");
        fs::write(&path, "[package]\nname = \"dsp\"\nversion = \"0.9.0\"\n").unwrap();

        assert!(matches!(
            Specification::load(&path),
            Err(StoreError::StrayDescriptor(_))
        ));
    }

    #[test]
    fn test_source_slot() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_store_descriptor(temp.path());
        let spec = Specification::load(&path).unwrap();

        let source = SourceOrigin::registry("dsp", "0.9.0");
        spec.set_source(Some(source.clone()));
        assert_eq!(spec.source(), Some(source));
    }
}
