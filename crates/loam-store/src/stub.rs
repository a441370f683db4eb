//! Cheap summary records for installed packages
//!
//! A stub is built from the leading header lines of a descriptor file,
//! never from its TOML body. One exists per installed package from the
//! moment the store is enumerated; the expensive full parse happens only
//! when a proxy needs it (see [`crate::proxy::StubSpec`]).

use crate::error::{Result, StoreError};
use crate::layout::{StoreLayout, DEFAULT_SUBDIR};
use crate::runtime::{LoadedSpec, Runtime};
use crate::spec::Specification;
use loam_manifest::StubHeader;
use semver::Version;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Marker file written into a package's extension dir after a successful
/// native build.
pub const BUILD_COMPLETE_MARKER: &str = "build_ok";

/// Lightweight summary record for one installed package.
///
/// Identity (`name`, `version`, `platform`) never changes after
/// construction; only `activated`, `extension_dir`, and the cached
/// specification link mutate.
#[derive(Debug)]
pub struct Stub {
    name: String,
    version: Version,
    platform: String,
    source_roots: Vec<String>,
    extensions: Vec<String>,
    loaded_from: PathBuf,
    install_path: Option<PathBuf>,
    extensions_root: PathBuf,
    extension_dir: RefCell<PathBuf>,
    activated: Cell<bool>,
    default_install: bool,
    spec: RefCell<Option<LoadedSpec>>,
}

impl Stub {
    /// Build a stub from the header lines of the descriptor at `path`.
    pub fn from_descriptor(path: impl AsRef<Path>) -> Result<Rc<Stub>> {
        let path = path.as_ref();
        let header = StubHeader::read(path)?;
        let layout = StoreLayout::for_descriptor(path)
            .ok_or_else(|| StoreError::StrayDescriptor(path.to_path_buf()))?;

        let full_name = header.full_name();
        let package_dir = layout.package_dir(&full_name);
        let install_path = package_dir.exists().then_some(package_dir);
        let extensions_root = layout.extensions_root(&header.platform);
        let extension_dir = extensions_root.join(&full_name);
        let default_install = path
            .parent()
            .and_then(Path::file_name)
            .map_or(false, |dir| dir == DEFAULT_SUBDIR);

        Ok(Rc::new(Stub {
            name: header.name,
            version: header.version,
            platform: header.platform,
            source_roots: header.source_roots,
            extensions: header.extensions,
            loaded_from: path.to_path_buf(),
            install_path,
            extensions_root,
            extension_dir: RefCell::new(extension_dir),
            activated: Cell::new(false),
            default_install,
            spec: RefCell::new(None),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn full_name(&self) -> String {
        if self.platform == loam_manifest::DEFAULT_PLATFORM {
            format!("{}-{}", self.name, self.version)
        } else {
            format!("{}-{}-{}", self.name, self.version, self.platform)
        }
    }

    /// Path of the descriptor this stub was built from.
    pub fn loaded_from(&self) -> &Path {
        &self.loaded_from
    }

    /// Install directory of the package tree, or `None` when the tree
    /// was removed from disk after the stub was written.
    pub fn install_path(&self) -> Option<PathBuf> {
        self.install_path.clone()
    }

    /// Relative source roots from the stub header.
    pub fn source_roots(&self) -> &[String] {
        &self.source_roots
    }

    /// Native extension build scripts from the stub header.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Base directory for built extensions of this platform.
    pub fn extensions_root(&self) -> &Path {
        &self.extensions_root
    }

    /// Directory holding this package's built extensions.
    pub fn extension_dir(&self) -> PathBuf {
        self.extension_dir.borrow().clone()
    }

    pub fn set_extension_dir(&self, dir: PathBuf) {
        *self.extension_dir.borrow_mut() = dir;
    }

    pub fn activated(&self) -> bool {
        self.activated.get()
    }

    pub fn set_activated(&self, activated: bool) {
        self.activated.set(activated);
    }

    pub fn default_install(&self) -> bool {
        self.default_install
    }

    /// Absolute source roots; `None` when the package tree is gone.
    pub fn full_source_roots(&self) -> Option<Vec<PathBuf>> {
        let install = self.install_path.as_ref()?;
        Some(
            self.source_roots
                .iter()
                .map(|root| install.join(root))
                .collect(),
        )
    }

    /// Installed files matching `pattern` under any source root.
    pub fn matches_for_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut matches = Vec::new();
        for root in self.full_source_roots().unwrap_or_default() {
            let expr = format!("{}/{}", root.display(), pattern);
            let paths = glob::glob(&expr).map_err(|e| StoreError::Glob(e.to_string()))?;
            for path in paths {
                matches.push(path.map_err(|e| StoreError::Glob(e.to_string()))?);
            }
        }
        Ok(matches)
    }

    /// Whether declared native extensions have not been built yet.
    pub fn missing_extensions(&self) -> bool {
        !self.extensions.is_empty()
            && !self
                .extension_dir
                .borrow()
                .join(BUILD_COMPLETE_MARKER)
                .exists()
    }

    /// Look up the full specification for this stub.
    ///
    /// Resolution order: the stub's own cached link, then the runtime's
    /// loaded entry for this name when its version matches, then a
    /// direct parse of the descriptor. `None` when every path fails.
    ///
    /// The loaded entry may be the proxy wrapping this very stub;
    /// callers that cannot tolerate that aliasing must detect it (see
    /// [`crate::proxy::StubSpec`]).
    pub fn to_spec(&self, runtime: &Runtime) -> Option<LoadedSpec> {
        if let Some(cached) = self.spec.borrow().as_ref() {
            return Some(cached.clone());
        }

        if let Some(loaded) = runtime.loaded_spec(&self.name) {
            if loaded.version() == &self.version {
                self.spec.replace(Some(loaded.clone()));
                return Some(loaded);
            }
        }

        match Specification::load(&self.loaded_from) {
            Ok(spec) => {
                let loaded = LoadedSpec::Full(spec);
                self.spec.replace(Some(loaded.clone()));
                Some(loaded)
            }
            Err(err) => {
                log::debug!("descriptor parse failed for {}: {}", self.full_name(), err);
                None
            }
        }
    }

    /// Replace the stub's cached specification link.
    ///
    /// Used by proxies to repair the case where the loaded-package
    /// registry handed the stub's own wrapper back from
    /// [`Stub::to_spec`]. Mutates only this stub's link, never the
    /// registry.
    pub fn attach_spec(&self, spec: LoadedSpec) {
        self.spec.replace(Some(spec));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_descriptor(root: &Path, subdir: Option<&str>) -> PathBuf {
        let mut descriptors = root.join("descriptors");
        if let Some(sub) = subdir {
            descriptors = descriptors.join(sub);
        }
        fs::create_dir_all(&descriptors).unwrap();
        let path = descriptors.join("dsp-0.9.0.toml");
        fs::write(
            &path,
            "# stub: dsp 0.9.0 any src\n# stub-ext: native/build.toml\n\n\
             [package]\n\
             name = \"dsp\"\n\
             version = \"0.9.0\"\n\
             extensions = [\"native/build.toml\"]\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_from_descriptor_reads_header_only_fields() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_descriptor(temp.path(), None);

        let stub = Stub::from_descriptor(&path).unwrap();
        assert_eq!(stub.name(), "dsp");
        assert_eq!(stub.full_name(), "dsp-0.9.0");
        assert_eq!(stub.source_roots(), ["src".to_string()]);
        assert_eq!(stub.extensions().len(), 1);
        assert!(!stub.default_install());
        assert!(!stub.activated());
        // No package tree was installed
        assert!(stub.install_path().is_none());
        assert!(stub.full_source_roots().is_none());
    }

    #[test]
    fn test_install_path_present_when_tree_exists() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_descriptor(temp.path(), None);
        fs::create_dir_all(temp.path().join("packages").join("dsp-0.9.0")).unwrap();

        let stub = Stub::from_descriptor(&path).unwrap();
        assert!(stub.install_path().is_some());
        assert_eq!(
            stub.full_source_roots().unwrap(),
            vec![temp.path().join("packages").join("dsp-0.9.0").join("src")]
        );
    }

    #[test]
    fn test_default_install_detected_from_location() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_descriptor(temp.path(), Some("default"));

        let stub = Stub::from_descriptor(&path).unwrap();
        assert!(stub.default_install());
    }

    #[test]
    fn test_missing_extensions_tracks_build_marker() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_descriptor(temp.path(), None);
        let stub = Stub::from_descriptor(&path).unwrap();

        assert!(stub.missing_extensions());

        fs::create_dir_all(stub.extension_dir()).unwrap();
        fs::write(stub.extension_dir().join(BUILD_COMPLETE_MARKER), "").unwrap();
        assert!(!stub.missing_extensions());
    }

    #[test]
    fn test_activation_flag() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_descriptor(temp.path(), None);
        let stub = Stub::from_descriptor(&path).unwrap();

        stub.set_activated(true);
        assert!(stub.activated());
    }
}
