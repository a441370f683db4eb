//! Store directory layout
//!
//! A store root holds three sibling trees:
//!
//! ```text
//! <root>/
//! ├── descriptors/<full_name>.toml          (descriptor files)
//! │   └── default/<full_name>.toml          (toolchain-shipped packages)
//! ├── packages/<full_name>/                 (installed package trees)
//! └── extensions/<platform>/<full_name>/    (built native extensions)
//! ```

use std::path::{Path, PathBuf};

pub const DESCRIPTORS_DIR: &str = "descriptors";
pub const DEFAULT_SUBDIR: &str = "default";
pub const PACKAGES_DIR: &str = "packages";
pub const EXTENSIONS_DIR: &str = "extensions";

/// Path arithmetic for an installed-package store root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptors_dir(&self) -> PathBuf {
        self.root.join(DESCRIPTORS_DIR)
    }

    /// Descriptors of packages shipped with the toolchain itself.
    pub fn default_descriptors_dir(&self) -> PathBuf {
        self.descriptors_dir().join(DEFAULT_SUBDIR)
    }

    pub fn descriptor_path(&self, full_name: &str) -> PathBuf {
        self.descriptors_dir().join(format!("{}.toml", full_name))
    }

    pub fn package_dir(&self, full_name: &str) -> PathBuf {
        self.root.join(PACKAGES_DIR).join(full_name)
    }

    /// Base directory for built extensions of a platform.
    pub fn extensions_root(&self, platform: &str) -> PathBuf {
        self.root.join(EXTENSIONS_DIR).join(platform)
    }

    /// Recover the layout from a descriptor path.
    ///
    /// Accepts paths in `descriptors/` and `descriptors/default/`; `None`
    /// for anything else.
    pub fn for_descriptor(path: &Path) -> Option<StoreLayout> {
        let mut dir = path.parent()?;
        if dir.file_name()? == DEFAULT_SUBDIR {
            dir = dir.parent()?;
        }
        if dir.file_name()? != DESCRIPTORS_DIR {
            return None;
        }
        Some(StoreLayout::new(dir.parent()?))
    }
}
