//! Store enumeration

use crate::error::Result;
use crate::layout::StoreLayout;
use crate::proxy::StubSpec;
use crate::runtime::Runtime;
use crate::stub::Stub;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// An installed-package store rooted at a directory.
#[derive(Debug)]
pub struct Store {
    layout: StoreLayout,
    runtime: Rc<Runtime>,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>, runtime: Rc<Runtime>) -> Store {
        Store {
            layout: StoreLayout::new(root),
            runtime,
        }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn runtime(&self) -> &Rc<Runtime> {
        &self.runtime
    }

    /// Cheap summary records for every installed package, in full-name
    /// order.
    ///
    /// Unreadable descriptors are logged and skipped; enumeration never
    /// fails because one entry is broken.
    pub fn stubs(&self) -> Result<Vec<Rc<Stub>>> {
        let mut stubs = Vec::new();
        for dir in [
            self.layout.descriptors_dir(),
            self.layout.default_descriptors_dir(),
        ] {
            if !dir.exists() {
                continue;
            }
            self.scan_dir(&dir, &mut stubs)?;
        }
        stubs.sort_by_key(|stub| stub.full_name());
        Ok(stubs)
    }

    fn scan_dir(&self, dir: &Path, stubs: &mut Vec<Rc<Stub>>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() {
                continue;
            }
            if path.extension().map_or(true, |ext| ext != "toml") {
                continue;
            }
            match Stub::from_descriptor(&path) {
                Ok(stub) => stubs.push(stub),
                Err(err) => {
                    log::warn!("skipping unreadable descriptor {}: {}", path.display(), err);
                }
            }
        }
        Ok(())
    }

    /// Every installed package as a lazily resolved specification.
    pub fn specifications(&self) -> Result<Vec<Rc<StubSpec>>> {
        Ok(self
            .stubs()?
            .into_iter()
            .map(|stub| StubSpec::from_stub(stub, &self.runtime))
            .collect())
    }
}
