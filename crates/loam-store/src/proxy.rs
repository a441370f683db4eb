//! The specification proxy
//!
//! [`StubSpec`] presents every installed package as a full specification
//! while paying the descriptor-parse cost only for packages actually
//! inspected in detail, and only once per package. Queries the stub can
//! answer are delegated directly; anything that needs descriptor-level
//! metadata materializes the full [`Specification`] and caches it for
//! the proxy's lifetime.

use crate::error::{Result, StoreError};
use crate::runtime::{LoadedSpec, Runtime};
use crate::source::SourceOrigin;
use crate::spec::Specification;
use crate::stub::Stub;
use loam_manifest::DependencySpec;
use once_cell::unsync::OnceCell;
use semver::Version;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Value accepted by [`StubSpec::from_stub`]: a bare stub or an already
/// wrapped one.
pub enum StubLike {
    Stub(Rc<Stub>),
    Spec(Rc<StubSpec>),
}

impl From<Rc<Stub>> for StubLike {
    fn from(stub: Rc<Stub>) -> Self {
        StubLike::Stub(stub)
    }
}

impl From<Rc<StubSpec>> for StubLike {
    fn from(spec: Rc<StubSpec>) -> Self {
        StubLike::Spec(spec)
    }
}

/// Lazy-resolution proxy over a [`Stub`].
pub struct StubSpec {
    stub: Rc<Stub>,
    runtime: Rc<Runtime>,
    full: OnceCell<Rc<Specification>>,
    source: RefCell<Option<SourceOrigin>>,
    ignored: Cell<bool>,
}

impl StubSpec {
    /// Wrap `value` in a proxy.
    ///
    /// Idempotent: an already wrapped value is returned unchanged.
    pub fn from_stub(value: impl Into<StubLike>, runtime: &Rc<Runtime>) -> Rc<StubSpec> {
        match value.into() {
            StubLike::Spec(spec) => spec,
            StubLike::Stub(stub) => Rc::new(StubSpec {
                stub,
                runtime: Rc::clone(runtime),
                full: OnceCell::new(),
                source: RefCell::new(None),
                ignored: Cell::new(false),
            }),
        }
    }

    /// The wrapped stub.
    pub fn stub(&self) -> &Rc<Stub> {
        &self.stub
    }

    // ── Stub delegates ──────────────────────────────────────────────

    pub fn name(&self) -> &str {
        self.stub.name()
    }

    pub fn version(&self) -> &Version {
        self.stub.version()
    }

    pub fn platform(&self) -> &str {
        self.stub.platform()
    }

    pub fn full_name(&self) -> String {
        self.stub.full_name()
    }

    /// Path of the descriptor backing this package.
    pub fn loaded_from(&self) -> &Path {
        self.stub.loaded_from()
    }

    pub fn default_install(&self) -> bool {
        self.stub.default_install()
    }

    /// Relative source roots from the stub header.
    pub fn source_roots(&self) -> &[String] {
        self.stub.source_roots()
    }

    /// Whether this package is activated. Reads the stub's own flag.
    pub fn activated(&self) -> bool {
        self.stub.activated()
    }

    /// Write-through to the stub's activation flag; the stub stays the
    /// single source of truth for activation state.
    pub fn set_activated(&self, activated: bool) {
        self.stub.set_activated(activated);
    }

    /// Caller-settable annotation with no effect on resolution.
    pub fn ignored(&self) -> bool {
        self.ignored.get()
    }

    pub fn set_ignored(&self, ignored: bool) {
        self.ignored.set(ignored);
    }

    /// Install directory of the package tree.
    ///
    /// Stubs of packages removed from disk after install report no
    /// path; in that case the answer comes from the resolved full
    /// record rather than failing silently.
    pub fn install_path(&self) -> Result<PathBuf> {
        match self.stub.install_path() {
            Some(path) => Ok(path),
            None => Ok(self.full_specification()?.install_path().to_path_buf()),
        }
    }

    // ── Capability-gated stub delegates ─────────────────────────────

    /// Whether declared native extensions still need building.
    ///
    /// `None` when the host store format predates extension tracking.
    pub fn missing_extensions(&self) -> Option<bool> {
        if !self.runtime.capabilities().extension_tracking {
            return None;
        }
        Some(self.stub.missing_extensions())
    }

    /// Absolute source roots.
    ///
    /// `None` when the host store format cannot compute them from
    /// stubs. A package whose tree is gone yields an empty list.
    pub fn full_source_roots(&self) -> Option<Vec<PathBuf>> {
        if !self.runtime.capabilities().full_source_roots {
            return None;
        }
        Some(self.stub.full_source_roots().unwrap_or_default())
    }

    /// The paths a loader would add for this package. Alias for
    /// [`StubSpec::full_source_roots`].
    pub fn load_paths(&self) -> Option<Vec<PathBuf>> {
        self.full_source_roots()
    }

    /// Installed files matching `pattern` under any source root.
    ///
    /// `None` when the host store format cannot answer glob queries
    /// from stubs.
    pub fn matches_for_glob(&self, pattern: &str) -> Option<Result<Vec<PathBuf>>> {
        if !self.runtime.capabilities().glob_matching {
            return None;
        }
        Some(self.stub.matches_for_glob(pattern))
    }

    // ── Full-resolution delegates ───────────────────────────────────

    /// Dependencies declared in the descriptor. Forces resolution.
    pub fn dependencies(&self) -> Result<HashMap<String, DependencySpec>> {
        Ok(self.full_specification()?.dependencies().clone())
    }

    /// Development dependencies declared in the descriptor. Forces
    /// resolution.
    pub fn dev_dependencies(&self) -> Result<HashMap<String, DependencySpec>> {
        Ok(self.full_specification()?.dev_dependencies().clone())
    }

    /// Declared native extension build scripts. Forces resolution.
    pub fn extensions(&self) -> Result<Vec<String>> {
        Ok(self.full_specification()?.extensions().to_vec())
    }

    /// Serialize the full descriptor document.
    ///
    /// A stub cannot serialize itself meaningfully, so this always
    /// forces resolution.
    pub fn to_document(&self) -> Result<String> {
        self.full_specification()?.to_document()
    }

    // ── Source ──────────────────────────────────────────────────────

    /// Source this package was installed from, as assigned by the
    /// caller.
    pub fn source(&self) -> Option<SourceOrigin> {
        self.source.borrow().clone()
    }

    /// Assign the package's source.
    ///
    /// Stubs have no concept of source, so a stub's extension dir can
    /// be wrong for version-control installs; sources that carry an
    /// extension dir name repair it here. An already resolved full
    /// record picks up the new source immediately.
    pub fn set_source(&self, source: SourceOrigin) {
        if self.runtime.capabilities().extension_tracking {
            if let Some(dir_name) = source.extension_dir_name() {
                self.stub
                    .set_extension_dir(self.stub.extensions_root().join(dir_name));
            }
        }
        if let Some(full) = self.full.get() {
            full.set_source(Some(source.clone()));
        }
        self.source.replace(Some(source));
    }

    // ── Resolution ──────────────────────────────────────────────────

    /// Produce, cache, and return the full specification for this
    /// package, parsing the descriptor at most once per proxy.
    ///
    /// The stub's lookup may hand back this very proxy when the
    /// loaded-package registry's entry for this name is the proxy
    /// itself; trusting that result would recurse without bound, so it
    /// is detected by reference identity and replaced with a direct
    /// parse of the descriptor, which is then attached back onto the
    /// stub for future lookups.
    pub fn full_specification(&self) -> Result<Rc<Specification>> {
        if let Some(full) = self.full.get() {
            return Ok(Rc::clone(full));
        }

        log::debug!("materializing full specification for {}", self.full_name());

        let resolved = match self.stub.to_spec(&self.runtime) {
            Some(LoadedSpec::Stub(proxy)) if std::ptr::eq(Rc::as_ptr(&proxy), self) => {
                match Specification::load(self.stub.loaded_from()) {
                    Ok(spec) => {
                        self.stub.attach_spec(LoadedSpec::Full(Rc::clone(&spec)));
                        Some(spec)
                    }
                    Err(err) => {
                        log::debug!(
                            "direct descriptor load failed for {}: {}",
                            self.full_name(),
                            err
                        );
                        None
                    }
                }
            }
            Some(LoadedSpec::Stub(other)) => Some(other.full_specification()?),
            Some(LoadedSpec::Full(spec)) => Some(spec),
            None => None,
        };

        let spec = resolved.ok_or_else(|| StoreError::Descriptor {
            full_name: self.full_name(),
            name: self.name().to_string(),
            path: self.stub.loaded_from().to_path_buf(),
        })?;

        // The assigned source carries over before the record is cached.
        spec.set_source(self.source.borrow().clone());

        Ok(Rc::clone(self.full.get_or_init(|| spec)))
    }
}

impl fmt::Debug for StubSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubSpec")
            .field("full_name", &self.full_name())
            .field("resolved", &self.full.get().is_some())
            .field("ignored", &self.ignored.get())
            .finish()
    }
}
