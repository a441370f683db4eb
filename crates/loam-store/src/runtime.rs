//! Loaded-package registry and host capability detection
//!
//! The registry records which specification is currently loaded for each
//! package name. It is an explicitly passed handle, never process-global
//! state, so every test can construct one per scenario.

use crate::proxy::StubSpec;
use crate::spec::Specification;
use semver::Version;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A specification currently loaded for some package name.
///
/// The registry can hand back either a fully parsed record or the proxy
/// wrapping a stub, including, in the degenerate case, the very proxy
/// that is asking.
#[derive(Debug, Clone)]
pub enum LoadedSpec {
    Full(Rc<Specification>),
    Stub(Rc<StubSpec>),
}

impl LoadedSpec {
    pub fn name(&self) -> &str {
        match self {
            LoadedSpec::Full(spec) => spec.name(),
            LoadedSpec::Stub(spec) => spec.name(),
        }
    }

    pub fn version(&self) -> &Version {
        match self {
            LoadedSpec::Full(spec) => spec.version(),
            LoadedSpec::Stub(spec) => spec.version(),
        }
    }
}

/// Optional stub operations supported by the host's store format version.
///
/// Computed once and shared by every proxy built against the same
/// runtime. An operation outside the set is absent from the proxy's
/// surface (`None`), not a runtime error; callers probe rather than
/// catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The store tracks native extension builds per package.
    pub extension_tracking: bool,
    /// Stubs can compute absolute source roots without a full parse.
    pub full_source_roots: bool,
    /// Stubs answer glob queries over installed files.
    pub glob_matching: bool,
}

/// Store format that introduced extension-build tracking.
const EXTENSION_TRACKING_SINCE: Version = Version::new(1, 2, 0);
/// Store format that introduced absolute source roots in stub headers.
const FULL_SOURCE_ROOTS_SINCE: Version = Version::new(1, 2, 0);
/// Store format that introduced glob matching on stubs.
const GLOB_MATCHING_SINCE: Version = Version::new(1, 4, 0);

impl Capabilities {
    /// Detect the capability set of a host store-format version.
    pub fn detect(host: &Version) -> Capabilities {
        Capabilities {
            extension_tracking: *host >= EXTENSION_TRACKING_SINCE,
            full_source_roots: *host >= FULL_SOURCE_ROOTS_SINCE,
            glob_matching: *host >= GLOB_MATCHING_SINCE,
        }
    }

    /// Profile with every optional operation unavailable.
    pub const fn legacy() -> Capabilities {
        Capabilities {
            extension_tracking: false,
            full_source_roots: false,
            glob_matching: false,
        }
    }

    /// Profile with every optional operation available.
    pub const fn full() -> Capabilities {
        Capabilities {
            extension_tracking: true,
            full_source_roots: true,
            glob_matching: true,
        }
    }
}

/// Process context shared by every proxy: the loaded-package registry
/// and the capability set of the host store format.
#[derive(Debug)]
pub struct Runtime {
    capabilities: Capabilities,
    loaded: RefCell<HashMap<String, LoadedSpec>>,
}

impl Runtime {
    pub fn new(capabilities: Capabilities) -> Rc<Runtime> {
        Rc::new(Runtime {
            capabilities,
            loaded: RefCell::new(HashMap::new()),
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Specification currently loaded for `name`, if any.
    pub fn loaded_spec(&self, name: &str) -> Option<LoadedSpec> {
        self.loaded.borrow().get(name).cloned()
    }

    /// Record `spec` as the loaded specification for its name.
    pub fn register(&self, spec: LoadedSpec) {
        let name = spec.name().to_string();
        self.loaded.borrow_mut().insert(name, spec);
    }

    /// Remove and return the loaded specification for `name`.
    pub fn deregister(&self, name: &str) -> Option<LoadedSpec> {
        self.loaded.borrow_mut().remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_legacy_host() {
        let caps = Capabilities::detect(&Version::new(1, 1, 3));
        assert_eq!(caps, Capabilities::legacy());
    }

    #[test]
    fn test_detect_partial_host() {
        let caps = Capabilities::detect(&Version::new(1, 2, 0));
        assert!(caps.extension_tracking);
        assert!(caps.full_source_roots);
        assert!(!caps.glob_matching);
    }

    #[test]
    fn test_detect_current_host() {
        let caps = Capabilities::detect(&Version::new(1, 4, 1));
        assert_eq!(caps, Capabilities::full());
    }

    #[test]
    fn test_registry_is_empty_by_default() {
        let runtime = Runtime::new(Capabilities::full());
        assert!(runtime.loaded_spec("dsp").is_none());
    }
}
