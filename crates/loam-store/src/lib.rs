//! Installed-package store for loam
//!
//! This crate provides the metadata layer over a store of installed
//! packages: cheap stub records built from descriptor headers, the
//! lazy-resolution proxy that presents every package as a full
//! specification while parsing each descriptor at most once, and the
//! loaded-package registry the proxies consult.

pub mod error;
pub mod layout;
pub mod proxy;
pub mod runtime;
pub mod source;
pub mod spec;
pub mod store;
pub mod stub;

pub use error::{Result, StoreError};
pub use layout::StoreLayout;
pub use proxy::{StubLike, StubSpec};
pub use runtime::{Capabilities, LoadedSpec, Runtime};
pub use source::{GitReference, SourceKind, SourceOrigin};
pub use spec::Specification;
pub use store::Store;
pub use stub::Stub;
