//! Integration tests for descriptor parsing

use loam_manifest::{from_str, Descriptor, StubHeader};

#[test]
fn test_complete_descriptor() {
    let toml = r#"
        [package]
        name = "dsp"
        version = "1.0.0"
        platform = "any"
        source-roots = ["src", "gen"]
        extensions = ["native/build.toml"]
        authors = ["Test Author <test@example.com>"]
        description = "DSP library"
        license = "MIT"

        [dependencies]
        numeric = "2.0"
        fixed-point = { version = "1.5" }

        [dev-dependencies]
        testkit = "1.0"
    "#;

    let descriptor: Descriptor = from_str(toml).unwrap();

    assert_eq!(descriptor.package.name, "dsp");
    assert_eq!(descriptor.package.version.to_string(), "1.0.0");
    assert_eq!(descriptor.package.license, Some("MIT".to_string()));
    assert_eq!(descriptor.package.source_roots.len(), 2);
    assert_eq!(descriptor.package.extensions.len(), 1);
    assert_eq!(descriptor.dependencies.len(), 2);
    assert_eq!(descriptor.dev_dependencies.len(), 1);

    assert!(descriptor.validate().is_ok());
}

#[test]
fn test_minimal_descriptor() {
    let toml = r#"
        [package]
        name = "my-core"
        version = "0.1.0"
    "#;

    let descriptor: Descriptor = from_str(toml).unwrap();
    assert_eq!(descriptor.package.name, "my-core");
    assert!(!descriptor.package.default_install);
    assert!(descriptor.validate().is_ok());
}

#[test]
fn test_git_dependencies() {
    let toml = r#"
        [package]
        name = "test-lib"
        version = "1.0.0"

        [dependencies]
        experimental = { git = "https://github.com/example/lib", branch = "dev" }
        stable = { git = "https://github.com/example/stable", tag = "v1.0" }
        specific = { git = "https://github.com/example/specific", rev = "abc123" }
    "#;

    let descriptor: Descriptor = from_str(toml).unwrap();
    assert_eq!(descriptor.dependencies.len(), 3);
    assert!(descriptor.validate().is_ok());
}

#[test]
fn test_path_dependencies() {
    let toml = r#"
        [package]
        name = "test-lib"
        version = "1.0.0"

        [dependencies]
        local-lib = { path = "../local-lib" }
        another = { path = "/absolute/path/lib" }
    "#;

    let descriptor: Descriptor = from_str(toml).unwrap();
    assert_eq!(descriptor.dependencies.len(), 2);
    assert!(descriptor.validate().is_ok());
}

#[test]
fn test_invalid_dependency_rejected() {
    let toml = r#"
        [package]
        name = "test-lib"
        version = "1.0.0"

        [dependencies]
        broken = { git = "https://github.com/example/lib", branch = "dev", tag = "v1" }
    "#;

    let descriptor: Descriptor = from_str(toml).unwrap();
    assert!(descriptor.validate().is_err());
}

#[test]
fn test_header_ignored_by_toml_parser() {
    // Descriptors on disk start with the stub header comment lines; the
    // TOML parser must see straight through them.
    let document = "\
# stub: test-lib 1.0.0 any src
# stub-ext: native/build.toml

[package]
name = \"test-lib\"
version = \"1.0.0\"
extensions = [\"native/build.toml\"]
";

    let descriptor: Descriptor = from_str(document).unwrap();
    assert_eq!(descriptor.package.name, "test-lib");

    let header = StubHeader::parse(document).unwrap();
    assert_eq!(header.full_name(), "test-lib-1.0.0");
    assert_eq!(header.extensions, descriptor.package.extensions);
}

#[test]
fn test_document_agrees_with_header() {
    let toml = r#"
        [package]
        name = "dsp"
        version = "0.9.0"
        platform = "linux-x86_64"
        source-roots = ["src"]
    "#;

    let descriptor: Descriptor = from_str(toml).unwrap();
    let document = descriptor.to_document().unwrap();

    let header = StubHeader::parse(&document).unwrap();
    assert_eq!(header, descriptor.stub_header());

    let written = tempfile::TempDir::new().unwrap();
    let path = written.path().join("dsp-0.9.0-linux-x86_64.toml");
    std::fs::write(&path, &document).unwrap();

    assert_eq!(StubHeader::read(&path).unwrap(), header);
    assert_eq!(from_str(&document).unwrap().full_name(), descriptor.full_name());
}
