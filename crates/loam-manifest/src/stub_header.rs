//! The stub header: the cheap read path for installed descriptors.
//!
//! Descriptor files written by the store begin with one or two comment
//! lines summarizing the package:
//!
//! ```text
//! # stub: fixed-point 2.1.0 any src
//! # stub-ext: native/build.toml
//! ```
//!
//! A stub record can be built from these lines alone; the TOML body is
//! never touched on this path. The second line is present only for
//! packages that declare native extensions.

use crate::error::{ManifestError, Result};
use semver::Version;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Prefix of the mandatory first header line.
pub const STUB_PREFIX: &str = "# stub: ";

/// Prefix of the optional extensions line.
pub const STUB_EXT_PREFIX: &str = "# stub-ext: ";

/// Parsed stub header of a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubHeader {
    pub name: String,
    pub version: Version,
    pub platform: String,
    pub source_roots: Vec<String>,
    pub extensions: Vec<String>,
}

impl StubHeader {
    /// Read the header from the leading lines of the descriptor at `path`.
    ///
    /// Reads at most two lines of the file.
    pub fn read(path: impl AsRef<Path>) -> Result<StubHeader> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ManifestError::Io(e.to_string()))?;
        let mut lines = BufReader::new(file).lines();

        let first = match lines.next() {
            Some(line) => line.map_err(|e| ManifestError::Io(e.to_string()))?,
            None => String::new(),
        };
        let second = match lines.next() {
            Some(line) => line.map_err(|e| ManifestError::Io(e.to_string()))?,
            None => String::new(),
        };

        Self::parse_lines(&first, &second)
            .map_err(|reason| ManifestError::StubHeader(format!("{}: {}", path.display(), reason)))
    }

    /// Parse the header from a full descriptor document.
    pub fn parse(document: &str) -> Result<StubHeader> {
        let mut lines = document.lines();
        let first = lines.next().unwrap_or_default();
        let second = lines.next().unwrap_or_default();

        Self::parse_lines(first, second).map_err(ManifestError::StubHeader)
    }

    fn parse_lines(first: &str, second: &str) -> std::result::Result<StubHeader, String> {
        let rest = first
            .strip_prefix(STUB_PREFIX)
            .ok_or_else(|| "missing `# stub:` line".to_string())?;

        let mut fields = rest.split_whitespace();
        let name = fields
            .next()
            .ok_or_else(|| "missing package name".to_string())?
            .to_string();
        let version = fields.next().ok_or_else(|| "missing version".to_string())?;
        let version =
            Version::parse(version).map_err(|e| format!("bad version '{}': {}", version, e))?;
        let platform = fields
            .next()
            .ok_or_else(|| "missing platform".to_string())?
            .to_string();
        let source_roots = fields.next().map(split_list).unwrap_or_default();

        let extensions = second
            .strip_prefix(STUB_EXT_PREFIX)
            .map(split_list)
            .unwrap_or_default();

        Ok(StubHeader {
            name,
            version,
            platform,
            source_roots,
            extensions,
        })
    }

    /// Render the header lines, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = format!("{}{} {} {}", STUB_PREFIX, self.name, self.version, self.platform);
        if !self.source_roots.is_empty() {
            out.push(' ');
            out.push_str(&self.source_roots.join(","));
        }
        out.push('\n');
        if !self.extensions.is_empty() {
            out.push_str(STUB_EXT_PREFIX);
            out.push_str(&self.extensions.join(","));
            out.push('\n');
        }
        out
    }

    /// Full name under which the package is installed in a store.
    pub fn full_name(&self) -> String {
        if self.platform == crate::DEFAULT_PLATFORM {
            format!("{}-{}", self.name, self.version)
        } else {
            format!("{}-{}-{}", self.name, self.version, self.platform)
        }
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_header() {
        let header = StubHeader::parse("# stub: fixed-point 2.1.0 any src\n").unwrap();
        assert_eq!(header.name, "fixed-point");
        assert_eq!(header.version.to_string(), "2.1.0");
        assert_eq!(header.platform, "any");
        assert_eq!(header.source_roots, vec!["src".to_string()]);
        assert!(header.extensions.is_empty());
    }

    #[test]
    fn test_parse_header_with_extensions() {
        let doc = "# stub: dsp 0.9.0 linux-x86_64 src,gen\n# stub-ext: native/build.toml\n";
        let header = StubHeader::parse(doc).unwrap();
        assert_eq!(header.source_roots.len(), 2);
        assert_eq!(header.extensions, vec!["native/build.toml".to_string()]);
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        assert!(StubHeader::parse("[package]\nname = \"x\"\n").is_err());
        assert!(StubHeader::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        assert!(StubHeader::parse("# stub: x not-a-version any src\n").is_err());
    }

    #[test]
    fn test_render_round_trip() {
        let header = StubHeader {
            name: "dsp".to_string(),
            version: Version::new(0, 9, 0),
            platform: "linux-x86_64".to_string(),
            source_roots: vec!["src".to_string(), "gen".to_string()],
            extensions: vec!["native/build.toml".to_string()],
        };

        let parsed = StubHeader::parse(&header.render()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_read_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("dsp-0.9.0.toml");
        std::fs::write(&path, "# stub: dsp 0.9.0 any src\n\n[package]\n").unwrap();

        let header = StubHeader::read(&path).unwrap();
        assert_eq!(header.name, "dsp");
    }

    #[test]
    fn test_full_name_omits_default_platform() {
        let header = StubHeader::parse("# stub: dsp 0.9.0 any src\n").unwrap();
        assert_eq!(header.full_name(), "dsp-0.9.0");

        let header = StubHeader::parse("# stub: dsp 0.9.0 linux-x86_64 src\n").unwrap();
        assert_eq!(header.full_name(), "dsp-0.9.0-linux-x86_64");
    }
}
