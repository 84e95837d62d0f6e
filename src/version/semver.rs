use std::cmp::Ordering;
use std::fmt;

use semver::Version;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros and strips
/// a single leading `v`/`V`.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Result<Version, semver::Error> {
    let version = strip_v_prefix(version.trim());
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);
    let normalized = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => version.to_string(),
    };
    Version::parse(&normalized)
}

pub(crate) fn strip_v_prefix(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// A git tag (or user supplied version) together with its parsed version.
///
/// Comparison follows semver precedence, so build metadata is ignored;
/// `name` keeps the text exactly as it was written so that `v3.0.0` is
/// rendered back as `v3.0.0`.
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: String,
    pub version: Version,
}

impl Tag {
    pub fn parse(name: &str) -> Result<Self, semver::Error> {
        let name = name.trim();
        Ok(Self {
            version: parse_version(name)?,
            name: name.to_string(),
        })
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp_precedence(&other.version)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
