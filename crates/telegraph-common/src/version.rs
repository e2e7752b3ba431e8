//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current encounter content version (rigs and move tables).
    pub const CONTENT: Self = Self::new(1, 0, 0);

    /// Parses a `major.minor.patch` string. Missing trailing parts read as 0.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
        let patch = parts.next().map_or(Some(0), |p| p.parse().ok())?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(major, minor, patch))
    }

    /// Checks if this version is compatible with another version.
    /// Compatible means same major version and this minor >= other minor.
    #[must_use]
    pub const fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        assert_eq!(SchemaVersion::parse("1.2.3"), Some(SchemaVersion::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_short() {
        assert_eq!(SchemaVersion::parse("2"), Some(SchemaVersion::new(2, 0, 0)));
        assert_eq!(SchemaVersion::parse("1.4"), Some(SchemaVersion::new(1, 4, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(SchemaVersion::parse("one.two"), None);
        assert_eq!(SchemaVersion::parse("1.2.3.4"), None);
        assert_eq!(SchemaVersion::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SchemaVersion::CONTENT.to_string(), "1.0.0");
    }
}
