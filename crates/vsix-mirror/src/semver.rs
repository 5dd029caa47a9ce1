//! Version parsing and engine compatibility ranges
//!
//! Provides parsing and ordering for marketplace version strings and
//! matching of declared engine ranges against a VS Code engine version.

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during version parsing
#[derive(Debug, Error)]
pub enum SemverError {
    /// Invalid version format
    #[error("Invalid version format: {0}")]
    InvalidVersion(String),
}

/// Extension version (MAJOR.MINOR.PATCH with an optional build suffix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub suffix: Option<String>,
}

impl Version {
    /// Parse a version string.
    ///
    /// Exactly three dot-separated segments are required and the first two
    /// must be plain integers. The third segment may carry a hyphenated
    /// suffix: "12-insider" parses as patch 12, suffix "insider". A fourth
    /// dot segment ends up inside the patch ("1.2.3.4" sees patch "3.4") and
    /// is rejected there.
    pub fn parse(s: &str) -> Result<Self, SemverError> {
        let mut segments = s.splitn(3, '.');
        let (Some(major), Some(minor), Some(rest)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(SemverError::InvalidVersion(format!(
                "Expected MAJOR.MINOR.PATCH, got '{}'",
                s
            )));
        };

        let major = major.parse().map_err(|_| {
            SemverError::InvalidVersion(format!("Invalid major version: {}", major))
        })?;

        let minor = minor.parse().map_err(|_| {
            SemverError::InvalidVersion(format!("Invalid minor version: {}", minor))
        })?;

        let (patch, suffix) = match rest.split_once('-') {
            Some((patch, suffix)) => (patch, Some(suffix.to_string())),
            None => (rest, None),
        };

        let patch = patch.parse().map_err(|_| {
            SemverError::InvalidVersion(format!("Invalid patch version: {}", patch))
        })?;

        Ok(Version {
            major,
            minor,
            patch,
            suffix,
        })
    }

    /// Create a new version without a suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    /// Attach a build suffix
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref suffix) = self.suffix {
            write!(f, "-{}", suffix)?;
        }
        Ok(())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match self.patch.cmp(&other.patch) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // A missing suffix compares below any present suffix, so a suffixed
        // build outranks the bare release at the same numeric triple. This is
        // NOT SemVer's prerelease rule; selection of the "latest" artifact
        // depends on it, so do not swap the order.
        match (&self.suffix, &other.suffix) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

/// Engine compatibility declaration on a published extension version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRange {
    /// Wildcard ("*"), matches every engine
    Any,

    /// Caret floor (^1.50.0)
    Caret(Version),

    /// Any other pattern: legacy floors ("0.10.x") and "-insider"
    /// declarations. Never matches.
    Legacy(String),
}

impl EngineRange {
    /// Parse a declared engine range.
    ///
    /// Only the wildcard and caret forms are meaningful; everything else is
    /// kept verbatim as a legacy range. A caret body that is not a valid
    /// version is an error.
    pub fn parse(s: &str) -> Result<Self, SemverError> {
        if s == "*" {
            return Ok(EngineRange::Any);
        }

        match s.strip_prefix('^') {
            Some(rest) => Ok(EngineRange::Caret(Version::parse(rest)?)),
            None => Ok(EngineRange::Legacy(s.to_string())),
        }
    }

    /// Check whether an engine version satisfies this range.
    ///
    /// Caret semantics: same major line, the declared minor is a floor, and a
    /// nonzero declared patch is enforced only within the same minor
    /// (^1.5.0 admits any 1.5.x or later; ^1.5.3 rejects 1.5.2 but admits
    /// 1.6.0).
    pub fn matches(&self, engine: &Version) -> bool {
        let floor = match self {
            EngineRange::Any => return true,
            EngineRange::Legacy(_) => return false,
            EngineRange::Caret(floor) => floor,
        };

        // Insiders-only floors are never satisfied by a release engine.
        if floor.suffix.as_deref() == Some("insiders") {
            return false;
        }

        if floor.major != engine.major {
            return false;
        }
        if floor.minor > engine.minor {
            return false;
        }
        if floor.minor == engine.minor && floor.patch != 0 && floor.patch > engine.patch {
            return false;
        }

        true
    }
}

impl fmt::Display for EngineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineRange::Any => write!(f, "*"),
            EngineRange::Caret(floor) => write!(f, "^{}", floor),
            EngineRange::Legacy(pattern) => write!(f, "{}", pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let v = Version::parse("1.85.2").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 85);
        assert_eq!(v.patch, 2);
        assert!(v.suffix.is_none());
    }

    #[test]
    fn test_parse_version_with_suffix() {
        let v = Version::parse("0.2.12-insider").unwrap();
        assert_eq!(v.major, 0);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 12);
        assert_eq!(v.suffix, Some("insider".to_string()));
    }

    #[test]
    fn test_parse_suffix_keeps_later_hyphens() {
        let v = Version::parse("1.0.3-alpha-2").unwrap();
        assert_eq!(v.patch, 3);
        assert_eq!(v.suffix, Some("alpha-2".to_string()));
    }

    #[test]
    fn test_parse_rejects_two_segments() {
        assert!(Version::parse("1.2").is_err());
    }

    #[test]
    fn test_parse_rejects_four_segments() {
        // The third split segment is "3.4", which is not an integer.
        assert!(Version::parse("1.2.3.4").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(Version::parse("a.b.c").is_err());
        assert!(Version::parse("1.x.0").is_err());
        assert!(Version::parse("-1.2.3").is_err());
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 0, 0) < Version::new(2, 0, 0));
        assert!(Version::new(1, 2, 0) < Version::new(1, 3, 0));
        assert!(Version::new(1, 2, 3) < Version::new(1, 2, 4));
        assert!(Version::new(1, 2, 3) == Version::new(1, 2, 3));
    }

    #[test]
    fn test_suffix_outranks_bare_triple() {
        let bare = Version::new(1, 2, 3);
        let suffixed = Version::new(1, 2, 3).with_suffix("insider");
        assert!(bare < suffixed);
    }

    #[test]
    fn test_suffixes_compare_lexically() {
        let a = Version::new(1, 2, 3).with_suffix("alpha");
        let b = Version::new(1, 2, 3).with_suffix("beta");
        assert!(a < b);
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["1.85.0", "0.2.12-insider"] {
            assert_eq!(Version::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_range_any_matches_everything() {
        let range = EngineRange::parse("*").unwrap();
        assert!(range.matches(&Version::new(0, 0, 1)));
        assert!(range.matches(&Version::new(1, 85, 0)));
    }

    #[test]
    fn test_range_without_caret_never_matches() {
        for pattern in ["1.50.0", "0.10.x", "1.44.0-insider"] {
            let range = EngineRange::parse(pattern).unwrap();
            assert!(matches!(range, EngineRange::Legacy(_)));
            assert!(!range.matches(&Version::new(1, 60, 0)));
        }
    }

    #[test]
    fn test_caret_minor_floor() {
        let range = EngineRange::parse("^1.50.0").unwrap();
        assert!(range.matches(&Version::new(1, 60, 3)));
        assert!(range.matches(&Version::new(1, 50, 0)));
        assert!(!range.matches(&Version::new(1, 49, 9)));
    }

    #[test]
    fn test_caret_rejects_other_majors() {
        let range = EngineRange::parse("^1.50.0").unwrap();
        assert!(!range.matches(&Version::new(2, 0, 0)));
        assert!(!range.matches(&Version::new(0, 60, 0)));
    }

    #[test]
    fn test_caret_patch_enforced_within_minor() {
        let range = EngineRange::parse("^1.50.3").unwrap();
        assert!(!range.matches(&Version::new(1, 50, 2)));
        assert!(range.matches(&Version::new(1, 50, 3)));
        // A later minor clears the patch floor entirely.
        assert!(range.matches(&Version::new(1, 51, 0)));
    }

    #[test]
    fn test_caret_zero_patch_escape() {
        let range = EngineRange::parse("^1.5.0").unwrap();
        assert!(range.matches(&Version::new(1, 5, 0)));
        assert!(range.matches(&Version::new(1, 5, 9)));
        assert!(range.matches(&Version::new(1, 6, 0)));
    }

    #[test]
    fn test_caret_insiders_floor_never_matches() {
        let range = EngineRange::parse("^1.75.0-insiders").unwrap();
        assert!(!range.matches(&Version::new(1, 75, 0)));
        assert!(!range.matches(&Version::new(1, 99, 0)));
    }

    #[test]
    fn test_caret_with_other_suffix_matches_numerically() {
        let range = EngineRange::parse("^1.75.0-20230120").unwrap();
        assert!(range.matches(&Version::new(1, 80, 0)));
    }

    #[test]
    fn test_caret_with_malformed_body_is_an_error() {
        assert!(EngineRange::parse("^1.50").is_err());
        assert!(EngineRange::parse("^banana").is_err());
    }

    #[test]
    fn test_range_display() {
        for s in ["*", "^1.50.0", "0.10.x"] {
            assert_eq!(EngineRange::parse(s).unwrap().to_string(), s);
        }
    }
}
