//! Version and build information.
//!
//! Provides version, commit, and build metadata, plus the release the
//! version-currency check compares against.

use std::fmt;

/// Latest published release of this service, updated on each release.
pub const LATEST_RELEASE: &str = "0.1.0";

/// Build information for the running binary.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: &'static str,
}

impl BuildInfo {
    /// Build information of the current binary.
    pub fn current() -> Self {
        BuildInfo {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("SERVICE_GIT_HASH"),
            build_date: option_env!("SERVICE_BUILD_DATE"),
            target: std::env::consts::ARCH,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service-bootstrap {}", self.version)?;

        if let Some(commit) = self.commit {
            write!(f, " ({commit})")?;
        }
        if let Some(date) = self.build_date {
            write!(f, " built {date}")?;
        }
        write!(f, " [{}]", self.target)
    }
}

/// Parse a "major.minor.patch" release string. Pre-release suffixes and
/// anything else non-numeric yield `None`.
pub fn parse_release(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_releases() {
        assert_eq!(parse_release("1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_release("0.1.0"), Some((0, 1, 0)));
    }

    #[test]
    fn rejects_malformed_versions() {
        assert_eq!(parse_release("1.2"), None);
        assert_eq!(parse_release("1.2.3.4"), None);
        assert_eq!(parse_release("1.2.x"), None);
        assert_eq!(parse_release(""), None);
    }

    #[test]
    fn latest_release_is_parseable() {
        assert!(parse_release(LATEST_RELEASE).is_some());
    }

    #[test]
    fn current_build_version_matches_manifest() {
        assert_eq!(BuildInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
