//! Semantic version checks used when comparing release tags.
//!
//! Thin, stateless layer over the `semver` crate. Tag names may carry a
//! single leading `v` (e.g. `v1.2.3`); anything else that does not parse
//! as a strict semantic version is rejected.

use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;

/// Parses a version from a tag or version string.
///
/// Surrounding whitespace and one leading `v` are ignored.
///
/// # Example
/// ```
/// # use git_release::version::parse;
/// assert_eq!(parse("v1.2.3").unwrap().to_string(), "1.2.3");
/// assert_eq!(parse(" 1.2.3-pre.1 ").unwrap().to_string(), "1.2.3-pre.1");
/// assert!(parse("v1.2").is_none());
/// ```
pub fn parse(s: &str) -> Option<Version> {
    let trimmed = s.trim();
    let clean = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(clean).ok()
}

/// Returns true iff `s` parses as a semantic version.
pub fn is_valid(s: &str) -> bool {
    parse(s).is_some()
}

/// Parses `s` and strips any prerelease and build suffix.
///
/// Returns `None` for invalid input; callers are expected to filter such
/// names out rather than fail.
pub fn normalize(s: &str) -> Option<Version> {
    parse(s).map(|v| strip_suffixes(&v))
}

/// Drops the prerelease and build metadata of a version.
pub fn strip_suffixes(version: &Version) -> Version {
    Version {
        major: version.major,
        minor: version.minor,
        patch: version.patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    }
}

/// Orders versions newest first by semver precedence.
///
/// Build metadata does not take part in precedence.
pub fn compare_descending(a: &Version, b: &Version) -> Ordering {
    precedence(b, a)
}

/// Strict greater-than by semver precedence.
pub fn greater_than(a: &Version, b: &Version) -> bool {
    precedence(a, b) == Ordering::Greater
}

fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}
