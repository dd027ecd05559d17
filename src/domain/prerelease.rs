//! Pre-release identifiers of the form `<name>.<iteration>` (e.g. `pre.3`).
//!
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{GitReleaseError, Result};
use semver::Prerelease;
use std::fmt;

/// Pre-release identifier with optional iteration number
///
/// # Examples
/// - "pre" -> PreRelease { identifier: "pre", iteration: None }
/// - "pre.3" -> PreRelease { identifier: "pre", iteration: Some(3) }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub identifier: String,
    pub iteration: Option<u64>,
}

impl PreRelease {
    /// Create a new pre-release identifier
    pub fn new(identifier: impl Into<String>, iteration: Option<u64>) -> Self {
        PreRelease {
            identifier: identifier.into(),
            iteration,
        }
    }

    /// Parse a pre-release from its semver representation
    ///
    /// Only the first two dot-separated parts are considered; a second part
    /// that is not a number counts as no iteration.
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - Parsed pre-release
    /// * `Err` - If the prerelease is empty
    pub fn parse(pre: &Prerelease) -> Result<Self> {
        if pre.is_empty() {
            return Err(GitReleaseError::version("Empty pre-release identifier"));
        }

        let mut parts = pre.as_str().split('.');
        let identifier = parts.next().unwrap_or_default().to_string();
        let iteration = parts.next().and_then(|p| p.parse::<u64>().ok());

        Ok(PreRelease {
            identifier,
            iteration,
        })
    }

    /// The pre-release following this one under identifier `name`
    ///
    /// Same identifier: the iteration is incremented (a missing iteration
    /// becomes 0). Different identifier: restarts at `<name>.0`.
    pub fn next(&self, name: &str) -> Self {
        if self.identifier == name {
            PreRelease::new(name, Some(self.iteration.map_or(0, |n| n + 1)))
        } else {
            PreRelease::new(name, Some(0))
        }
    }

    /// Convert back into a semver prerelease
    pub fn to_semver(&self) -> Result<Prerelease> {
        Prerelease::new(&self.to_string()).map_err(|e| {
            GitReleaseError::version(format!("Invalid pre-release '{}': {}", self, e))
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(iter) = self.iteration {
            write!(f, ".{}", iter)?;
        }
        Ok(())
    }
}
