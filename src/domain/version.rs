use crate::domain::prerelease::PreRelease;
use crate::error::{GitReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Kind of manifest version bump performed by a workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    PreRelease,
}

impl VersionBump {
    /// Name of the bump as accepted by `FromStr` (e.g. "prepatch")
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
            VersionBump::PreMajor => "premajor",
            VersionBump::PreMinor => "preminor",
            VersionBump::PrePatch => "prepatch",
            VersionBump::PreRelease => "prerelease",
        }
    }

    /// Bump `version` using `prerelease_name` as the pre-release identifier
    ///
    /// - **Major/Minor/Patch**: a pre-release of the target version is
    ///   promoted by dropping its suffix (`1.3.0-pre.2` -> `1.3.0` for minor),
    ///   otherwise the field is incremented and lower fields reset
    /// - **PreMajor/PreMinor/PrePatch**: field incremented, `-<name>.0` appended
    /// - **PreRelease**: `1.3.0` -> `1.3.1-<name>.0`, `1.3.1-<name>.4` -> `1.3.1-<name>.5`
    ///
    /// Build metadata is always dropped.
    pub fn apply(&self, version: &Version, prerelease_name: &str) -> Result<Version> {
        let (major, minor, patch) = (version.major, version.minor, version.patch);
        let is_pre = !version.pre.is_empty();
        let first_pre = || PreRelease::new(prerelease_name, Some(0)).to_semver();

        let bumped = match self {
            VersionBump::Major if is_pre && minor == 0 && patch == 0 => {
                release(major, minor, patch, Prerelease::EMPTY)
            }
            VersionBump::Major => release(major + 1, 0, 0, Prerelease::EMPTY),
            VersionBump::Minor if is_pre && patch == 0 => {
                release(major, minor, patch, Prerelease::EMPTY)
            }
            VersionBump::Minor => release(major, minor + 1, 0, Prerelease::EMPTY),
            VersionBump::Patch if is_pre => release(major, minor, patch, Prerelease::EMPTY),
            VersionBump::Patch => release(major, minor, patch + 1, Prerelease::EMPTY),
            VersionBump::PreMajor => release(major + 1, 0, 0, first_pre()?),
            VersionBump::PreMinor => release(major, minor + 1, 0, first_pre()?),
            VersionBump::PrePatch => release(major, minor, patch + 1, first_pre()?),
            VersionBump::PreRelease if !is_pre => release(major, minor, patch + 1, first_pre()?),
            VersionBump::PreRelease => {
                let next = PreRelease::parse(&version.pre)?.next(prerelease_name);
                release(major, minor, patch, next.to_semver()?)
            }
        };

        Ok(bumped)
    }
}

fn release(major: u64, minor: u64, patch: u64, pre: Prerelease) -> Version {
    Version {
        major,
        minor,
        patch,
        pre,
        build: BuildMetadata::EMPTY,
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VersionBump {
    type Err = GitReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            "premajor" => Ok(VersionBump::PreMajor),
            "preminor" => Ok(VersionBump::PreMinor),
            "prepatch" => Ok(VersionBump::PrePatch),
            "prerelease" => Ok(VersionBump::PreRelease),
            other => Err(GitReleaseError::version(format!(
                "Unknown version bump: '{}'",
                other
            ))),
        }
    }
}
