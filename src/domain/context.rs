use crate::domain::tag::TagKind;
use crate::error::{GitReleaseError, Result};
use semver::Version;

/// Tag and branch names derived once from the manifest version
///
/// The manifest version must be `X.Y.Z` or `X.Y.Z-<prerelease_name>.N`.
/// For `1.3.0-pre.2` with prefix `v` the context yields:
///
/// | name | value |
/// |---|---|
/// | pre tag | `v1.3.0-pre.2` |
/// | patch tag | `v1.3.0` |
/// | minor tag | `v1.3` |
/// | latest tag | `latest` |
/// | maintenance branch | `v1.3.x` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<u64>,
    version: String,
    tag_prefix: String,
    latest_tag: String,
}

impl ReleaseContext {
    /// Parse the manifest version into a release context
    ///
    /// # Arguments
    /// * `version` - Manifest version string (e.g. "1.3.0-pre.2")
    /// * `prerelease_name` - Pre-release identifier (e.g. "pre")
    /// * `tag_prefix` - Prefix of release tags (e.g. "v")
    /// * `latest_tag` - Name of the floating latest tag
    ///
    /// # Returns
    /// * `Ok(ReleaseContext)` - Parsed context
    /// * `Err` - If the version is not of the expected form
    pub fn parse(
        version: &str,
        prerelease_name: &str,
        tag_prefix: &str,
        latest_tag: &str,
    ) -> Result<Self> {
        let pattern = format!(
            r"^(\d+)\.(\d+)\.(\d+)(-{}\.(\d+))?$",
            regex::escape(prerelease_name)
        );
        let re = regex::Regex::new(&pattern)
            .map_err(|e| GitReleaseError::version(format!("Invalid pre-release name: {}", e)))?;

        let invalid = || {
            GitReleaseError::version(format!(
                "Manifest version '{}' is not of the form X.Y.Z or X.Y.Z-{}.N",
                version, prerelease_name
            ))
        };

        let caps = re.captures(version).ok_or_else(invalid)?;
        let number = |i: usize| -> Result<u64> {
            caps[i].parse::<u64>().map_err(|_| invalid())
        };

        let prerelease = match caps.get(5) {
            Some(m) => Some(m.as_str().parse::<u64>().map_err(|_| invalid())?),
            None => None,
        };

        Ok(ReleaseContext {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            prerelease,
            version: version.to_string(),
            tag_prefix: tag_prefix.to_string(),
            latest_tag: latest_tag.to_string(),
        })
    }

    /// The full manifest version this context was built from
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `major.minor.patch` without pre-release suffix
    pub fn patch_version(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Whether the manifest version carries a pre-release counter
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    pub fn pre_tag(&self) -> String {
        format!("{}{}", self.tag_prefix, self.version)
    }

    pub fn patch_tag(&self) -> String {
        format!(
            "{}{}.{}.{}",
            self.tag_prefix, self.major, self.minor, self.patch
        )
    }

    pub fn minor_tag(&self) -> String {
        format!("{}{}.{}", self.tag_prefix, self.major, self.minor)
    }

    pub fn latest_tag(&self) -> String {
        self.latest_tag.clone()
    }

    /// Tag name for one of the four release tag kinds
    pub fn tag(&self, kind: TagKind) -> String {
        match kind {
            TagKind::Pre => self.pre_tag(),
            TagKind::Patch => self.patch_tag(),
            TagKind::Minor => self.minor_tag(),
            TagKind::Latest => self.latest_tag(),
        }
    }

    /// Maintenance branch for this minor line, e.g. `v1.3.x`
    pub fn maintenance_branch(&self) -> String {
        format!("v{}.{}.x", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(version: &str) -> ReleaseContext {
        ReleaseContext::parse(version, "pre", "v", "latest").unwrap()
    }

    #[test]
    fn test_parse_prerelease_version() {
        let c = ctx("1.3.0-pre.2");
        assert_eq!((c.major, c.minor, c.patch), (1, 3, 0));
        assert_eq!(c.prerelease, Some(2));
        assert!(c.is_prerelease());
    }

    #[test]
    fn test_tag_names() {
        let c = ctx("1.3.0-pre.2");
        assert_eq!(c.pre_tag(), "v1.3.0-pre.2");
        assert_eq!(c.patch_tag(), "v1.3.0");
        assert_eq!(c.minor_tag(), "v1.3");
        assert_eq!(c.latest_tag(), "latest");
        assert_eq!(c.maintenance_branch(), "v1.3.x");
        assert_eq!(c.tag(TagKind::Minor), "v1.3");
    }

    #[test]
    fn test_release_version_without_counter() {
        let c = ctx("2.0.11");
        assert_eq!(c.prerelease, None);
        assert_eq!(c.pre_tag(), "v2.0.11");
        assert_eq!(c.patch_version(), Version::new(2, 0, 11));
    }

    #[test]
    fn test_custom_prefix_and_prerelease_name() {
        let c = ReleaseContext::parse("0.4.1-rc.7", "rc", "release-", "stable").unwrap();
        assert_eq!(c.patch_tag(), "release-0.4.1");
        assert_eq!(c.pre_tag(), "release-0.4.1-rc.7");
        assert_eq!(c.latest_tag(), "stable");
        assert_eq!(c.maintenance_branch(), "v0.4.x");
    }

    #[test]
    fn test_rejects_unexpected_versions() {
        for bad in ["1.3", "1.3.0-alpha.1", "1.3.0-pre", "v1.3.0", "1.3.0+b", ""] {
            assert!(
                ReleaseContext::parse(bad, "pre", "v", "latest").is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }
}
