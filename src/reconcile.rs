//! Advancing the floating `latest` tag after a patch release.
//!
//! `latest` must follow the newest release. After a patch tag is created on
//! a maintenance branch, `latest` only moves if the new patch is strictly
//! newer than every release tag currently sharing `latest`'s commit. Older
//! maintenance lines can therefore keep releasing without stealing `latest`.

use crate::boundary::BoundaryWarning;
use crate::domain::Tag;
use crate::error::{GitReleaseError, Result};
use crate::git::{PushOptions, PushRef, TagLookup, TagOptions, Vcs};
use crate::version;
use log::{info, warn};
use semver::Version;

/// What to do with the latest tag
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Move (or create) the latest tag to the new patch tag's commit.
    /// `prior` is the most recent release it pointed at, `None` when the
    /// latest tag did not exist.
    Create { prior: Option<Version> },
    /// The new patch is not newer than the current latest release
    Keep { prior: Version },
    /// The latest tag is inconsistent; leave it alone
    Skip(BoundaryWarning),
}

impl Decision {
    pub fn should_create(&self) -> bool {
        matches!(self, Decision::Create { .. })
    }
}

/// Most recent release among the tags co-located with the latest tag
///
/// Drops `latest_tag` itself and every name that is not a semantic version,
/// strips pre-release suffixes, de-duplicates (first occurrence wins) and
/// returns the maximum. `None` when nothing valid remains.
pub fn most_recent_release<S: AsRef<str>>(tags: &[S], latest_tag: &str) -> Option<Version> {
    let mut distinct: Vec<Version> = Vec::new();
    for name in tags.iter().map(AsRef::as_ref) {
        if name == latest_tag {
            continue;
        }
        if let Some(v) = version::normalize(name) {
            if !distinct.contains(&v) {
                distinct.push(v);
            }
        }
    }

    distinct.sort_by(version::compare_descending);
    distinct.into_iter().next()
}

/// Decides whether the floating latest tag follows a new patch tag, and moves it
pub struct LatestTagReconciler<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    latest_tag: &'a str,
    remote: &'a str,
}

impl<'a, V: Vcs + ?Sized> LatestTagReconciler<'a, V> {
    pub fn new(vcs: &'a V, latest_tag: &'a str, remote: &'a str) -> Self {
        LatestTagReconciler {
            vcs,
            latest_tag,
            remote,
        }
    }

    /// Decide without touching the repository
    ///
    /// # Arguments
    /// * `new_patch` - Version of the patch tag just created
    ///
    /// # Returns
    /// * `Ok(Decision)` - Create, Keep, or Skip
    /// * `Err` - If git fails for any reason other than a missing latest tag
    pub fn decide(&self, new_patch: &Version) -> Result<Decision> {
        info!("finding commit that latest tag '{}' points to", self.latest_tag);
        let commit = match self.resolve(self.latest_tag)?.target {
            Some(commit) => commit,
            None => {
                info!("no latest tag '{}' found", self.latest_tag);
                return Ok(Decision::Create { prior: None });
            }
        };
        info!("latest tag '{}' points to commit {}", self.latest_tag, commit);

        let colocated = self.vcs.tags_pointing_at(&commit)?;
        info!("tags at latest tag '{}': {}", self.latest_tag, colocated);

        let prior = match most_recent_release(colocated.names(), self.latest_tag) {
            Some(prior) => prior,
            None => {
                let warning = BoundaryWarning::InconsistentLatestTag {
                    tag: self.latest_tag.to_string(),
                    commit,
                    colocated: colocated.names().to_vec(),
                };
                warn!("{}", warning);
                return Ok(Decision::Skip(warning));
            }
        };

        if version::greater_than(new_patch, &prior) {
            info!("new release {} is NEWER than latest release {}", new_patch, prior);
            Ok(Decision::Create { prior: Some(prior) })
        } else {
            info!("new release {} is NOT newer than latest release {}", new_patch, prior);
            Ok(Decision::Keep { prior })
        }
    }

    /// Decide and, on `Create`, move the latest tag to `patch_tag`'s commit
    /// and force-push it
    ///
    /// # Arguments
    /// * `patch_tag` - Name of the patch tag just created (e.g. "v1.3.1")
    ///
    /// # Returns
    /// * `Ok(Decision)` - The decision that was applied
    /// * `Err` - If the patch tag is not a version, is missing, or git fails
    pub fn reconcile(&self, patch_tag: &str) -> Result<Decision> {
        let new_patch = Tag::new(patch_tag).version().ok_or_else(|| {
            GitReleaseError::version(format!(
                "Patch tag '{}' is not a semantic version",
                patch_tag
            ))
        })?;

        let decision = self.decide(&new_patch)?;
        if !decision.should_create() {
            info!("NOT advancing latest tag '{}'", self.latest_tag);
            return Ok(decision);
        }

        let target = self.resolve(patch_tag)?.target.ok_or_else(|| {
            GitReleaseError::UnknownRef(format!("patch tag '{}' does not exist", patch_tag))
        })?;

        info!(
            "advancing latest tag '{}' to commit {} of {}",
            self.latest_tag, target, patch_tag
        );
        self.vcs.create_tag(
            self.latest_tag,
            &TagOptions {
                force: true,
                at: Some(target),
            },
        )?;
        self.vcs.push(
            self.remote,
            &PushRef::Tag(self.latest_tag.to_string()),
            PushOptions {
                force: true,
                set_upstream: false,
            },
        )?;

        Ok(decision)
    }

    /// Look a tag up; a missing tag comes back without a target
    fn resolve(&self, name: &str) -> Result<Tag> {
        Ok(match self.vcs.resolve_tag_commit(name)? {
            TagLookup::Found(commit) => Tag::at(name, commit),
            TagLookup::NotFound => Tag::new(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_most_recent_release_collapses_prerelease_duplicates() {
        let tags = ["latest", "v1.3.0", "v1.3.0-pre.2"];
        assert_eq!(most_recent_release(&tags, "latest"), Some(v("1.3.0")));
    }

    #[test]
    fn test_most_recent_release_picks_overall_maximum() {
        let tags = ["v1.2.9", "latest", "v1.10.0", "v1.3", "v1.9.0"];
        assert_eq!(most_recent_release(&tags, "latest"), Some(v("1.10.0")));
    }

    #[test]
    fn test_most_recent_release_counts_stripped_prerelease() {
        let tags = ["latest", "v1.2.0-pre.3"];
        assert_eq!(most_recent_release(&tags, "latest"), Some(v("1.2.0")));
    }

    #[test]
    fn test_most_recent_release_ignores_non_versions() {
        let tags = ["latest", "v1.3", "stable", "v1.2.x"];
        assert_eq!(most_recent_release(&tags, "latest"), None);
        let empty: [&str; 0] = [];
        assert_eq!(most_recent_release(&empty, "latest"), None);
    }

    #[test]
    fn test_custom_latest_tag_name() {
        let tags = ["latest", "v2.0.0"];
        assert_eq!(most_recent_release(&tags, "stable"), Some(v("2.0.0")));
    }
}
