use crate::domain::VersionBump;
use crate::git::PushRef;
use std::fmt;

/// One atomic step of a release workflow
///
/// Steps are plain descriptors with all parameters resolved from the
/// release context; the runner gives them meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Fail unless the checked-out branch is the source branch
    ConfirmOnSourceBranch { branch: String },
    /// Fail unless the checked-out branch is the `vX.Y.x` maintenance
    /// branch matching the manifest version
    ConfirmOnMaintenanceBranch { branch: String },
    /// Fail if the working tree has modified or untracked files
    ConfirmNoUncommittedChanges,
    /// Fail if the index holds staged changes
    ConfirmNoStagedChanges,
    FetchTags { remote: String },
    Pull { remote: String },
    /// Bump the manifest version and commit it
    Bump(VersionBump),
    Tag { name: String, force: bool },
    Checkout { branch: String, create: bool },
    Push {
        remote: String,
        target: PushRef,
        force: bool,
        set_upstream: bool,
    },
    /// Move the latest tag to `patch_tag` if it is the newest release
    AdvanceLatestTag {
        patch_tag: String,
        latest_tag: String,
        remote: String,
    },
}

impl Step {
    /// Whether the step only inspects the repository
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Step::ConfirmOnSourceBranch { .. }
                | Step::ConfirmOnMaintenanceBranch { .. }
                | Step::ConfirmNoUncommittedChanges
                | Step::ConfirmNoStagedChanges
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::ConfirmOnSourceBranch { branch } => write!(f, "confirm on branch {}", branch),
            Step::ConfirmOnMaintenanceBranch { branch } => {
                write!(f, "confirm on maintenance branch {}", branch)
            }
            Step::ConfirmNoUncommittedChanges => write!(f, "confirm no uncommitted changes"),
            Step::ConfirmNoStagedChanges => write!(f, "confirm no staged changes"),
            Step::FetchTags { remote } => write!(f, "git fetch --tags {}", remote),
            Step::Pull { remote } => write!(f, "git pull {}", remote),
            Step::Bump(kind) => write!(f, "bump version ({})", kind),
            Step::Tag { name, force } => {
                if *force {
                    write!(f, "git tag -f {}", name)
                } else {
                    write!(f, "git tag {}", name)
                }
            }
            Step::Checkout { branch, create } => {
                if *create {
                    write!(f, "git checkout -b {}", branch)
                } else {
                    write!(f, "git checkout {}", branch)
                }
            }
            Step::Push {
                remote,
                target,
                force,
                set_upstream,
            } => {
                write!(f, "git push")?;
                if *force {
                    write!(f, " --force")?;
                }
                if *set_upstream {
                    write!(f, " --set-upstream")?;
                }
                write!(f, " {} {}", remote, target.refspec())
            }
            Step::AdvanceLatestTag {
                patch_tag,
                latest_tag,
                ..
            } => write!(
                f,
                "advance tag {} to {} if necessary",
                latest_tag, patch_tag
            ),
        }
    }
}
