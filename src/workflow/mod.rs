//! Release workflows as declarative step lists
//!
//! A [Workflow] turns a [ReleaseContext] and [Config] into an ordered list
//! of [Step]s; the [WorkflowRunner] executes them one by one and stops at
//! the first failure. Nothing is rolled back: completed steps stay done.

pub mod runner;
pub mod step;

pub use runner::{WorkflowReport, WorkflowRunner};
pub use step::Step;

use crate::config::Config;
use crate::domain::{ReleaseContext, TagKind, VersionBump};
use crate::git::PushRef;
use std::fmt;

/// The release workflows an operator can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Snapshot tag of the current pre-release version
    Pre,
    /// Patch release from a maintenance branch
    Patch,
    /// Minor release cutting a new maintenance branch
    Minor,
    /// Only the latest-tag reconciliation of a patch release
    AdvanceLatest,
}

impl Workflow {
    pub const ALL: [Workflow; 4] = [
        Workflow::Pre,
        Workflow::Patch,
        Workflow::Minor,
        Workflow::AdvanceLatest,
    ];

    /// Command name of the workflow
    pub fn name(&self) -> &'static str {
        match self {
            Workflow::Pre => "release-pre",
            Workflow::Patch => "release-patch",
            Workflow::Minor => "release-minor",
            Workflow::AdvanceLatest => "advance-latest",
        }
    }

    /// One-line description shown in help output
    pub fn description(&self) -> &'static str {
        match self {
            Workflow::Pre => "Creates prerelease tags",
            Workflow::Patch => {
                "Creates patch-level tag & advances minor tag, and, optionally, the latest tag"
            }
            Workflow::Minor => {
                "Creates maintenance branch, patch- & minor-level tags, and advances latest tag"
            }
            Workflow::AdvanceLatest => "Advances tag \"latest\" if necessary",
        }
    }

    /// Ordered steps of this workflow
    pub fn steps(&self, ctx: &ReleaseContext, config: &Config) -> Vec<Step> {
        let remote = config.git.remote.as_str();
        let source_branch = config.git.source_branch.as_str();

        match self {
            Workflow::Minor => vec![
                Step::ConfirmOnSourceBranch {
                    branch: source_branch.to_string(),
                },
                Step::ConfirmNoUncommittedChanges,
                Step::ConfirmNoStagedChanges,
                Step::FetchTags {
                    remote: remote.to_string(),
                },
                Step::Pull {
                    remote: remote.to_string(),
                },
                Step::Bump(VersionBump::Minor),
                tag(ctx, TagKind::Patch),
                tag(ctx, TagKind::Minor),
                tag(ctx, TagKind::Latest),
                Step::Checkout {
                    branch: ctx.maintenance_branch(),
                    create: true,
                },
                Step::Bump(VersionBump::PrePatch),
                Step::Push {
                    remote: remote.to_string(),
                    target: PushRef::Branch(ctx.maintenance_branch()),
                    force: false,
                    set_upstream: true,
                },
                Step::Checkout {
                    branch: source_branch.to_string(),
                    create: false,
                },
                Step::Bump(VersionBump::PreMinor),
                Step::Push {
                    remote: remote.to_string(),
                    target: PushRef::Branch(source_branch.to_string()),
                    force: false,
                    set_upstream: false,
                },
                push_tag(ctx, TagKind::Patch, remote),
                push_tag(ctx, TagKind::Minor, remote),
                push_tag(ctx, TagKind::Latest, remote),
            ],
            Workflow::Patch => vec![
                Step::ConfirmOnMaintenanceBranch {
                    branch: ctx.maintenance_branch(),
                },
                Step::ConfirmNoUncommittedChanges,
                Step::ConfirmNoStagedChanges,
                Step::FetchTags {
                    remote: remote.to_string(),
                },
                Step::Pull {
                    remote: remote.to_string(),
                },
                Step::Bump(VersionBump::Patch),
                tag(ctx, TagKind::Patch),
                tag(ctx, TagKind::Minor),
                Step::Bump(VersionBump::PrePatch),
                Step::Push {
                    remote: remote.to_string(),
                    target: PushRef::Branch(ctx.maintenance_branch()),
                    force: false,
                    set_upstream: true,
                },
                push_tag(ctx, TagKind::Patch, remote),
                push_tag(ctx, TagKind::Minor, remote),
                advance_latest(ctx, remote),
            ],
            Workflow::Pre => vec![
                Step::ConfirmNoUncommittedChanges,
                Step::ConfirmNoStagedChanges,
                Step::Pull {
                    remote: remote.to_string(),
                },
                tag(ctx, TagKind::Pre),
                Step::Bump(VersionBump::PreRelease),
                Step::Push {
                    remote: remote.to_string(),
                    target: PushRef::Head,
                    force: false,
                    set_upstream: false,
                },
                push_tag(ctx, TagKind::Pre, remote),
            ],
            Workflow::AdvanceLatest => vec![advance_latest(ctx, remote)],
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn tag(ctx: &ReleaseContext, kind: TagKind) -> Step {
    Step::Tag {
        name: ctx.tag(kind),
        force: kind.is_floating(),
    }
}

fn push_tag(ctx: &ReleaseContext, kind: TagKind, remote: &str) -> Step {
    Step::Push {
        remote: remote.to_string(),
        target: PushRef::Tag(ctx.tag(kind)),
        force: kind.is_floating(),
        set_upstream: false,
    }
}

fn advance_latest(ctx: &ReleaseContext, remote: &str) -> Step {
    Step::AdvanceLatestTag {
        patch_tag: ctx.patch_tag(),
        latest_tag: ctx.latest_tag(),
        remote: remote.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(version: &str) -> ReleaseContext {
        ReleaseContext::parse(version, "pre", "v", "latest").unwrap()
    }

    fn descriptions(workflow: Workflow, version: &str) -> Vec<String> {
        workflow
            .steps(&ctx(version), &Config::default())
            .iter()
            .map(Step::to_string)
            .collect()
    }

    #[test]
    fn test_minor_workflow_order() {
        assert_eq!(
            descriptions(Workflow::Minor, "1.3.0-pre.2"),
            vec![
                "confirm on branch master",
                "confirm no uncommitted changes",
                "confirm no staged changes",
                "git fetch --tags origin",
                "git pull origin",
                "bump version (minor)",
                "git tag v1.3.0",
                "git tag -f v1.3",
                "git tag -f latest",
                "git checkout -b v1.3.x",
                "bump version (prepatch)",
                "git push --set-upstream origin v1.3.x",
                "git checkout master",
                "bump version (preminor)",
                "git push origin master",
                "git push origin refs/tags/v1.3.0",
                "git push --force origin refs/tags/v1.3",
                "git push --force origin refs/tags/latest",
            ]
        );
    }

    #[test]
    fn test_patch_workflow_order() {
        assert_eq!(
            descriptions(Workflow::Patch, "1.3.1-pre.0"),
            vec![
                "confirm on maintenance branch v1.3.x",
                "confirm no uncommitted changes",
                "confirm no staged changes",
                "git fetch --tags origin",
                "git pull origin",
                "bump version (patch)",
                "git tag v1.3.1",
                "git tag -f v1.3",
                "bump version (prepatch)",
                "git push --set-upstream origin v1.3.x",
                "git push origin refs/tags/v1.3.1",
                "git push --force origin refs/tags/v1.3",
                "advance tag latest to v1.3.1 if necessary",
            ]
        );
    }

    #[test]
    fn test_pre_workflow_order() {
        assert_eq!(
            descriptions(Workflow::Pre, "1.4.0-pre.0"),
            vec![
                "confirm no uncommitted changes",
                "confirm no staged changes",
                "git pull origin",
                "git tag v1.4.0-pre.0",
                "bump version (prerelease)",
                "git push origin HEAD",
                "git push origin refs/tags/v1.4.0-pre.0",
            ]
        );
    }

    #[test]
    fn test_preconditions_come_first() {
        for workflow in Workflow::ALL {
            let steps = workflow.steps(&ctx("1.3.0-pre.2"), &Config::default());
            let first_action = steps
                .iter()
                .position(|s| !s.is_precondition())
                .unwrap_or(steps.len());
            assert!(
                steps[first_action..].iter().all(|s| !s.is_precondition()),
                "{} interleaves preconditions with actions",
                workflow
            );
        }
    }

    #[test]
    fn test_overridden_remote_and_branch() {
        let config = Config::default().with_overrides(Some("upstream"), Some("main"));
        let steps = Workflow::Minor.steps(&ctx("2.0.0-pre.5"), &config);
        assert_eq!(
            steps[0],
            Step::ConfirmOnSourceBranch {
                branch: "main".to_string()
            }
        );
        assert!(steps.contains(&Step::Push {
            remote: "upstream".to_string(),
            target: PushRef::Branch("main".to_string()),
            force: false,
            set_upstream: false,
        }));
    }

    #[test]
    fn test_immutable_tags_never_forced() {
        for workflow in Workflow::ALL {
            for step in workflow.steps(&ctx("1.3.0-pre.2"), &Config::default()) {
                if let Step::Tag { name, force } = step {
                    let floating = name == "v1.3" || name == "latest";
                    assert_eq!(force, floating, "{}", name);
                }
            }
        }
    }
}
