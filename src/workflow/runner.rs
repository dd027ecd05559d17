use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{BranchContext, ReleaseContext, VersionBump};
use crate::error::{GitReleaseError, Result};
use crate::git::{PushOptions, TagOptions, Vcs};
use crate::manifest::Manifest;
use crate::reconcile::{Decision, LatestTagReconciler};
use crate::ui;
use crate::workflow::{Step, Workflow};
use log::info;

/// Summary of a workflow run that completed every step
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub workflow: Workflow,
    pub completed: Vec<Step>,
    /// Decision of the latest-tag reconciliation, if the workflow has one
    pub latest: Option<Decision>,
    pub warnings: Vec<BoundaryWarning>,
}

impl WorkflowReport {
    fn new(workflow: Workflow) -> Self {
        WorkflowReport {
            workflow,
            completed: Vec::new(),
            latest: None,
            warnings: Vec::new(),
        }
    }
}

/// Executes workflow steps strictly in order against explicit collaborators
///
/// The first failing step aborts the run with
/// [GitReleaseError::StepFailed]; earlier steps are not undone.
pub struct WorkflowRunner<'a, V: Vcs + ?Sized, M: Manifest + ?Sized> {
    vcs: &'a V,
    manifest: &'a M,
    config: &'a Config,
}

impl<'a, V: Vcs + ?Sized, M: Manifest + ?Sized> WorkflowRunner<'a, V, M> {
    pub fn new(vcs: &'a V, manifest: &'a M, config: &'a Config) -> Self {
        WorkflowRunner {
            vcs,
            manifest,
            config,
        }
    }

    /// Run every step of `workflow` for `ctx`
    pub fn run(&self, workflow: Workflow, ctx: &ReleaseContext) -> Result<WorkflowReport> {
        let steps = workflow.steps(ctx, self.config);
        self.run_steps(workflow, &steps)
    }

    /// Run an explicit step list
    ///
    /// # Returns
    /// * `Ok(WorkflowReport)` - All steps succeeded
    /// * `Err(GitReleaseError::StepFailed)` - The first failing step, with
    ///   its 1-based index and description
    pub fn run_steps(&self, workflow: Workflow, steps: &[Step]) -> Result<WorkflowReport> {
        let mut report = WorkflowReport::new(workflow);
        let total = steps.len();

        for (i, step) in steps.iter().enumerate() {
            ui::display_step(i + 1, total, step);
            self.execute(step, &mut report)
                .map_err(|e| GitReleaseError::step_failed(i + 1, step.to_string(), e))?;
            report.completed.push(step.clone());
        }

        Ok(report)
    }

    fn execute(&self, step: &Step, report: &mut WorkflowReport) -> Result<()> {
        match step {
            Step::ConfirmOnSourceBranch { branch } => {
                let current = self.vcs.current_branch()?;
                let context = BranchContext::new(current.as_str(), branch);
                if context.is_detached() {
                    return Err(GitReleaseError::precondition(format!(
                        "HEAD is detached, check out '{}' first",
                        branch
                    )));
                }
                if !context.is_source {
                    return Err(GitReleaseError::precondition(format!(
                        "Not on branch '{}' (currently on '{}')",
                        branch, current
                    )));
                }
                Ok(())
            }
            Step::ConfirmOnMaintenanceBranch { branch } => {
                let current = self.vcs.current_branch()?;
                let context = BranchContext::new(current.as_str(), &self.config.git.source_branch);
                if !context.is_maintenance() {
                    return Err(GitReleaseError::precondition(format!(
                        "Not on a vX.Y.x maintenance branch (currently on '{}')",
                        current
                    )));
                }
                if current != *branch {
                    return Err(GitReleaseError::precondition(format!(
                        "On maintenance branch '{}' but the manifest version belongs to '{}'",
                        current, branch
                    )));
                }
                Ok(())
            }
            Step::ConfirmNoUncommittedChanges => {
                if self.vcs.has_uncommitted_changes()? {
                    return Err(GitReleaseError::precondition(
                        "Working tree has uncommitted or untracked changes",
                    ));
                }
                Ok(())
            }
            Step::ConfirmNoStagedChanges => {
                if self.vcs.has_staged_changes()? {
                    return Err(GitReleaseError::precondition("Index has staged changes"));
                }
                Ok(())
            }
            Step::FetchTags { remote } => self.vcs.fetch_tags(remote),
            Step::Pull { remote } => self.vcs.pull(remote),
            Step::Bump(kind) => self.bump(*kind),
            Step::Tag { name, force } => self.vcs.create_tag(
                name,
                &TagOptions {
                    force: *force,
                    at: None,
                },
            ),
            Step::Checkout { branch, create } => self.vcs.checkout(branch, *create),
            Step::Push {
                remote,
                target,
                force,
                set_upstream,
            } => self.vcs.push(
                remote,
                target,
                PushOptions {
                    force: *force,
                    set_upstream: *set_upstream,
                },
            ),
            Step::AdvanceLatestTag {
                patch_tag,
                latest_tag,
                remote,
            } => {
                let reconciler = LatestTagReconciler::new(self.vcs, latest_tag, remote);
                let decision = reconciler.reconcile(patch_tag)?;
                ui::display_decision(&decision, patch_tag, latest_tag);
                if let Decision::Skip(warning) = &decision {
                    report.warnings.push(warning.clone());
                }
                report.latest = Some(decision);
                Ok(())
            }
        }
    }

    /// Bump the manifest version and commit the change
    fn bump(&self, kind: VersionBump) -> Result<()> {
        let current = self.manifest.read_version()?;
        let parsed = semver::Version::parse(&current).map_err(|e| {
            GitReleaseError::version(format!("Manifest version '{}' is invalid: {}", current, e))
        })?;
        let next = kind
            .apply(&parsed, &self.config.bump.prerelease_name)?
            .to_string();

        info!("bumping version {} -> {} ({})", current, next, kind);
        self.manifest.write_version(&next)?;
        self.vcs
            .commit_all(&self.config.bump.commit_message_for(&next))?;
        ui::display_success(&format!("Version {} -> {}", current, next));
        Ok(())
    }
}
