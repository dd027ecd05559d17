//! Release workflow orchestration
//!
//! Resolves configuration, repository and manifest for a workflow and
//! hands them to the [WorkflowRunner]. Kept apart from `main.rs` so the
//! workflows can be driven programmatically without clap.

use std::path::PathBuf;

use log::info;

use crate::boundary::BoundaryWarning;
use crate::config::{self, Config};
use crate::domain::ReleaseContext;
use crate::error::Result;
use crate::git::SystemGit;
use crate::manifest::{Manifest, ManifestFile};
use crate::reconcile::Decision;
use crate::ui;
use crate::workflow::{Workflow, WorkflowRunner};

/// Arguments for a release workflow
///
/// Mirrors the CLI flags in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    pub workflow: Workflow,

    /// Working directory of the release (repository and manifest)
    pub base_path: PathBuf,

    /// Path to custom config file
    pub config_path: Option<String>,

    /// Overrides `git.remote`
    pub remote: Option<String>,

    /// Overrides `git.source_branch`
    pub source_branch: Option<String>,

    /// Print the step plan without touching the repository
    pub dry_run: bool,
}

impl ReleaseWorkflowArgs {
    pub fn new(workflow: Workflow, base_path: impl Into<PathBuf>) -> Self {
        ReleaseWorkflowArgs {
            workflow,
            base_path: base_path.into(),
            config_path: None,
            remote: None,
            source_branch: None,
            dry_run: false,
        }
    }
}

/// Result of a successful workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub workflow: Workflow,

    /// Manifest version the workflow started from
    pub version: String,

    /// Number of steps executed (0 on dry run)
    pub steps_run: usize,

    /// Latest-tag decision, for workflows that reconcile it
    pub decision: Option<Decision>,

    pub warnings: Vec<BoundaryWarning>,

    pub dry_run: bool,
}

/// Load and validate the configuration for `args`
pub fn resolve_config(args: &ReleaseWorkflowArgs) -> Result<Config> {
    let config = config::load_config(args.config_path.as_deref(), &args.base_path)?
        .with_overrides(args.remote.as_deref(), args.source_branch.as_deref());
    config.validate()?;
    Ok(config)
}

/// Run a release workflow end to end
///
/// 1. Load configuration and apply overrides
/// 2. Open the repository and the manifest under the base path
/// 3. Derive tag and branch names from the manifest version
/// 4. Print the plan (dry run) or execute every step
///
/// # Returns
/// * `Ok(WorkflowResult)` - All steps completed (or the plan was printed)
/// * `Err` - Setup failed, or the first failing step
pub fn run_release_workflow(args: ReleaseWorkflowArgs) -> Result<WorkflowResult> {
    let config = resolve_config(&args)?;

    let manifest = ManifestFile::open(args.base_path.join(&config.bump.manifest))?;
    let version = manifest.read_version()?;
    let ctx = ReleaseContext::parse(
        &version,
        &config.bump.prerelease_name,
        &config.tags.prefix,
        &config.tags.latest,
    )?;
    info!(
        "{} from version {} of release line {} ({:?} manifest {})",
        args.workflow,
        version,
        ctx.patch_version(),
        manifest.format(),
        manifest.path().display()
    );

    let mut warnings = Vec::new();
    if args.workflow == Workflow::Pre && !ctx.is_prerelease() {
        let warning = BoundaryWarning::PreTagWithoutSuffix { tag: ctx.pre_tag() };
        ui::display_boundary_warning(&warning);
        warnings.push(warning);
    }

    if args.dry_run {
        let steps = args.workflow.steps(&ctx, &config);
        ui::display_plan(args.workflow, &version, &steps);
        return Ok(WorkflowResult {
            workflow: args.workflow,
            version,
            steps_run: 0,
            decision: None,
            warnings,
            dry_run: true,
        });
    }

    let git = SystemGit::open(&args.base_path)?;
    let report = WorkflowRunner::new(&git, &manifest, &config).run(args.workflow, &ctx)?;
    warnings.extend(report.warnings);

    Ok(WorkflowResult {
        workflow: args.workflow,
        version,
        steps_run: report.completed.len(),
        decision: report.latest,
        warnings,
        dry_run: false,
    })
}
