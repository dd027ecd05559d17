use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_release::cli::{run_release_workflow, ReleaseWorkflowArgs};
use git_release::ui;
use git_release::workflow::Workflow;
use git_release::GitReleaseError;

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Cut pre-releases, patch and minor releases with git tags and maintenance branches"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(
        long = "basePath",
        visible_alias = "base-path",
        global = true,
        default_value = ".",
        help = "Working directory holding the repository and manifest"
    )]
    base_path: PathBuf,

    #[arg(long, global = true, help = "Git remote to fetch from and push to [default: origin]")]
    remote: Option<String>,

    #[arg(long, global = true, help = "Branch minor releases are cut from [default: master]")]
    source_branch: Option<String>,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Print the steps that would run without making changes")]
    dry_run: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Creates prerelease tags
    ReleasePre,
    /// Creates patch-level tag & advances minor tag, and, optionally, the latest tag
    ReleasePatch,
    /// Creates maintenance branch, patch- & minor-level tags, and advances latest tag
    ReleaseMinor,
    /// Advances tag "latest" if necessary
    AdvanceLatest,
}

impl From<Command> for Workflow {
    fn from(command: Command) -> Self {
        match command {
            Command::ReleasePre => Workflow::Pre,
            Command::ReleasePatch => Workflow::Patch,
            Command::ReleaseMinor => Workflow::Minor,
            Command::AdvanceLatest => Workflow::AdvanceLatest,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        if e
            .downcast_ref::<GitReleaseError>()
            .is_some_and(GitReleaseError::may_have_partial_changes)
        {
            ui::display_no_rollback();
        }
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let workflow = Workflow::from(args.command);
    let result = run_release_workflow(ReleaseWorkflowArgs {
        workflow,
        base_path: args.base_path,
        config_path: args.config,
        remote: args.remote,
        source_branch: args.source_branch,
        dry_run: args.dry_run,
    })?;

    if !result.dry_run {
        println!(
            "\n{} {} completed ({} steps) from version {}\n",
            console::style("✓").green(),
            result.workflow,
            result.steps_run,
            result.version
        );
    }
    Ok(())
}
