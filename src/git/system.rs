//! Subprocess git backend
//!
//! Every operation is one blocking `git` invocation run inside the base
//! path. Output is captured and returned verbatim in errors.

use crate::domain::TagSet;
use crate::error::{GitReleaseError, Result};
use crate::git::{PushOptions, PushRef, TagLookup, TagOptions, Vcs};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Exit status git uses for fatal errors such as an unknown revision
const GIT_FATAL_EXIT: i32 = 128;

/// Git backend using the system `git` executable
pub struct SystemGit {
    work_dir: PathBuf,
}

impl SystemGit {
    /// Open the repository containing `path`
    ///
    /// Fails when `path` is not inside a git working tree.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let git = SystemGit {
            work_dir: path.as_ref().to_path_buf(),
        };
        git.run_checked(&["rev-parse", "--show-toplevel"])?;
        Ok(git)
    }

    /// Working directory git runs in
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Create a git command bound to the working directory
    ///
    /// `LC_ALL=C` keeps messages stable so failures can be classified.
    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.work_dir);
        cmd.env("LC_ALL", "C");
        cmd
    }

    /// Run git with `args` and return its raw output, whatever the exit status
    fn run(&self, args: &[&str]) -> Result<Output> {
        let command_line = format!("git {}", args.join(" "));
        debug!("running: {} (in {})", command_line, self.work_dir.display());

        let output = self.git_cmd().args(args).output().map_err(|e| {
            GitReleaseError::vcs(command_line.clone(), -1, format!("Failed to execute git: {}", e))
        })?;

        debug!("{} exited with {}", command_line, output.status);
        Ok(output)
    }

    /// Run git with `args`, failing on a non-zero exit; returns trimmed stdout
    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Build a Vcs error that reports the command and its output verbatim
fn failure(args: &[&str], output: &Output) -> GitReleaseError {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut text = String::new();
    if !stdout.trim().is_empty() {
        text.push_str(stdout.trim_end());
        text.push('\n');
    }
    text.push_str(stderr.trim_end());

    GitReleaseError::vcs(
        format!("git {}", args.join(" ")),
        output.status.code().unwrap_or(-1),
        text,
    )
}

/// Whether a failed rev-list reported an unknown ref
fn is_unknown_ref(output: &Output) -> bool {
    if output.status.code() != Some(GIT_FATAL_EXIT) {
        return false;
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr.contains("unknown revision")
        || stderr.contains("bad revision")
        || stderr.contains("ambiguous argument")
}

impl Vcs for SystemGit {
    fn resolve_tag_commit(&self, tag_name: &str) -> Result<TagLookup> {
        let reference = format!("refs/tags/{}", tag_name);
        let args = ["rev-list", "-n", "1", reference.as_str()];
        let output = self.run(&args)?;

        if output.status.success() {
            let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(TagLookup::Found(commit));
        }

        if is_unknown_ref(&output) {
            debug!("tag '{}' does not exist", tag_name);
            return Ok(TagLookup::NotFound);
        }

        Err(failure(&args, &output))
    }

    fn tags_pointing_at(&self, commit: &str) -> Result<TagSet> {
        let stdout = self.run_checked(&["tag", "--points-at", commit])?;
        Ok(TagSet::parse(&stdout))
    }

    fn create_tag(&self, tag_name: &str, options: &TagOptions) -> Result<()> {
        let mut args = vec!["tag"];
        if options.force {
            args.push("-f");
        }
        args.push(tag_name);
        if let Some(at) = options.at.as_deref() {
            args.push(at);
        }
        self.run_checked(&args)?;
        Ok(())
    }

    fn push(&self, remote: &str, target: &PushRef, options: PushOptions) -> Result<()> {
        let refspec = target.refspec();
        let mut args = vec!["push"];
        if options.force {
            args.push("--force");
        }
        if options.set_upstream {
            args.push("--set-upstream");
        }
        args.push(remote);
        args.push(&refspec);
        self.run_checked(&args)?;
        Ok(())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        self.run_checked(&["fetch", "--tags", remote])?;
        Ok(())
    }

    fn pull(&self, remote: &str) -> Result<()> {
        self.run_checked(&["pull", remote])?;
        Ok(())
    }

    fn checkout(&self, branch: &str, create: bool) -> Result<()> {
        if create {
            self.run_checked(&["checkout", "-b", branch])?;
        } else {
            self.run_checked(&["checkout", branch])?;
        }
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.run_checked(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let status = self.run_checked(&["status", "--porcelain"])?;
        Ok(!status.is_empty())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let args = ["diff", "--cached", "--quiet"];
        let output = self.run(&args)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure(&args, &output)),
        }
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.run_checked(&["commit", "-a", "-m", message])?;
        Ok(())
    }
}
