//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, so that workflows and the latest-tag reconciler can run
//! against the real `git` binary or against an in-memory double.
//!
//! # Overview
//!
//! The primary abstraction is the [Vcs] trait. The implementations are:
//!
//! - [system::SystemGit]: runs the `git` executable as a subprocess
//! - [mock::MockVcs]: in-memory repository that records every call
//!
//! # Usage
//!
//! Code should depend on the [Vcs] trait rather than a concrete backend.
//!
//! ```rust
//! # use git_release::git::{TagLookup, Vcs};
//! # fn example<V: Vcs>(vcs: &V) -> git_release::Result<()> {
//! if let TagLookup::Found(commit) = vcs.resolve_tag_commit("latest")? {
//!     let tags = vcs.tags_pointing_at(&commit)?;
//!     println!("latest is shared with {}", tags);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod system;

pub use mock::MockVcs;
pub use system::SystemGit;

use crate::domain::TagSet;
use crate::error::Result;
use std::fmt;

/// Outcome of resolving a tag to a commit
///
/// A missing tag is an expected outcome, not an error; any other git
/// failure is reported through `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    Found(String),
    NotFound,
}

/// Options for creating or moving a tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    /// Replace an existing tag of the same name (`git tag -f`)
    pub force: bool,
    /// Commit to tag; `None` tags HEAD
    pub at: Option<String>,
}

/// What a push sends to the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushRef {
    Branch(String),
    Tag(String),
    /// The currently checked-out branch
    Head,
}

impl PushRef {
    /// Refspec passed to `git push`
    pub fn refspec(&self) -> String {
        match self {
            PushRef::Branch(name) => name.clone(),
            PushRef::Tag(name) => format!("refs/tags/{}", name),
            PushRef::Head => "HEAD".to_string(),
        }
    }
}

impl fmt::Display for PushRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushRef::Branch(name) => write!(f, "branch {}", name),
            PushRef::Tag(name) => write!(f, "tag {}", name),
            PushRef::Head => write!(f, "current branch"),
        }
    }
}

/// Options for pushing a ref
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// `--force`, required for floating tags
    pub force: bool,
    /// `--set-upstream`, used when publishing a new branch
    pub set_upstream: bool,
}

/// Git operations needed by the release workflows
///
/// ## Error Handling
///
/// Every method returns [crate::error::Result<T>]. A non-zero git exit is
/// mapped to [crate::error::GitReleaseError::Vcs] carrying the command line
/// and its output; only [Vcs::resolve_tag_commit] turns a missing ref into a
/// value ([TagLookup::NotFound]).
///
/// ## Blocking
///
/// All calls block until git exits. Callers never issue two calls at once
/// because each step depends on the repository state left by the previous one.
pub trait Vcs: Send + Sync {
    /// Resolve the commit a tag points at
    ///
    /// # Returns
    /// * `Ok(TagLookup::Found(commit))` - Full commit hash
    /// * `Ok(TagLookup::NotFound)` - The tag does not exist
    /// * `Err` - Any other git failure
    fn resolve_tag_commit(&self, tag_name: &str) -> Result<TagLookup>;

    /// List the names of all tags pointing at `commit` (possibly empty)
    fn tags_pointing_at(&self, commit: &str) -> Result<TagSet>;

    /// Create a lightweight tag, or move it when `options.force` is set
    fn create_tag(&self, tag_name: &str, options: &TagOptions) -> Result<()>;

    /// Push a branch, tag, or HEAD to `remote`
    fn push(&self, remote: &str, target: &PushRef, options: PushOptions) -> Result<()>;

    /// Fetch all tags from `remote`
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Pull the current branch from `remote`
    fn pull(&self, remote: &str) -> Result<()>;

    /// Check out `branch`, creating it at HEAD when `create` is set
    fn checkout(&self, branch: &str, create: bool) -> Result<()>;

    /// Name of the checked-out branch (`HEAD` when detached)
    fn current_branch(&self) -> Result<String>;

    /// Whether the working tree has modified or untracked files
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Whether the index holds staged changes
    fn has_staged_changes(&self) -> Result<bool>;

    /// Commit all modified tracked files with `message`
    fn commit_all(&self, message: &str) -> Result<()>;
}
