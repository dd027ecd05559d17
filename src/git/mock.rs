use crate::domain::TagSet;
use crate::error::{GitReleaseError, Result};
use crate::git::{PushOptions, PushRef, TagLookup, TagOptions, Vcs};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory repository for testing without actual git operations
///
/// Tags map to opaque commit ids, commits made through [Vcs::commit_all]
/// get sequential ids (`c1`, `c2`, ...). Every call is recorded as a
/// git-like command line so tests can assert on ordering.
pub struct MockVcs {
    state: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    tags: BTreeMap<String, String>,
    branches: BTreeMap<String, String>,
    current_branch: String,
    head: String,
    next_commit: usize,
    uncommitted: bool,
    staged: bool,
    fail_on: Option<String>,
    calls: Vec<String>,
}

impl MockVcs {
    /// Create a repository with one commit `c0` on `master`
    pub fn new() -> Self {
        let mut branches = BTreeMap::new();
        branches.insert("master".to_string(), "c0".to_string());

        MockVcs {
            state: Mutex::new(MockState {
                branches,
                current_branch: "master".to_string(),
                head: "c0".to_string(),
                next_commit: 1,
                ..MockState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Add a tag pointing at a commit
    pub fn add_tag(&self, name: impl Into<String>, commit: impl Into<String>) {
        self.lock().tags.insert(name.into(), commit.into());
    }

    /// Check out `branch` at `commit` without recording a call
    pub fn set_branch(&self, branch: impl Into<String>, commit: impl Into<String>) {
        let mut state = self.lock();
        let branch = branch.into();
        let commit = commit.into();
        state.branches.insert(branch.clone(), commit.clone());
        state.current_branch = branch;
        state.head = commit;
    }

    /// Mark the working tree as having uncommitted changes
    pub fn set_uncommitted(&self, dirty: bool) {
        self.lock().uncommitted = dirty;
    }

    /// Mark the index as having staged changes
    pub fn set_staged(&self, staged: bool) {
        self.lock().staged = staged;
    }

    /// Make every call whose command line starts with `prefix` fail
    pub fn fail_on(&self, prefix: impl Into<String>) {
        self.lock().fail_on = Some(prefix.into());
    }

    /// Commit a tag points at, if it exists
    pub fn tag_commit(&self, name: &str) -> Option<String> {
        self.lock().tags.get(name).cloned()
    }

    /// Commit currently checked out
    pub fn head(&self) -> String {
        self.lock().head.clone()
    }

    /// Recorded command lines, in call order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Recorded command lines that change local or remote state
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                ["tag ", "push ", "checkout ", "commit ", "pull ", "fetch "]
                    .iter()
                    .any(|p| c.starts_with(p))
                    && !c.starts_with("tag --points-at")
            })
            .collect()
    }

    /// Record a call, failing if it matches the configured failure prefix
    fn record(&self, state: &mut MockState, call: String) -> Result<()> {
        let fails = state
            .fail_on
            .as_deref()
            .is_some_and(|prefix| call.starts_with(prefix));
        state.calls.push(call.clone());
        if fails {
            return Err(GitReleaseError::vcs(
                format!("git {}", call),
                1,
                "simulated failure",
            ));
        }
        Ok(())
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn resolve_tag_commit(&self, tag_name: &str) -> Result<TagLookup> {
        let mut state = self.lock();
        self.record(&mut state, format!("rev-list -n 1 refs/tags/{}", tag_name))?;
        Ok(match state.tags.get(tag_name) {
            Some(commit) => TagLookup::Found(commit.clone()),
            None => TagLookup::NotFound,
        })
    }

    fn tags_pointing_at(&self, commit: &str) -> Result<TagSet> {
        let mut state = self.lock();
        self.record(&mut state, format!("tag --points-at {}", commit))?;
        let names: Vec<String> = state
            .tags
            .iter()
            .filter(|(_, target)| target.as_str() == commit)
            .map(|(name, _)| name.clone())
            .collect();
        Ok(TagSet::from(names))
    }

    fn create_tag(&self, tag_name: &str, options: &TagOptions) -> Result<()> {
        let mut state = self.lock();
        let mut call = String::from("tag ");
        if options.force {
            call.push_str("-f ");
        }
        call.push_str(tag_name);
        if let Some(at) = options.at.as_deref() {
            call.push(' ');
            call.push_str(at);
        }
        self.record(&mut state, call)?;

        if state.tags.contains_key(tag_name) && !options.force {
            return Err(GitReleaseError::vcs(
                format!("git tag {}", tag_name),
                128,
                format!("fatal: tag '{}' already exists", tag_name),
            ));
        }
        let target = options.at.clone().unwrap_or_else(|| state.head.clone());
        state.tags.insert(tag_name.to_string(), target);
        Ok(())
    }

    fn push(&self, remote: &str, target: &PushRef, options: PushOptions) -> Result<()> {
        let mut state = self.lock();
        let mut call = String::from("push ");
        if options.force {
            call.push_str("--force ");
        }
        if options.set_upstream {
            call.push_str("--set-upstream ");
        }
        call.push_str(remote);
        call.push(' ');
        call.push_str(&target.refspec());
        self.record(&mut state, call)
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut state = self.lock();
        self.record(&mut state, format!("fetch --tags {}", remote))
    }

    fn pull(&self, remote: &str) -> Result<()> {
        let mut state = self.lock();
        self.record(&mut state, format!("pull {}", remote))
    }

    fn checkout(&self, branch: &str, create: bool) -> Result<()> {
        let mut state = self.lock();
        if create {
            self.record(&mut state, format!("checkout -b {}", branch))?;
            if state.branches.contains_key(branch) {
                return Err(GitReleaseError::vcs(
                    format!("git checkout -b {}", branch),
                    128,
                    format!("fatal: a branch named '{}' already exists", branch),
                ));
            }
            let head = state.head.clone();
            state.branches.insert(branch.to_string(), head);
        } else {
            self.record(&mut state, format!("checkout {}", branch))?;
            let commit = state.branches.get(branch).cloned().ok_or_else(|| {
                GitReleaseError::UnknownRef(format!("branch '{}' not found", branch))
            })?;
            state.head = commit;
        }
        state.current_branch = branch.to_string();
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let mut state = self.lock();
        self.record(&mut state, "rev-parse --abbrev-ref HEAD".to_string())?;
        Ok(state.current_branch.clone())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut state = self.lock();
        self.record(&mut state, "status --porcelain".to_string())?;
        Ok(state.uncommitted)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let mut state = self.lock();
        self.record(&mut state, "diff --cached --quiet".to_string())?;
        Ok(state.staged)
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let mut state = self.lock();
        self.record(&mut state, format!("commit -a -m {}", message))?;
        let commit = format!("c{}", state.next_commit);
        state.next_commit += 1;
        state.head = commit.clone();
        let branch = state.current_branch.clone();
        state.branches.insert(branch, commit);
        Ok(())
    }
}
