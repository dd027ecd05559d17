use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum GitReleaseError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Unknown ref: {0}")]
    UnknownRef(String),

    #[error("Git command `{command}` failed with exit code {code}\n{output}")]
    Vcs {
        command: String,
        code: i32,
        output: String,
    },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Step {index} ({step}) failed: {source}")]
    StepFailed {
        index: usize,
        step: String,
        #[source]
        source: Box<GitReleaseError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, GitReleaseError>;

impl GitReleaseError {
    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        GitReleaseError::Precondition(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        GitReleaseError::Manifest(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitReleaseError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitReleaseError::Config(msg.into())
    }

    /// Create a git command error carrying the command line and its output
    pub fn vcs(command: impl Into<String>, code: i32, output: impl Into<String>) -> Self {
        GitReleaseError::Vcs {
            command: command.into(),
            code,
            output: output.into(),
        }
    }

    /// Wrap an error raised by the workflow step at `index` (1-based)
    pub fn step_failed(index: usize, step: impl Into<String>, source: GitReleaseError) -> Self {
        GitReleaseError::StepFailed {
            index,
            step: step.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error (or the step error it wraps) is a precondition failure
    pub fn is_precondition(&self) -> bool {
        match self {
            GitReleaseError::Precondition(_) => true,
            GitReleaseError::StepFailed { source, .. } => source.is_precondition(),
            _ => false,
        }
    }

    /// Whether steps may have run before this error
    ///
    /// True for a failed workflow step other than a precondition, since
    /// preconditions run before any mutating step.
    pub fn may_have_partial_changes(&self) -> bool {
        matches!(self, GitReleaseError::StepFailed { .. }) && !self.is_precondition()
    }
}
