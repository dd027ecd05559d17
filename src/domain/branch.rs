use regex::Regex;
use std::sync::LazyLock;

static MAINTENANCE_BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v[0-9]+\.[0-9]+\.x$").expect("maintenance branch regex is valid")
});

/// Represents the checked-out branch with release context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_source: bool,
}

impl BranchContext {
    /// Create a branch context relative to the configured source branch
    pub fn new(name: impl Into<String>, source_branch: &str) -> Self {
        let name_str = name.into();
        let is_source = name_str == source_branch;

        BranchContext {
            name: name_str,
            is_source,
        }
    }

    /// Check if this is a maintenance branch of the form `vX.Y.x`
    pub fn is_maintenance(&self) -> bool {
        MAINTENANCE_BRANCH_RE.is_match(&self.name)
    }

    /// Detached HEAD is reported as `HEAD` by git
    pub fn is_detached(&self) -> bool {
        self.name == "HEAD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_branch() {
        let branch = BranchContext::new("master", "master");
        assert!(branch.is_source);
        assert!(!branch.is_maintenance());
    }

    #[test]
    fn test_custom_source_branch() {
        assert!(BranchContext::new("main", "main").is_source);
        assert!(!BranchContext::new("master", "main").is_source);
    }

    #[test]
    fn test_maintenance_branch() {
        let branch = BranchContext::new("v1.3.x", "master");
        assert!(!branch.is_source);
        assert!(branch.is_maintenance());
        assert!(BranchContext::new("v10.22.x", "master").is_maintenance());
    }

    #[test]
    fn test_not_maintenance_branch() {
        for name in ["v1.3", "v1.3.0", "1.3.x", "v1.x.x", "feature/v1.3.x", "v1.3.x-old"] {
            assert!(!BranchContext::new(name, "master").is_maintenance(), "{}", name);
        }
    }

    #[test]
    fn test_detached_head() {
        assert!(BranchContext::new("HEAD", "master").is_detached());
    }
}
