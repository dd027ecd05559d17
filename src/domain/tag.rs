use std::fmt;

/// Represents a git tag, optionally resolved to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub target: Option<String>,
}

impl Tag {
    /// Create a new, unresolved tag
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            target: None,
        }
    }

    /// Create a tag known to point at `commit`
    pub fn at(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            target: Some(commit.into()),
        }
    }

    /// Semantic version carried by the tag name, if any
    pub fn version(&self) -> Option<semver::Version> {
        crate::version::parse(&self.name)
    }
}

/// The four tags a release workflow manages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `v1.3.0-pre.2`, immutable
    Pre,
    /// `v1.3.0`, immutable
    Patch,
    /// `v1.3`, follows the newest patch of its minor line
    Minor,
    /// `latest`, follows the newest release overall
    Latest,
}

impl TagKind {
    /// Floating tags are moved with `tag -f` and pushed with `--force`
    pub fn is_floating(&self) -> bool {
        matches!(self, TagKind::Minor | TagKind::Latest)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Pre => "pre",
            TagKind::Patch => "patch",
            TagKind::Minor => "minor",
            TagKind::Latest => "latest",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag names currently resolving to one commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: Vec<String>,
}

impl TagSet {
    /// Parse whitespace-separated tag names, as printed by `git tag --points-at`
    pub fn parse(output: &str) -> Self {
        TagSet {
            names: output.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl From<Vec<String>> for TagSet {
    fn from(names: Vec<String>) -> Self {
        TagSet { names }
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = Tag::new("v1.2.3");
        assert_eq!(tag.name, "v1.2.3");
        assert_eq!(tag.target, None);
    }

    #[test]
    fn test_tag_version() {
        assert_eq!(
            Tag::at("v1.2.3", "abc").version(),
            Some(semver::Version::new(1, 2, 3))
        );
        assert_eq!(Tag::new("latest").version(), None);
    }

    #[test]
    fn test_floating_kinds() {
        assert!(TagKind::Minor.is_floating());
        assert!(TagKind::Latest.is_floating());
        assert!(!TagKind::Patch.is_floating());
        assert!(!TagKind::Pre.is_floating());
    }

    #[test]
    fn test_tag_set_normalizes_whitespace() {
        let set = TagSet::parse("latest\nv1.3.0 \n\n  v1.3.0-pre.2\n");
        assert_eq!(set.names(), &["latest", "v1.3.0", "v1.3.0-pre.2"]);
        assert!(set.contains("latest"));
        assert_eq!(set.to_string(), "latest v1.3.0 v1.3.0-pre.2");
    }

    #[test]
    fn test_tag_set_empty_output() {
        assert!(TagSet::parse("  \n").is_empty());
    }
}
