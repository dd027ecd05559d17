use std::fmt;

/// Non-fatal conditions met while releasing.
/// These are reported to the operator but never fail a workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The latest tag exists but no valid release tag shares its commit
    InconsistentLatestTag {
        tag: String,
        commit: String,
        colocated: Vec<String>,
    },
    /// The manifest version has no pre-release counter, so the pre tag
    /// carries a plain release version
    PreTagWithoutSuffix { tag: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::InconsistentLatestTag {
                tag,
                commit,
                colocated,
            } => {
                let short_hash = if commit.len() > 7 {
                    &commit[..7]
                } else {
                    commit.as_str()
                };
                let others: Vec<&str> = colocated
                    .iter()
                    .map(String::as_str)
                    .filter(|name| *name != tag)
                    .collect();
                if others.is_empty() {
                    write!(
                        f,
                        "Erroneous latest tag '{}': no other tags found at its commit {}",
                        tag, short_hash
                    )
                } else {
                    write!(
                        f,
                        "Erroneous latest tag '{}': no release tags found at its commit {} (found: {})",
                        tag,
                        short_hash,
                        others.join(" ")
                    )
                }
            }
            BoundaryWarning::PreTagWithoutSuffix { tag } => {
                write!(
                    f,
                    "Pre-release tag '{}' has no pre-release suffix",
                    tag
                )
            }
        }
    }
}
