//! Formatting functions for UI output.
//!
//! `format_*` functions build plain text and are unit tested; `display_*`
//! functions add colors and print.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::reconcile::Decision;
use crate::workflow::{Step, Workflow};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Progress line for the step about to run, e.g. `[3/13] git pull origin`
pub fn format_step(index: usize, total: usize, step: &Step) -> String {
    format!("[{}/{}] {}", index, total, step)
}

pub fn display_step(index: usize, total: usize, step: &Step) {
    display_status(&format_step(index, total, step));
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Numbered list of the steps a workflow would run
///
/// # Arguments
/// * `workflow` - Workflow being planned
/// * `version` - Manifest version the plan was resolved from
/// * `steps` - Steps in execution order
pub fn format_plan(workflow: Workflow, version: &str, steps: &[Step]) -> String {
    let mut out = format!("{} for version {}:\n", workflow, version);
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i + 1, step));
    }
    out
}

pub fn display_plan(workflow: Workflow, version: &str, steps: &[Step]) {
    println!("\n{}", style("Dry run, nothing will be changed").bold());
    print!("{}", format_plan(workflow, version, steps));
}

/// One-line summary of a latest-tag decision
pub fn format_decision(decision: &Decision, patch_tag: &str, latest_tag: &str) -> String {
    match decision {
        Decision::Create { prior: Some(prior) } => format!(
            "Advanced tag '{}' from v{} to {}",
            latest_tag, prior, patch_tag
        ),
        Decision::Create { prior: None } => {
            format!("Created tag '{}' at {}", latest_tag, patch_tag)
        }
        Decision::Keep { prior } => format!(
            "Tag '{}' stays at v{}: {} is not newer",
            latest_tag, prior, patch_tag
        ),
        Decision::Skip(_) => format!("Tag '{}' left untouched", latest_tag),
    }
}

/// Print the decision, and the warning behind a skip.
pub fn display_decision(decision: &Decision, patch_tag: &str, latest_tag: &str) {
    if let Decision::Skip(warning) = decision {
        display_boundary_warning(warning);
    }
    let line = format_decision(decision, patch_tag, latest_tag);
    match decision {
        Decision::Create { .. } => display_success(&line),
        _ => display_status(&line),
    }
}

/// Remind the operator that earlier steps of a failed workflow stay applied
pub fn display_no_rollback() {
    eprintln!(
        "{}",
        style("Steps completed before the failure were NOT rolled back; inspect tags and branches before retrying.")
            .dim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn test_format_step() {
        let step = Step::Pull {
            remote: "origin".to_string(),
        };
        assert_eq!(format_step(5, 13, &step), "[5/13] git pull origin");
    }

    #[test]
    fn test_format_plan() {
        let steps = vec![
            Step::ConfirmNoUncommittedChanges,
            Step::Tag {
                name: "v1.4.0-pre.0".to_string(),
                force: false,
            },
        ];
        let plan = format_plan(Workflow::Pre, "1.4.0-pre.0", &steps);
        assert_eq!(
            plan,
            "release-pre for version 1.4.0-pre.0:\n   1. confirm no uncommitted changes\n   2. git tag v1.4.0-pre.0\n"
        );
    }

    #[test]
    fn test_format_decision() {
        let advanced = Decision::Create {
            prior: Some(Version::new(1, 3, 0)),
        };
        assert_eq!(
            format_decision(&advanced, "v1.3.1", "latest"),
            "Advanced tag 'latest' from v1.3.0 to v1.3.1"
        );

        let kept = Decision::Keep {
            prior: Version::new(2, 0, 0),
        };
        assert_eq!(
            format_decision(&kept, "v1.9.9", "latest"),
            "Tag 'latest' stays at v2.0.0: v1.9.9 is not newer"
        );

        assert_eq!(
            format_decision(&Decision::Create { prior: None }, "v0.1.0", "latest"),
            "Created tag 'latest' at v0.1.0"
        );
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_no_rollback();
    }
}
