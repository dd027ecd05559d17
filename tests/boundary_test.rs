use git_release::boundary::BoundaryWarning;
use git_release::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_inconsistent_latest_tag_alone_display() {
    let warning = BoundaryWarning::InconsistentLatestTag {
        tag: "latest".to_string(),
        commit: "abc1234def5678".to_string(),
        colocated: vec!["latest".to_string()],
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Erroneous latest tag 'latest'"),
        "Message should name the tag, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("no other tags found"),
        "Message should say no other tags exist, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("abc1234") && !display_msg.contains("abc1234d"),
        "Message should contain shortened commit hash 'abc1234', got: {}",
        display_msg
    );
}

#[test]
fn test_inconsistent_latest_tag_with_non_release_tags_display() {
    let warning = BoundaryWarning::InconsistentLatestTag {
        tag: "latest".to_string(),
        commit: "abc1234def5678".to_string(),
        colocated: vec!["latest".to_string(), "v1.3".to_string(), "stable".to_string()],
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("no release tags found"),
        "got: {}",
        display_msg
    );
    assert!(
        display_msg.ends_with("(found: v1.3 stable)"),
        "Message should list the other tags, got: {}",
        display_msg
    );
}

#[test]
fn test_short_commit_kept_whole() {
    let warning = BoundaryWarning::InconsistentLatestTag {
        tag: "latest".to_string(),
        commit: "c3".to_string(),
        colocated: vec![],
    };
    assert!(warning.to_string().contains("commit c3"));
}

#[test]
fn test_pre_tag_without_suffix_display() {
    let warning = BoundaryWarning::PreTagWithoutSuffix {
        tag: "v1.4.0".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "Pre-release tag 'v1.4.0' has no pre-release suffix"
    );
}

// ============================================================================
// UI Display Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_does_not_panic() {
    let warnings = vec![
        BoundaryWarning::InconsistentLatestTag {
            tag: "latest".to_string(),
            commit: "abc1234def5678".to_string(),
            colocated: vec!["latest".to_string()],
        },
        BoundaryWarning::PreTagWithoutSuffix {
            tag: "v1.4.0".to_string(),
        },
    ];

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}
