//! User interface module - terminal output.
//!
//! Release workflows are non-interactive; everything here writes to
//! stdout/stderr. Pure text builders live in `formatter` next to the
//! printing functions that use them.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_decision, display_error, display_no_rollback,
    display_plan, display_status, display_step, display_success, format_decision, format_plan,
};
