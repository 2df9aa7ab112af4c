//! User interface module - console output for the CLI.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_changelog, display_error, display_success,
    display_version, format_version, UNKNOWN_VERSION,
};

use crate::boundary::BoundaryWarning;

/// Print every warning collected during a run.
pub fn display_warnings(warnings: &[BoundaryWarning]) {
    for warning in warnings {
        display_boundary_warning(warning);
    }
}
