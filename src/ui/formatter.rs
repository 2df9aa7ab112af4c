//! Pure formatting functions for UI output.
//!
//! Results go to stdout so they can be captured by scripts; everything
//! addressed to a human goes to stderr.

use console::style;

use crate::boundary::BoundaryWarning;

/// Label printed when no branch configuration applies
pub const UNKNOWN_VERSION: &str = "UNKNOWN";

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a boundary warning in yellow.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Text printed on stdout for a resolved version
pub fn format_version(tag: Option<&str>) -> String {
    tag.unwrap_or(UNKNOWN_VERSION).to_string()
}

/// Print the resolved version tag, or `UNKNOWN` when there is none.
pub fn display_version(tag: Option<&str>) {
    println!("{}", format_version(tag));
}

/// Print a changelog as-is.
pub fn display_changelog(changelog: &str) {
    println!("{}", changelog);
}
