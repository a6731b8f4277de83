//! CLI output formatting.
//!
//! Operator-facing lines only; progress detail goes through `tracing`.
//! Every `format_*` function is pure and returns the lines, so the exact
//! text is testable; the `print_*` wrappers write them to stdout.
//!
//! # Output Format
//!
//! ## Audit
//!
//! ```text
//! MISSING: cover.jpg (Cover)
//! MISSING: dunes.jpg (Day 3)
//! Audit complete: 2 missing.
//! ```
//!
//! or, when every referenced photo is on disk:
//!
//! ```text
//! All photos located.
//! ```
//!
//! ## Build
//!
//! ```text
//! Build success: Geological_Field_Journal_2026.docx
//! ```
//!
//! Failures are reported by the binary on stderr, prefixed with the command
//! that failed: `Build failed: <error>` or `Check failed: <error>`.

use crate::audit::MissingAsset;
use std::fmt::Display;
use std::path::Path;

/// One line per missing photo, then a summary line.
pub fn format_audit_output(missing: &[MissingAsset]) -> Vec<String> {
    let mut lines: Vec<String> = missing
        .iter()
        .map(|m| format!("MISSING: {} ({})", m.image_name, m.context))
        .collect();

    if missing.is_empty() {
        lines.push("All photos located.".to_string());
    } else {
        lines.push(format!("Audit complete: {} missing.", missing.len()));
    }
    lines
}

/// Print audit output to stdout.
pub fn print_audit_output(missing: &[MissingAsset]) {
    for line in format_audit_output(missing) {
        println!("{}", line);
    }
}

pub fn format_build_success(path: &Path) -> Vec<String> {
    vec![format!("Build success: {}", path.display())]
}

/// Print the build success line to stdout.
pub fn print_build_success(path: &Path) {
    for line in format_build_success(path) {
        println!("{}", line);
    }
}

/// `command` is the capitalized command name, e.g. `Build` or `Check`.
pub fn format_failure(command: &str, err: &dyn Display) -> String {
    format!("{} failed: {}", command, err)
}
