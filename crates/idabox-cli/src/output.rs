//! Terminal output helpers for CLI commands.
//!
//! Progress and diagnostics go to stderr; command results (the instance
//! table, help text) go to stdout.

use idabox_common::constants::BIN_NAME;
use idabox_common::error::IdaboxError;

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const RED: &str = "\x1b[31m";
pub const RESET: &str = "\x1b[0m";

/// Prints a progress line.
pub fn step(message: &str) {
    eprintln!("  {DIM}›{RESET} {message}");
}

/// Prints a success line.
pub fn success(message: &str) {
    eprintln!("  {GREEN}✓{RESET} {message}");
}

/// Prints a warning line.
pub fn warn(message: &str) {
    eprintln!("  {YELLOW}!{RESET} {message}");
}

/// Prints a failure line.
pub fn failure(message: &str) {
    eprintln!("  {RED}✗{RESET} {message}");
}

/// Remedies for errors the user can fix.
#[must_use]
pub fn guidance(err: &IdaboxError, runtime: &str) -> Vec<String> {
    match err {
        IdaboxError::InstanceExists { name } => vec![format!(
            "Connect to it with `{BIN_NAME} attach -n {name}` or choose another name."
        )],
        IdaboxError::InstanceNotFound { name } => vec![format!(
            "Use `{BIN_NAME} start -n {name}` to create a new instance."
        )],
        IdaboxError::PermissionDenied { .. } => {
            vec!["Re-run the command with sudo.".to_string()]
        }
        IdaboxError::DisplayUnset => vec![
            "Run from a graphical session, or export DISPLAY (for example DISPLAY=:0).".to_string(),
        ],
        IdaboxError::WorkdirUnavailable => vec![
            "Change into an existing directory before starting an instance.".to_string(),
        ],
        IdaboxError::PullFailed { .. } => vec![
            format!("If the image is hosted on a private registry, log in first with `{runtime} login [registry-url]`."),
            "Alternatively, build the image locally from its Dockerfile.".to_string(),
        ],
        IdaboxError::ProgramNotFound { program } => {
            vec![format!("Make sure `{program}` is installed and on PATH.")]
        }
        _ => Vec::new(),
    }
}

/// Prints the remedies for `err`, if any.
pub fn print_guidance(err: &IdaboxError, runtime: &str) {
    let lines = guidance(err, runtime);
    if lines.is_empty() {
        return;
    }
    eprintln!();
    for line in lines {
        eprintln!("  {line}");
    }
    eprintln!();
}
