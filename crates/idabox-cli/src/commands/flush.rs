//! `ida-docker flush` — Remove every IDA Pro instance.

use std::io::{self, BufRead, Write};

use clap::Args;
use idabox_common::error::IdaboxError;
use idabox_runtime::engine::{self, Engine, FlushObserver, RemovalFailure};

use crate::output::{self, BOLD, RESET};

/// Arguments for the `flush` command.
#[derive(Args, Debug)]
pub struct FlushArgs {
    /// Remove without asking for confirmation.
    #[arg(short, long)]
    pub force: bool,
}

/// Executes the `flush` command.
///
/// Lists running and stopped instances of the configured image, asks for
/// confirmation unless forced, then removes them one by one. Each removal
/// is reported as it completes; a failed one does not stop the rest.
///
/// # Errors
///
/// Returns an error if the instances cannot be listed or the prompt
/// cannot be read.
pub fn execute(engine: &Engine, args: &FlushArgs) -> anyhow::Result<()> {
    let report = engine.flush(args.force, &mut Progress)?;

    if report.found.is_empty() {
        output::step("No IDA Pro instances found.");
        return Ok(());
    }
    if report.cancelled {
        output::step("Operation cancelled.");
        return Ok(());
    }

    if report.failed.is_empty() {
        output::success(&format!(
            "All {} IDA Pro instance(s) have been removed.",
            report.removed.len()
        ));
    } else {
        output::warn(&format!(
            "Flush finished: {} removed, {} failed.",
            report.removed.len(),
            report.failed.len()
        ));
    }
    Ok(())
}

/// Prints flush progress on stderr and reads the confirmation from stdin.
struct Progress;

impl FlushObserver for Progress {
    fn found(&mut self, count: usize) {
        output::step(&format!("Found {count} IDA Pro instance(s)."));
    }

    fn confirm(&mut self, _count: usize) -> Result<bool, IdaboxError> {
        confirm(&mut io::stdin().lock(), &mut io::stderr()).map_err(|e| IdaboxError::Io {
            path: "<stdin>".into(),
            source: e,
        })
    }

    fn removed(&mut self, name: &str) {
        output::success(&format!("Removed instance {name}"));
    }

    fn failed(&mut self, failure: &RemovalFailure) {
        output::failure(&format!(
            "Failed to remove instance {}: {}",
            failure.name, failure.reason
        ));
    }
}

/// Asks whether to remove the instances; only `y` or `yes` confirms.
///
/// End of input counts as a refusal.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm(input: &mut impl BufRead, prompt: &mut impl Write) -> io::Result<bool> {
    write!(prompt, "  {BOLD}Remove all of these instances?{RESET} [y/N]: ")?;
    prompt.flush()?;
    let mut answer = String::new();
    let _ = input.read_line(&mut answer)?;
    Ok(engine::is_affirmative(&answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str) -> bool {
        let mut prompt = Vec::new();
        let result = confirm(&mut answer.as_bytes(), &mut prompt).expect("confirm");
        assert!(String::from_utf8_lossy(&prompt).contains("[y/N]"));
        result
    }

    #[test]
    fn yes_answers_confirm() {
        assert!(ask("y\n"));
        assert!(ask("YES\n"));
    }

    #[test]
    fn other_answers_cancel() {
        assert!(!ask("n\n"));
        assert!(!ask("\n"));
        assert!(!ask("sure\n"));
    }

    #[test]
    fn end_of_input_cancels() {
        assert!(!ask(""));
    }
}
