//! `ida-docker attach` — Run IDA Pro inside an existing instance.

use clap::Args;
use idabox_common::types::InstanceName;
use idabox_runtime::engine::Engine;

use crate::output::{self, BOLD, RESET};

/// Arguments for the `attach` command.
#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Name of the instance to connect to.
    #[arg(short, long)]
    pub name: InstanceName,
}

/// Executes the `attach` command.
///
/// Starts the instance if it is stopped, then runs IDA Pro with the
/// terminal attached. The process exits with the GUI's exit code.
/// A refused display grant is logged by the engine before the session
/// starts.
///
/// # Errors
///
/// Returns an error if the instance does not exist, the display is
/// missing, or the instance cannot be started.
pub fn execute(engine: &Engine, args: &AttachArgs) -> anyhow::Result<()> {
    super::ensure_image(engine)?;
    output::step(&format!(
        "Connecting to IDA Pro instance {BOLD}{}{RESET}...",
        args.name
    ));

    // Interrupts belong to the attached session; keep waiting for it.
    ctrlc::set_handler(|| {})
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))?;

    let report = engine.attach(&args.name)?;

    match report.exit_code {
        Some(0) => Ok(()),
        Some(code) => {
            output::failure(&format!("IDA Pro exited with status {code}."));
            std::process::exit(code);
        }
        None => {
            output::failure("IDA Pro was terminated by a signal.");
            std::process::exit(1);
        }
    }
}
