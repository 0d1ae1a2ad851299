//! `ida-docker start` — Create a new instance and launch IDA Pro in it.

use clap::Args;
use idabox_common::types::InstanceName;
use idabox_runtime::engine::Engine;

use crate::output::{self, BOLD, RESET};

/// Arguments for the `start` command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Name of the new instance.
    #[arg(short, long)]
    pub name: InstanceName,
}

/// Executes the `start` command.
///
/// The current directory is shared with the instance and the GUI is
/// launched detached, so the command returns once IDA Pro is up.
///
/// # Errors
///
/// Returns an error if the name is taken, privileges or display are
/// missing, or creating the instance fails.
pub fn execute(engine: &Engine, args: &StartArgs) -> anyhow::Result<()> {
    super::ensure_image(engine)?;
    output::step(&format!(
        "Starting a new IDA Pro instance named {BOLD}{}{RESET}...",
        args.name
    ));

    let _ = engine.start(&args.name)?;

    output::success(&format!("Instance {BOLD}{}{RESET} is running.", args.name));
    Ok(())
}
