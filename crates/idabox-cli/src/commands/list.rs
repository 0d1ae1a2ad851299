//! `ida-docker list` — Show running instances.

use idabox_runtime::engine::Engine;

/// Executes the `list` command.
///
/// Prints the runtime's own table of running instances unchanged.
///
/// # Errors
///
/// Returns an error if the image check or the runtime query fails.
pub fn execute(engine: &Engine) -> anyhow::Result<()> {
    super::ensure_image(engine)?;
    crate::output::step("Listing active IDA Pro sessions...");
    let table = engine.list()?;
    print!("{table}");
    Ok(())
}
