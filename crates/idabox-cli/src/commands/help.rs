//! `ida-docker help` — Usage information, the default command.

use idabox_common::config::Config;
use idabox_common::constants::BIN_NAME;

/// Renders the help text for the given configuration.
#[must_use]
pub fn render(config: &Config) -> String {
    format!(
        r"{BIN_NAME} runs IDA Pro in named containers.
It uses the container image: {image}

COMMANDS:
  list             - Show all running IDA Pro instances
  start -n <name>  - Create and start a new IDA Pro instance
  attach -n <name> - Connect to an existing instance
  flush [-f]       - Remove all instances (-f skips confirmation)

EXAMPLES:
  {BIN_NAME} start -n analysis1   - Start a session named 'analysis1'
  {BIN_NAME} attach -n analysis1  - Resume the session 'analysis1'
  {BIN_NAME} list                 - Show all sessions
  {BIN_NAME} flush                - Remove all sessions (asks first)

NOTES:
- The current directory is mounted into the instance at {mount}
- Your analyses and files are kept between sessions
- The image is pulled automatically when missing
",
        image = config.image,
        mount = config.workdir_mount,
    )
}

/// Executes the `help` command.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn execute(config: &Config) -> anyhow::Result<()> {
    print!("{}", render(config));
    Ok(())
}
