//! CLI command definitions and dispatch.

pub mod attach;
pub mod flush;
pub mod help;
pub mod list;
pub mod start;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use idabox_common::config::Config;
use idabox_common::constants::{CONFIG_ENV, IMAGE_ENV, RUNTIME_ENV};
use idabox_common::error::IdaboxError;
use idabox_runtime::engine::Engine;
use idabox_runtime::host::Host;
use idabox_runtime::image::ImageStatus;

use crate::output;

/// ida-docker — run IDA Pro in named containers with host X11 display.
#[derive(Parser, Debug)]
#[command(
    name = "ida-docker",
    version,
    about,
    long_about = None,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `help`).
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted by every subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// JSON configuration file.
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Container image to use instead of the configured one.
    #[arg(long, global = true, env = IMAGE_ENV)]
    pub image: Option<String>,

    /// Container runtime binary to use instead of the configured one.
    #[arg(long, global = true, env = RUNTIME_ENV)]
    pub runtime: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show usage information and the image in use.
    Help,
    /// List running IDA Pro instances.
    List,
    /// Create and start a new IDA Pro instance in the current directory.
    Start(start::StartArgs),
    /// Connect to an existing IDA Pro instance.
    Attach(attach::AttachArgs),
    /// Remove every IDA Pro instance.
    Flush(flush::FlushArgs),
}

/// Builds the configuration: defaults, then the config file, then
/// command-line overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the result is
/// invalid.
pub fn load_config(global: &GlobalArgs) -> Result<Config, IdaboxError> {
    let mut config = match &global.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(image) = &global.image {
        config = config.with_image(image.clone());
    }
    if let Some(runtime) = &global.runtime {
        config = config.with_runtime(runtime.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Dispatches the parsed CLI command to its handler.
///
/// Errors that have a known remedy are followed by guidance on stderr.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.global)?;
    let runtime = config.runtime.clone();

    let command = cli.command.unwrap_or(Command::Help);
    if matches!(command, Command::Help) {
        return help::execute(&config);
    }

    let engine = Engine::new(config, Host::detect());
    let result = match command {
        Command::Help => Ok(()),
        Command::List => list::execute(&engine),
        Command::Start(args) => start::execute(&engine, &args),
        Command::Attach(args) => attach::execute(&engine, &args),
        Command::Flush(args) => flush::execute(&engine, &args),
    };
    if let Err(ref e) = result {
        if let Some(err) = e.downcast_ref::<IdaboxError>() {
            output::print_guidance(err, &runtime);
        }
    }
    result
}

/// Makes sure the image exists, telling the user when it had to be pulled.
fn ensure_image(engine: &Engine) -> Result<(), IdaboxError> {
    let image = &engine.config().image;
    output::step(&format!("Checking image {image}..."));
    if engine.ensure_image()? == ImageStatus::Pulled {
        output::success(&format!("Image {image} is ready."));
    }
    Ok(())
}
