//! Lifecycle engine for named instances.
//!
//! All authoritative state lives in the container runtime. Every operation
//! re-queries it, and every read is only a snapshot: a mutating call that
//! fails because the runtime changed in between surfaces its own error.

use idabox_common::config::Config;
use idabox_common::error::{IdaboxError, Result};
use idabox_common::types::{InstanceName, InstanceStatus};

use crate::display::{self, DisplayGrant};
use crate::docker::{self, ContainerCli, RunSpec, Scope};
use crate::host::Host;
use crate::image::{self, ImageStatus};
use crate::process::{CommandRunner, Invocation, Outcome, OutputMode, SystemRunner};

/// Report of a completed `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    /// Outcome of the display access grant.
    pub display: DisplayGrant,
}

/// Report of a completed `attach`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachReport {
    /// Whether a stopped instance had to be started first.
    pub restarted: bool,
    /// Outcome of the display access grant.
    pub display: DisplayGrant,
    /// Exit code of the GUI process; `None` if it died from a signal.
    pub exit_code: Option<i32>,
}

/// A removal that failed during `flush`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalFailure {
    /// Instance that could not be removed.
    pub name: String,
    /// Error text from the runtime.
    pub reason: String,
}

/// Report of a `flush`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Names of every matching instance found.
    pub found: Vec<String>,
    /// Whether the user declined the confirmation.
    pub cancelled: bool,
    /// Instances removed successfully.
    pub removed: Vec<String>,
    /// Instances whose removal failed.
    pub failed: Vec<RemovalFailure>,
}

/// Receives the progress of [`Engine::flush`] as it happens.
pub trait FlushObserver {
    /// Called once with the number of matching instances, before any removal.
    fn found(&mut self, _count: usize) {}

    /// Asked only when the flush is not forced; `false` cancels it.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be obtained.
    fn confirm(&mut self, count: usize) -> Result<bool>;

    /// Called after each successful removal.
    fn removed(&mut self, _name: &str) {}

    /// Called after each failed removal; the batch continues.
    fn failed(&mut self, _failure: &RemovalFailure) {}
}

/// Coordinates the container runtime, display setup and image check.
pub struct Engine {
    config: Config,
    cli: ContainerCli,
    runner: Box<dyn CommandRunner>,
    host: Host,
}

impl Engine {
    /// Creates an engine that spawns real processes.
    #[must_use]
    pub fn new(config: Config, host: Host) -> Self {
        Self::with_runner(config, host, Box::new(SystemRunner::new()))
    }

    /// Creates an engine using a custom command runner.
    #[must_use]
    pub fn with_runner(config: Config, host: Host, runner: Box<dyn CommandRunner>) -> Self {
        let cli = ContainerCli::new(config.runtime.clone());
        Self {
            config,
            cli,
            runner,
            host,
        }
    }

    /// Returns the configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Makes sure the configured image is available locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull fails or the runtime cannot be started.
    pub fn ensure_image(&self) -> Result<ImageStatus> {
        image::ensure_image(self.runner.as_ref(), &self.cli, &self.config.image)
    }

    /// Returns the runtime's table of running instances, verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime query fails.
    pub fn list(&self) -> Result<String> {
        let outcome = self.capture(&self.cli.ps_table(self.config.ancestor()))?;
        Ok(outcome.stdout)
    }

    /// Queries the current status of the named instance.
    ///
    /// # Errors
    ///
    /// Returns an error if a runtime query fails.
    pub fn status(&self, name: &InstanceName) -> Result<InstanceStatus> {
        let running = self.capture(&self.cli.ps_names_by_name(Scope::Running, name))?;
        if docker::lists_name(&running.stdout, name) {
            return Ok(InstanceStatus::Running);
        }
        let all = self.capture(&self.cli.ps_names_by_name(Scope::All, name))?;
        if docker::lists_name(&all.stdout, name) {
            Ok(InstanceStatus::Stopped)
        } else {
            Ok(InstanceStatus::Absent)
        }
    }

    /// Creates a new instance and launches the GUI in it, detached.
    ///
    /// # Errors
    ///
    /// Returns [`IdaboxError::InstanceExists`] if the name is taken,
    /// [`IdaboxError::PermissionDenied`] without superuser rights,
    /// [`IdaboxError::WorkdirUnavailable`] if the working directory is gone,
    /// [`IdaboxError::DisplayUnset`] without a display, or
    /// [`IdaboxError::CommandFailed`] if creation or launch fails.
    pub fn start(&self, name: &InstanceName) -> Result<StartReport> {
        tracing::info!(%name, "starting new instance");

        let existing = self.capture(&self.cli.ps_names_by_name(Scope::All, name))?;
        if docker::lists_name(&existing.stdout, name) {
            return Err(IdaboxError::InstanceExists {
                name: name.to_string(),
            });
        }

        if self.config.require_root && !self.host.is_root {
            return Err(IdaboxError::PermissionDenied {
                message: "creating an instance requires superuser privileges (run with sudo)"
                    .into(),
            });
        }

        let workdir = self.host.require_workdir()?;
        let grant = display::grant_access(self.runner.as_ref(), &self.config, &self.host)?;
        let endpoint = self.host.require_display()?;

        let spec = RunSpec {
            name,
            image: &self.config.image,
            display: endpoint,
            x11_socket: &self.config.x11_socket,
            workdir,
            workdir_mount: &self.config.workdir_mount,
        };
        tracing::info!(%name, workdir = %workdir.display(), "creating container");
        self.interactive(&self.cli.run_detached(&spec))?;

        tracing::info!(%name, binary = %self.config.gui_binary, "launching GUI (detached)");
        self.interactive(&self.cli.exec_detached(name, &self.config.gui_binary))?;

        Ok(StartReport { display: grant })
    }

    /// Runs the GUI inside an existing instance with the terminal attached.
    ///
    /// A stopped instance is started first. Blocks until the GUI exits.
    ///
    /// # Errors
    ///
    /// Returns [`IdaboxError::InstanceNotFound`] if the instance does not
    /// exist, [`IdaboxError::DisplayUnset`] without a display, or
    /// [`IdaboxError::CommandFailed`] if restarting the instance fails.
    pub fn attach(&self, name: &InstanceName) -> Result<AttachReport> {
        tracing::info!(%name, "attaching to instance");

        let restarted = match self.status(name)? {
            InstanceStatus::Running => false,
            InstanceStatus::Stopped => {
                tracing::info!(%name, "instance is stopped, starting it");
                self.interactive(&self.cli.start(name))?;
                true
            }
            InstanceStatus::Absent => {
                return Err(IdaboxError::InstanceNotFound {
                    name: name.to_string(),
                });
            }
        };

        let grant = display::grant_access(self.runner.as_ref(), &self.config, &self.host)?;

        let exec = self.cli.exec_interactive(name, &self.config.gui_binary);
        tracing::info!(%name, binary = %self.config.gui_binary, "launching GUI");
        let outcome = self.runner.run(&exec, OutputMode::Inherit)?;
        tracing::info!(%name, code = ?outcome.code, "GUI exited");

        Ok(AttachReport {
            restarted,
            display: grant,
            exit_code: outcome.code,
        })
    }

    /// Force-removes every instance created from the configured image.
    ///
    /// The observer hears the count first. Unless `force` is set it is then
    /// asked to confirm; declining cancels without side effects. Each removal
    /// is reported as it completes, and a failed one does not stop the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the instances or the confirmation fails.
    pub fn flush(&self, force: bool, observer: &mut dyn FlushObserver) -> Result<FlushReport> {
        let ancestor = self.config.ancestor();
        let listing = self.capture(&self.cli.ps_names_by_ancestor(Scope::All, ancestor))?;
        let found = docker::parse_names(&listing.stdout);
        tracing::info!(%ancestor, count = found.len(), "instances found for flush");

        let mut report = FlushReport {
            found,
            ..FlushReport::default()
        };
        if report.found.is_empty() {
            return Ok(report);
        }

        observer.found(report.found.len());
        if !force && !observer.confirm(report.found.len())? {
            tracing::info!("flush cancelled");
            report.cancelled = true;
            return Ok(report);
        }

        for name in &report.found {
            let invocation = self.cli.remove_force(name);
            let result = self
                .runner
                .run(&invocation, OutputMode::Capture)
                .and_then(|outcome| outcome.into_result(&invocation));
            match result {
                Ok(_) => {
                    tracing::info!(%name, "instance removed");
                    observer.removed(name);
                    report.removed.push(name.clone());
                }
                Err(e) => {
                    tracing::debug!(%name, error = %e, "failed to remove instance");
                    let failure = RemovalFailure {
                        name: name.clone(),
                        reason: e.to_string(),
                    };
                    observer.failed(&failure);
                    report.failed.push(failure);
                }
            }
        }
        Ok(report)
    }

    fn capture(&self, invocation: &Invocation) -> Result<Outcome> {
        self.runner
            .run(invocation, OutputMode::Capture)?
            .into_result(invocation)
    }

    fn interactive(&self, invocation: &Invocation) -> Result<()> {
        let _ = self
            .runner
            .run(invocation, OutputMode::Inherit)?
            .into_result(invocation)?;
        Ok(())
    }
}

/// Whether a confirmation answer means yes (`y` or `yes`, any case).
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
