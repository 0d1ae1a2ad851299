//! Invocations of the container runtime CLI.
//!
//! Pure builders: nothing here spawns a process. The engine pairs each
//! invocation with an [`OutputMode`](crate::process::OutputMode).

use std::path::Path;

use idabox_common::constants::{DISPLAY_ENV, NAMES_FORMAT};
use idabox_common::types::{ImageRef, InstanceName};

use crate::process::Invocation;

/// Which instances a `ps` query includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only running instances.
    Running,
    /// Running and stopped instances.
    All,
}

/// Settings for creating a new instance.
#[derive(Debug, Clone)]
pub struct RunSpec<'a> {
    /// Instance name.
    pub name: &'a InstanceName,
    /// Image to create the instance from.
    pub image: &'a ImageRef,
    /// Value forwarded as `DISPLAY`.
    pub display: &'a str,
    /// Host X11 socket directory, mounted at the same path.
    pub x11_socket: &'a Path,
    /// Host directory to share with the instance.
    pub workdir: &'a Path,
    /// In-container mount point for `workdir`.
    pub workdir_mount: &'a str,
}

/// Builds invocations for one container runtime binary.
#[derive(Debug, Clone)]
pub struct ContainerCli {
    program: String,
}

impl ContainerCli {
    /// Creates a builder for the given runtime binary, e.g. `docker`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn base(&self) -> Invocation {
        Invocation::new(self.program.clone())
    }

    /// `image inspect <image>`
    #[must_use]
    pub fn image_inspect(&self, image: &ImageRef) -> Invocation {
        self.base().args(["image", "inspect"]).arg(image.as_str())
    }

    /// `pull <image>`
    #[must_use]
    pub fn pull(&self, image: &ImageRef) -> Invocation {
        self.base().arg("pull").arg(image.as_str())
    }

    /// `ps --filter ancestor=<image>`, the runtime's own table layout.
    #[must_use]
    pub fn ps_table(&self, ancestor: &ImageRef) -> Invocation {
        self.base()
            .arg("ps")
            .arg("--filter")
            .arg(format!("ancestor={ancestor}"))
    }

    /// `ps [-a] --filter ancestor=<image> --format {{.Names}}`
    #[must_use]
    pub fn ps_names_by_ancestor(&self, scope: Scope, ancestor: &ImageRef) -> Invocation {
        self.ps_names(scope, &format!("ancestor={ancestor}"))
    }

    /// `ps [-a] --filter name=<name> --format {{.Names}}`
    ///
    /// The runtime treats the name filter as a substring match, so callers
    /// must compare the returned lines exactly.
    #[must_use]
    pub fn ps_names_by_name(&self, scope: Scope, name: &InstanceName) -> Invocation {
        self.ps_names(scope, &format!("name={name}"))
    }

    fn ps_names(&self, scope: Scope, filter: &str) -> Invocation {
        let mut inv = self.base().arg("ps");
        if scope == Scope::All {
            inv = inv.arg("-a");
        }
        inv.arg("--filter")
            .arg(filter)
            .arg("--format")
            .arg(NAMES_FORMAT)
    }

    /// `run -itd --name <n> --env DISPLAY=<d> --volume <x11> --volume <cwd>:<mount> <image>`
    #[must_use]
    pub fn run_detached(&self, spec: &RunSpec<'_>) -> Invocation {
        let x11 = spec.x11_socket.display();
        self.base()
            .args(["run", "-itd", "--name"])
            .arg(spec.name.as_str())
            .arg("--env")
            .arg(format!("{DISPLAY_ENV}={}", spec.display))
            .arg("--volume")
            .arg(format!("{x11}:{x11}"))
            .arg("--volume")
            .arg(format!("{}:{}", spec.workdir.display(), spec.workdir_mount))
            .arg(spec.image.as_str())
    }

    /// `exec -itd <n> <binary>`, returning once the process is launched.
    #[must_use]
    pub fn exec_detached(&self, name: &InstanceName, binary: &str) -> Invocation {
        self.base().args(["exec", "-itd"]).arg(name.as_str()).arg(binary)
    }

    /// `exec -it <n> <binary>`, blocking until the process exits.
    #[must_use]
    pub fn exec_interactive(&self, name: &InstanceName, binary: &str) -> Invocation {
        self.base().args(["exec", "-it"]).arg(name.as_str()).arg(binary)
    }

    /// `start <n>`
    #[must_use]
    pub fn start(&self, name: &InstanceName) -> Invocation {
        self.base().arg("start").arg(name.as_str())
    }

    /// `rm -f <n>`
    #[must_use]
    pub fn remove_force(&self, name: &str) -> Invocation {
        self.base().args(["rm", "-f"]).arg(name)
    }
}

/// Splits `--format {{.Names}}` output into instance names.
///
/// Blank lines are dropped and surrounding whitespace is trimmed.
#[must_use]
pub fn parse_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Whether `stdout` lists exactly `name`, not merely a name containing it.
#[must_use]
pub fn lists_name(stdout: &str, name: &InstanceName) -> bool {
    stdout.lines().any(|line| line.trim() == name.as_str())
}
