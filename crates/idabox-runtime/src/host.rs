//! Facts about the invoking host, captured once per invocation.

use std::path::{Path, PathBuf};

use idabox_common::constants::DISPLAY_ENV;
use idabox_common::error::{IdaboxError, Result};

/// Snapshot of the process environment the operations depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Value of `DISPLAY`, if set and non-empty.
    pub display: Option<String>,
    /// Whether the effective user is the superuser.
    pub is_root: bool,
    /// Current working directory, shared with new instances. `None` if it
    /// could not be resolved (e.g. it was deleted).
    pub workdir: Option<PathBuf>,
}

impl Host {
    /// Reads `DISPLAY`, the effective uid, and the working directory.
    ///
    /// Nothing here is required up front; each operation asks for the
    /// facts it needs through the `require_*` accessors.
    #[must_use]
    pub fn detect() -> Self {
        let workdir = match std::env::current_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                tracing::debug!(error = %e, "working directory unavailable");
                None
            }
        };
        let host = Self {
            display: std::env::var(DISPLAY_ENV).ok().filter(|d| !d.is_empty()),
            is_root: nix::unistd::geteuid().is_root(),
            workdir,
        };
        tracing::debug!(
            display = ?host.display,
            is_root = host.is_root,
            workdir = ?host.workdir,
            "detected host"
        );
        host
    }

    /// The display endpoint, required by every GUI-launching path.
    ///
    /// # Errors
    ///
    /// Returns [`IdaboxError::DisplayUnset`] if `DISPLAY` was not set.
    pub fn require_display(&self) -> Result<&str> {
        self.display.as_deref().ok_or(IdaboxError::DisplayUnset)
    }

    /// The directory bind-mounted into new instances.
    ///
    /// # Errors
    ///
    /// Returns [`IdaboxError::WorkdirUnavailable`] if it could not be resolved.
    pub fn require_workdir(&self) -> Result<&Path> {
        self.workdir.as_deref().ok_or(IdaboxError::WorkdirUnavailable)
    }
}
