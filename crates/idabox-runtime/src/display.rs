//! X11 access for instances.
//!
//! The GUI inside an instance talks to the host display through the shared
//! socket; the host server must first allow the runtime's local user.

use idabox_common::config::Config;
use idabox_common::error::Result;

use crate::host::Host;
use crate::process::{CommandRunner, Invocation, OutputMode};

/// Result of asking the display server for access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayGrant {
    /// The access-control utility accepted the grant.
    Granted,
    /// The grant failed; the display may still work if access is already open.
    Denied(String),
}

/// Grants the container runtime access to the host display.
///
/// A failing or missing `xhost` is logged and reported as
/// [`DisplayGrant::Denied`]; only an unset `DISPLAY` is an error.
///
/// # Errors
///
/// Returns [`IdaboxError::DisplayUnset`](idabox_common::error::IdaboxError::DisplayUnset)
/// if the host has no display.
pub fn grant_access(runner: &dyn CommandRunner, config: &Config, host: &Host) -> Result<DisplayGrant> {
    let endpoint = host.require_display()?;
    tracing::info!(%endpoint, "configuring X11 access");

    let invocation = Invocation::new(config.xhost.clone()).arg(config.xhost_grant.clone());
    let grant = match runner.run(&invocation, OutputMode::Inherit) {
        Ok(outcome) if outcome.success => DisplayGrant::Granted,
        Ok(outcome) => DisplayGrant::Denied(format!("`{invocation}` failed ({})", outcome.status_text())),
        Err(e) => DisplayGrant::Denied(e.to_string()),
    };
    if let DisplayGrant::Denied(ref reason) = grant {
        tracing::warn!(%reason, "could not grant X11 access; the display may not work");
    }
    Ok(grant)
}
