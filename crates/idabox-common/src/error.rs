//! Unified error type for the idabox workspace.
//!
//! Variants fall into three groups: missing preconditions (no display,
//! no privilege, unknown instance), failures of an external command, and
//! local problems (configuration, I/O). User cancellation is not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum IdaboxError {
    /// The external program could not be located on `PATH`.
    #[error("program not found: {program}")]
    ProgramNotFound {
        /// Program that was looked up.
        program: String,
    },

    /// The external program was found but could not be spawned.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An external command ran and exited unsuccessfully.
    #[error("`{command}` failed ({status}){}", format_detail(.detail))]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured stderr, if any.
        detail: String,
    },

    /// The display environment variable is not set.
    #[error("the DISPLAY variable is not set; cannot reach the X11 server")]
    DisplayUnset,

    /// The invoking working directory could not be resolved.
    #[error("the current working directory is unavailable; it cannot be shared with a new instance")]
    WorkdirUnavailable,

    /// A permission or privilege requirement was not met.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Description of the missing privilege.
        message: String,
    },

    /// An instance with the requested name already exists.
    #[error("an instance named '{name}' already exists")]
    InstanceExists {
        /// Conflicting instance name.
        name: String,
    },

    /// No instance with the requested name exists, running or stopped.
    #[error("no instance named '{name}' was found")]
    InstanceNotFound {
        /// Missing instance name.
        name: String,
    },

    /// Pulling the image from its registry failed.
    #[error("failed to pull image {image} ({status})")]
    PullFailed {
        /// Image reference that could not be pulled.
        image: String,
        /// Exit status description.
        status: String,
    },

    /// A user-supplied instance name was rejected.
    #[error("invalid instance name '{name}': {reason}")]
    InvalidName {
        /// Rejected name.
        name: String,
        /// Rule the name violated.
        reason: &'static str,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

fn format_detail(detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, IdaboxError>;
