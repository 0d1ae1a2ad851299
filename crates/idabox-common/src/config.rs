//! Configuration model for idabox.
//!
//! A [`Config`] is built once per invocation (defaults, then an optional
//! JSON file, then command-line overrides) and handed to the engine as an
//! immutable value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{IdaboxError, Result};
use crate::types::ImageRef;

/// Root configuration for idabox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Container runtime CLI binary.
    pub runtime: String,
    /// Image instances are created from and pulled when missing.
    pub image: ImageRef,
    /// Ancestor filter used by `list` and `flush`; falls back to `image`.
    pub ancestor: Option<ImageRef>,
    /// Path of the GUI binary inside the instance.
    pub gui_binary: String,
    /// In-container mount point for the working directory.
    pub workdir_mount: String,
    /// X11 socket directory shared with the instance.
    pub x11_socket: PathBuf,
    /// Display access-control utility.
    pub xhost: String,
    /// Argument passed to `xhost` to grant the runtime display access.
    pub xhost_grant: String,
    /// Whether `start` requires the superuser.
    pub require_root: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: constants::DEFAULT_RUNTIME.into(),
            image: ImageRef::new(constants::DEFAULT_IMAGE),
            ancestor: None,
            gui_binary: constants::DEFAULT_GUI_BINARY.into(),
            workdir_mount: constants::DEFAULT_WORKDIR_MOUNT.into(),
            x11_socket: PathBuf::from(constants::DEFAULT_X11_SOCKET),
            xhost: constants::DEFAULT_XHOST.into(),
            xhost_grant: constants::DEFAULT_XHOST_GRANT.into(),
            require_root: true,
        }
    }
}

impl Config {
    /// Loads a configuration file, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds invalid values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| IdaboxError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = ImageRef::new(image);
        self
    }

    /// Replaces the container runtime binary.
    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Image reference used to select this tool's instances.
    #[must_use]
    pub fn ancestor(&self) -> &ImageRef {
        self.ancestor.as_ref().unwrap_or(&self.image)
    }

    /// Checks that every field holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`IdaboxError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("runtime", self.runtime.as_str()),
            ("image", self.image.as_str()),
            ("gui_binary", self.gui_binary.as_str()),
            ("workdir_mount", self.workdir_mount.as_str()),
            ("xhost", self.xhost.as_str()),
            ("xhost_grant", self.xhost_grant.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(IdaboxError::Config {
                    message: format!("`{field}` must not be empty"),
                });
            }
        }
        if self.ancestor.as_ref().is_some_and(|a| a.as_str().trim().is_empty()) {
            return Err(IdaboxError::Config {
                message: "`ancestor` must not be empty when set".into(),
            });
        }
        let absolute = [
            ("gui_binary", Path::new(&self.gui_binary)),
            ("workdir_mount", Path::new(&self.workdir_mount)),
            ("x11_socket", self.x11_socket.as_path()),
        ];
        for (field, path) in absolute {
            if !path.is_absolute() {
                return Err(IdaboxError::Config {
                    message: format!("`{field}` must be an absolute path, got {}", path.display()),
                });
            }
        }
        Ok(())
    }
}
