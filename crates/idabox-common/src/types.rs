//! Domain primitive types used across the idabox workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdaboxError;

/// Name identifying one container instance.
///
/// Follows the container runtime's naming rule: a leading ASCII
/// alphanumeric, then alphanumerics, `_`, `.` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceName(String);

impl InstanceName {
    /// Validates and wraps an instance name.
    ///
    /// # Errors
    ///
    /// Returns [`IdaboxError::InvalidName`] if the name is empty or contains
    /// characters the container runtime would reject.
    pub fn new(name: impl Into<String>) -> crate::error::Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(IdaboxError::InvalidName {
                name,
                reason: "name must not be empty",
            });
        };
        if !first.is_ascii_alphanumeric() {
            return Err(IdaboxError::InvalidName {
                name,
                reason: "name must start with a letter or digit",
            });
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
            return Err(IdaboxError::InvalidName {
                name,
                reason: "only letters, digits, '_', '.' and '-' are allowed",
            });
        }
        Ok(Self(name))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InstanceName {
    type Err = IdaboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for InstanceName {
    type Error = IdaboxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InstanceName> for String {
    fn from(name: InstanceName) -> Self {
        name.0
    }
}

/// Reference to a container image, e.g. `registry/repo:tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Creates an image reference from a string value.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of an instance as reported by the container runtime.
///
/// Always a snapshot: the runtime may change it before the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceStatus {
    /// The instance exists and is running.
    Running,
    /// The instance exists but is not running.
    Stopped,
    /// No instance with this name exists.
    Absent,
}

impl InstanceStatus {
    /// Whether the runtime knows the instance at all.
    #[must_use]
    pub const fn exists(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Absent => write!(f, "absent"),
        }
    }
}
