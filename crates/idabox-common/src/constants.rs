//! System-wide constants and default values.

/// Container runtime CLI invoked for every instance operation.
pub const DEFAULT_RUNTIME: &str = "docker";

/// Image the instances are created from.
pub const DEFAULT_IMAGE: &str = "lunkan/idapro9ubuntu:latest";

/// Path of the GUI binary inside the image.
pub const DEFAULT_GUI_BINARY: &str = "/opt/ida-pro-9.0/ida";

/// In-container path the invoking working directory is bind-mounted to.
pub const DEFAULT_WORKDIR_MOUNT: &str = "/home/ubuntu";

/// Host X11 socket directory, mounted at the same path in the instance.
pub const DEFAULT_X11_SOCKET: &str = "/tmp/.X11-unix";

/// Display access-control utility.
pub const DEFAULT_XHOST: &str = "xhost";

/// Argument granting the runtime's local user access to the display.
pub const DEFAULT_XHOST_GRANT: &str = "+local:docker";

/// Environment variable naming the active display server.
pub const DISPLAY_ENV: &str = "DISPLAY";

/// Format template making `ps` print one instance name per line.
pub const NAMES_FORMAT: &str = "{{.Names}}";

/// Environment variable pointing at a JSON configuration file.
pub const CONFIG_ENV: &str = "IDABOX_CONFIG";

/// Environment variable overriding the image reference.
pub const IMAGE_ENV: &str = "IDABOX_IMAGE";

/// Environment variable overriding the container runtime binary.
pub const RUNTIME_ENV: &str = "IDABOX_RUNTIME";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "ida-docker";
