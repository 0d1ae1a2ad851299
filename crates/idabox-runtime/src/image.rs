//! Local availability of the instance image.

use idabox_common::error::{IdaboxError, Result};
use idabox_common::types::ImageRef;

use crate::docker::ContainerCli;
use crate::process::{CommandRunner, OutputMode};

/// How the image became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// The image was already present locally.
    Present,
    /// The image was missing and has been pulled.
    Pulled,
}

/// Makes sure `image` exists locally, pulling it when it does not.
///
/// Pull progress is shown on the terminal.
///
/// # Errors
///
/// Returns [`IdaboxError::PullFailed`] if the pull exits unsuccessfully, or
/// a runner error if the runtime binary cannot be started.
pub fn ensure_image(runner: &dyn CommandRunner, cli: &ContainerCli, image: &ImageRef) -> Result<ImageStatus> {
    tracing::debug!(%image, "checking image");
    if runner.run(&cli.image_inspect(image), OutputMode::Silent)?.success {
        return Ok(ImageStatus::Present);
    }

    tracing::info!(%image, "image not found locally, pulling");
    let outcome = runner.run(&cli.pull(image), OutputMode::Inherit)?;
    if !outcome.success {
        return Err(IdaboxError::PullFailed {
            image: image.to_string(),
            status: outcome.status_text(),
        });
    }
    tracing::info!(%image, "image ready");
    Ok(ImageStatus::Pulled)
}
