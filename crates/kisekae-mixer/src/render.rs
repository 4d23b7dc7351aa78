//! Rendering a mixer program through an application session.

use crate::error::{MixerError, Result};
use crate::output::output_path;
use crate::program::MixerProgram;
use crate::resolver::CodeResolver;
use crate::session::{CaptureRequest, Session};
use std::path::Path;
use tracing::{debug, info, warn};

/// Extension of captured images
pub const IMAGE_EXTENSION: &str = "png";

/// Outcome counts of a render run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Images written
    pub rendered: usize,
    /// Codes refused by the application or whose capture failed
    pub failed: usize,
}

impl RenderSummary {
    /// Whether every code rendered
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Apply every generated code in turn and save a capture of it
///
/// Codes are excluded before upload so that parts missing from a
/// combination are cleared rather than inherited from the previous one.
/// Refusals and capture errors are counted and skipped; file write errors
/// abort the run. The session is closed at the end either way.
pub async fn render_program<R, S>(
    program: &MixerProgram,
    resolver: &R,
    session: &mut S,
    output_dir: &Path,
    request: &CaptureRequest,
) -> Result<RenderSummary>
where
    R: CodeResolver + ?Sized,
    S: Session + ?Sized,
{
    let result = render_all(program, resolver, session, output_dir, request).await;
    session.close().await?;
    result
}

async fn render_all<R, S>(
    program: &MixerProgram,
    resolver: &R,
    session: &mut S,
    output_dir: &Path,
    request: &CaptureRequest,
) -> Result<RenderSummary>
where
    R: CodeResolver + ?Sized,
    S: Session + ?Sized,
{
    let codes = program.enumerate_codes(resolver)?;
    let mut summary = RenderSummary::default();

    for (name, code) in codes {
        let mut code = code;
        code.exclude();

        if !session.apply_code(&code.to_string()).await? {
            warn!("Application refused {}", name.display());
            summary.failed += 1;
            continue;
        }

        let image = match session.capture_image(request).await {
            Ok(image) => image,
            Err(e) => {
                warn!("Capture of {} failed: {}", name.display(), e);
                summary.failed += 1;
                continue;
            }
        };

        let path = output_path(output_dir, &name, IMAGE_EXTENSION);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| MixerError::WriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, &image)
            .await
            .map_err(|source| MixerError::WriteFailed {
                path: path.clone(),
                source,
            })?;
        debug!("Saved {} ({} bytes)", path.display(), image.len());
        summary.rendered += 1;
    }

    info!(
        "Rendered {} images, {} failed",
        summary.rendered, summary.failed
    );
    Ok(summary)
}
