//! Screen capture seam

use autopia_common::Result;
use std::path::Path;
use tracing::debug;

/// Captures the screen into an image file
///
/// The report decides the file name and location; implementations only
/// write the image, typically through a browser driver or an OS API.
pub trait ScreenCapture: Send {
    fn capture(&self, path: &Path) -> Result<()>;
}

/// Capture that writes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl ScreenCapture for NoCapture {
    fn capture(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Screen capture is disabled");
        Ok(())
    }
}

impl<F> ScreenCapture for F
where
    F: Fn(&Path) -> Result<()> + Send,
{
    fn capture(&self, path: &Path) -> Result<()> {
        self(path)
    }
}
