//! Screen capture behind a seam.
//!
//! The presenter only talks to [`ScreenSource`]; the xcap-backed
//! implementation lives here so tests can substitute a canned screen.

use image::DynamicImage;

/// Why the screen could not be measured or captured.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no monitor available")]
    NoMonitor,
    #[error("screen capture failed: {0}")]
    Backend(String),
}

/// What the presenter needs from the platform: the screen bounds (for
/// fitting a custom cover image) and a screenshot of the visible content.
pub trait ScreenSource: Send {
    fn size(&self) -> Result<(u32, u32), CaptureError>;
    fn capture(&self) -> Result<DynamicImage, CaptureError>;
}

/// Production screen source backed by xcap's primary monitor.
pub struct XcapScreen;

impl ScreenSource for XcapScreen {
    fn size(&self) -> Result<(u32, u32), CaptureError> {
        let monitor = primary_monitor()?;
        let width = monitor
            .width()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        let height = monitor
            .height()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        Ok((width, height))
    }

    fn capture(&self) -> Result<DynamicImage, CaptureError> {
        let monitor = primary_monitor()?;
        let rgba = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}

/// Pick the primary monitor, falling back to the first one enumerated
/// (some Linux backends never flag a primary).
fn primary_monitor() -> Result<xcap::Monitor, CaptureError> {
    let monitors =
        xcap::Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
    let mut fallback = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
        if fallback.is_none() {
            fallback = Some(monitor);
        }
    }
    fallback.ok_or(CaptureError::NoMonitor)
}
