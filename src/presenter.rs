//! Overlay presenter: the Hidden/Shown state machine.
//!
//! The presenter owns the decision logic (is the privacy screen enabled,
//! is a cover already up, which content to show) and delegates the actual
//! mounting to an [`OverlayStrategy`]. Strategies are interchangeable and
//! picked once at plugin initialization.
//!
//! A failed show is deliberately fail-open: the cover is skipped, a warning
//! is logged, and the app's content stays visible. Wedging the host app
//! behind a cover that can never be torn down would be worse.

use crate::capture::ScreenSource;
use crate::cover;
use image::DynamicImage;
use std::sync::Mutex;

/// Why a cover could not be mounted.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("cover image could not be encoded: {0}")]
    Encode(#[from] image::ImageError),
    #[error("cover window operation failed: {0}")]
    Window(#[from] tauri::Error),
    #[error("no host window labeled '{0}' to cover")]
    MissingHostWindow(String),
}

/// How a composed cover gets on and off the screen.
///
/// `mount` must be idempotent-safe in the sense that the presenter never
/// calls it twice without an intervening `unmount`; `unmount` may be called
/// when nothing is mounted and must tolerate it.
pub trait OverlayStrategy: Send {
    fn mount(&mut self, cover: &DynamicImage) -> Result<(), OverlayError>;
    fn unmount(&mut self);
}

/// The overlay state machine. At most one cover exists at any time.
pub struct Presenter {
    strategy: Box<dyn OverlayStrategy>,
    screen: Box<dyn ScreenSource>,
    shown: bool,
}

/// Managed wrapper so Tauri state can hand out the presenter behind a lock.
pub struct SharedPresenter(pub Mutex<Presenter>);

impl Presenter {
    pub fn new(strategy: Box<dyn OverlayStrategy>, screen: Box<dyn ScreenSource>) -> Self {
        Self {
            strategy,
            screen,
            shown: false,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Put the cover up. No-op when the privacy screen is disabled or a
    /// cover is already mounted.
    pub fn show(&mut self, enabled: bool, custom: Option<&DynamicImage>) {
        if !enabled {
            log::debug!("[COVER] privacy screen disabled, leaving content visible");
            return;
        }
        if self.shown {
            log::debug!("[COVER] already shown, ignoring");
            return;
        }

        let cover = match cover::compose(custom, self.screen.as_ref()) {
            Ok(cover) => cover,
            Err(e) => {
                log::warn!("[COVER] could not build cover, content stays visible: {}", e);
                return;
            }
        };

        if let Err(e) = self.strategy.mount(&cover.image) {
            log::warn!("[COVER] could not mount cover, content stays visible: {}", e);
            return;
        }

        self.shown = true;
        log::info!("[COVER] shown ({})", cover.kind);
    }

    /// Tear the cover down. No-op when nothing is shown.
    pub fn hide(&mut self) {
        if !self.shown {
            return;
        }
        self.strategy.unmount();
        self.shown = false;
        log::info!("[COVER] hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureError;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Screen stub: fixed size, solid-color screenshot.
    struct StubScreen;

    impl ScreenSource for StubScreen {
        fn size(&self) -> Result<(u32, u32), CaptureError> {
            Ok((64, 64))
        }

        fn capture(&self) -> Result<DynamicImage, CaptureError> {
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                64,
                64,
                Rgba([50, 50, 50, 255]),
            )))
        }
    }

    /// Screen whose capture always fails, for the fail-open path.
    struct BrokenScreen;

    impl ScreenSource for BrokenScreen {
        fn size(&self) -> Result<(u32, u32), CaptureError> {
            Err(CaptureError::NoMonitor)
        }

        fn capture(&self) -> Result<DynamicImage, CaptureError> {
            Err(CaptureError::NoMonitor)
        }
    }

    /// Strategy that records mounts/unmounts and the mounted image size.
    #[derive(Default)]
    struct RecordingStrategy {
        mounts: Arc<AtomicUsize>,
        unmounts: Arc<AtomicUsize>,
        fail_mount: bool,
    }

    impl OverlayStrategy for RecordingStrategy {
        fn mount(&mut self, _cover: &DynamicImage) -> Result<(), OverlayError> {
            if self.fail_mount {
                return Err(OverlayError::MissingHostWindow("main".to_string()));
            }
            self.mounts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn unmount(&mut self) {
            self.unmounts.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn presenter_with_counters() -> (Presenter, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let mounts = Arc::new(AtomicUsize::new(0));
        let unmounts = Arc::new(AtomicUsize::new(0));
        let strategy = RecordingStrategy {
            mounts: mounts.clone(),
            unmounts: unmounts.clone(),
            fail_mount: false,
        };
        (
            Presenter::new(Box::new(strategy), Box::new(StubScreen)),
            mounts,
            unmounts,
        )
    }

    #[test]
    fn disabled_show_stays_hidden() {
        let (mut presenter, mounts, _) = presenter_with_counters();
        presenter.show(false, None);
        assert!(!presenter.is_shown());
        assert_eq!(mounts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn show_then_hide_round_trip() {
        let (mut presenter, mounts, unmounts) = presenter_with_counters();
        presenter.show(true, None);
        assert!(presenter.is_shown());
        presenter.hide();
        assert!(!presenter.is_shown());
        assert_eq!(mounts.load(Ordering::SeqCst), 1);
        assert_eq!(unmounts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn double_show_mounts_exactly_once() {
        let (mut presenter, mounts, _) = presenter_with_counters();
        presenter.show(true, None);
        presenter.show(true, None);
        assert_eq!(mounts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hide_without_show_is_a_no_op() {
        let (mut presenter, _, unmounts) = presenter_with_counters();
        presenter.hide();
        assert_eq!(unmounts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_capture_leaves_content_visible() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let strategy = RecordingStrategy {
            mounts: mounts.clone(),
            ..Default::default()
        };
        let mut presenter = Presenter::new(Box::new(strategy), Box::new(BrokenScreen));
        presenter.show(true, None);
        assert!(!presenter.is_shown());
        assert_eq!(mounts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_mount_allows_a_retry() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let strategy = RecordingStrategy {
            mounts: mounts.clone(),
            unmounts: Arc::new(AtomicUsize::new(0)),
            fail_mount: true,
        };
        let mut presenter = Presenter::new(Box::new(strategy), Box::new(StubScreen));
        presenter.show(true, None);
        assert!(!presenter.is_shown(), "failed mount must not mark shown");
    }

    #[test]
    fn custom_image_survives_a_failing_capture_backend() {
        // Custom covers only need the screen size; with a broken screen even
        // that fails, so the show is skipped rather than panicking.
        let mut presenter = Presenter::new(
            Box::new(RecordingStrategy::default()),
            Box::new(BrokenScreen),
        );
        let custom = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));
        presenter.show(true, Some(&custom));
        assert!(!presenter.is_shown());
    }
}
