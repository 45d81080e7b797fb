//! Concrete overlay strategies.
//!
//! Two interchangeable ways to put a cover above all app content, both
//! satisfying the [`OverlayStrategy`] contract and selected once at plugin
//! initialization:
//!
//! - [`DedicatedWindow`]: a fullscreen, undecorated, always-on-top webview
//!   window that displays the cover image. The default.
//! - [`MainWindowCover`]: no extra window; the cover is emitted to an
//!   existing host window as a PNG data URL and rendered as an in-page
//!   layer. For hosts that cannot spawn extra windows.

use crate::lifecycle::COVER_WINDOW_LABEL;
use crate::presenter::{OverlayError, OverlayStrategy};
use base64::Engine;
use image::DynamicImage;
use std::path::PathBuf;
use tauri::{AppHandle, Emitter, Manager, Runtime, WebviewUrl, WebviewWindowBuilder};

/// Event carrying the cover image path to the dedicated cover window.
pub const COVER_READY_EVENT: &str = "privacy-screen://cover-ready";
/// Events driving the in-page cover layer of the main-window strategy.
pub const SHOW_EVENT: &str = "privacy-screen://show";
pub const HIDE_EVENT: &str = "privacy-screen://hide";

/// What the dedicated cover window needs to render the cover.
///
/// Stored in managed state so the window can fetch it via a command on
/// load — the `cover-ready` event alone races with the page's JS startup.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverInfo {
    pub image_path: String,
}

/// Managed storage for the current [`CoverInfo`]. Present only while a
/// dedicated cover window is mounted.
pub struct CoverState {
    pub info: std::sync::Mutex<Option<CoverInfo>>,
}

impl CoverState {
    pub fn new() -> Self {
        Self {
            info: std::sync::Mutex::new(None),
        }
    }
}

impl Default for CoverState {
    fn default() -> Self {
        Self::new()
    }
}

/// Strategy choice, made by the host app at `init` time.
#[derive(Debug, Clone, Default)]
pub enum OverlayMode {
    /// Spawn a dedicated cover window (default).
    #[default]
    DedicatedWindow,
    /// Emit show/hide events to the window with this label instead.
    MainWindowCover { host_label: String },
}

/// Dedicated cover window above everything else.
///
/// The cover is written to a temp BMP and loaded by the window via the
/// asset protocol. BMP is headers plus raw pixels: a local file write
/// instead of a PNG encode, which is far too slow for a full-screen image
/// in debug builds.
///
/// The host app ships `privacy-screen-cover.html`, a page that fetches
/// [`CoverInfo`] on load (or listens for [`COVER_READY_EVENT`]) and
/// displays the image full-bleed.
pub struct DedicatedWindow<R: Runtime> {
    app: AppHandle<R>,
    cover_path: PathBuf,
}

impl<R: Runtime> DedicatedWindow<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self {
            app,
            cover_path: std::env::temp_dir().join("privacy-screen-cover.bmp"),
        }
    }

    /// Create the window and announce the cover to it.
    fn build_and_announce(&self) -> Result<(), OverlayError> {
        let window = WebviewWindowBuilder::new(
            &self.app,
            COVER_WINDOW_LABEL,
            WebviewUrl::App("privacy-screen-cover.html".into()),
        )
        .title("Privacy Screen")
        .fullscreen(true)
        .decorations(false)
        .always_on_top(true)
        .skip_taskbar(true)
        .focused(false)
        .build()?;

        window.emit(
            COVER_READY_EVENT,
            serde_json::json!({ "imagePath": self.cover_path.to_string_lossy() }),
        )?;
        Ok(())
    }

    /// Remove every trace of a mount: the window, the published cover info,
    /// and the temp file. Safe to call when nothing is mounted; also the
    /// error path of `mount`, so a half-mounted cover can never outlive a
    /// failed mount and strand the host app behind it.
    fn teardown(&self) {
        if let Some(window) = self.app.get_webview_window(COVER_WINDOW_LABEL) {
            let _ = window.destroy();
        }
        if let Ok(mut info) = self.app.state::<CoverState>().info.lock() {
            *info = None;
        }
        let _ = std::fs::remove_file(&self.cover_path);
    }
}

impl<R: Runtime> OverlayStrategy for DedicatedWindow<R> {
    fn mount(&mut self, cover: &DynamicImage) -> Result<(), OverlayError> {
        cover.save_with_format(&self.cover_path, image::ImageFormat::Bmp)?;

        // Publish the cover info before the window exists so the page can
        // fetch it on load even if the cover-ready event beats its JS.
        if let Ok(mut info) = self.app.state::<CoverState>().info.lock() {
            *info = Some(CoverInfo {
                image_path: self.cover_path.to_string_lossy().into_owned(),
            });
        }

        // A leftover window from a previous mount means an unmount was
        // missed; replace it rather than stacking a second one.
        if let Some(existing) = self.app.get_webview_window(COVER_WINDOW_LABEL) {
            log::warn!("[COVER] replacing leftover cover window");
            let _ = existing.destroy();
        }

        let result = self.build_and_announce();
        if result.is_err() {
            self.teardown();
        }
        result
    }

    fn unmount(&mut self) {
        self.teardown();
    }
}

/// In-page cover layer on an existing host window.
///
/// The cover travels as a PNG data URL in the show event's payload; the
/// host page is responsible for rendering it above its own content and
/// removing it on the hide event.
pub struct MainWindowCover<R: Runtime> {
    app: AppHandle<R>,
    host_label: String,
}

impl<R: Runtime> MainWindowCover<R> {
    pub fn new(app: AppHandle<R>, host_label: String) -> Self {
        Self { app, host_label }
    }
}

impl<R: Runtime> OverlayStrategy for MainWindowCover<R> {
    fn mount(&mut self, cover: &DynamicImage) -> Result<(), OverlayError> {
        let host = self
            .app
            .get_webview_window(&self.host_label)
            .ok_or_else(|| OverlayError::MissingHostWindow(self.host_label.clone()))?;

        let mut png = Vec::new();
        cover.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
        let data_url = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );

        host.emit(SHOW_EVENT, serde_json::json!({ "imageDataUrl": data_url }))?;
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(host) = self.app.get_webview_window(&self.host_label) {
            let _ = host.emit(HIDE_EVENT, ());
        }
    }
}

/// Build the strategy the host asked for.
pub(crate) fn strategy_for<R: Runtime>(
    app: AppHandle<R>,
    mode: &OverlayMode,
) -> Box<dyn OverlayStrategy> {
    match mode {
        OverlayMode::DedicatedWindow => Box::new(DedicatedWindow::new(app)),
        OverlayMode::MainWindowCover { host_label } => {
            Box::new(MainWindowCover::new(app, host_label.clone()))
        }
    }
}
