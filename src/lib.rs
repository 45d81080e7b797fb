//! Privacy screen plugin for Tauri.
//!
//! Covers the app with a blurred screenshot — or a caller-supplied custom
//! image — the moment it loses interactive focus, and uncovers it when
//! focus returns. Keeps sensitive content out of OS-level app previews and
//! switcher thumbnails.
//!
//! This is the plugin shell that wires everything together. No business
//! logic lives here — only module declarations, state management, the
//! command registry, and the window-event hook.
//!
//! Typical host setup:
//!
//! ```rust,ignore
//! tauri::Builder::default()
//!     .plugin(tauri_plugin_privacy_screen::init())
//!     .run(tauri::generate_context!())?;
//! ```
//!
//! The frontend then calls `subscribe_privacy_screen` once; from that point
//! every focus loss mounts the cover and every focus regain removes it.
//! `enable_privacy_screen` / `disable_privacy_screen` toggle the behavior,
//! `set_privacy_screen` / `clear_privacy_screen` manage the custom image.
//! Nothing is persisted across restarts.

pub mod blur;
pub mod capture;
mod commands;
pub mod cover;
mod lifecycle;
pub mod loader;
pub mod overlay;
pub mod presenter;
mod state;

use capture::XcapScreen;
use presenter::{Presenter, SharedPresenter};
use std::sync::Mutex;
use tauri::plugin::{Builder as PluginBuilder, TauriPlugin};
use tauri::{Manager, Runtime};

pub use commands::SubscribeResponse;
pub use lifecycle::{SubscriptionId, COVER_WINDOW_LABEL};
pub use overlay::OverlayMode;
pub use state::PrivacyState;

/// Initialize the plugin with the default dedicated-window overlay.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    init_with(OverlayMode::default())
}

/// Initialize the plugin with an explicit overlay strategy.
pub fn init_with<R: Runtime>(mode: OverlayMode) -> TauriPlugin<R> {
    PluginBuilder::new("privacy-screen")
        .invoke_handler(tauri::generate_handler![
            commands::subscribe_privacy_screen,
            commands::unsubscribe_privacy_screen,
            commands::enable_privacy_screen,
            commands::disable_privacy_screen,
            commands::set_privacy_screen,
            commands::clear_privacy_screen,
            commands::get_privacy_cover,
        ])
        .setup(move |app, _api| {
            app.manage(PrivacyState::new());
            app.manage(overlay::CoverState::new());
            let strategy = overlay::strategy_for(app.clone(), &mode);
            app.manage(SharedPresenter(Mutex::new(Presenter::new(
                strategy,
                Box::new(XcapScreen),
            ))));
            log::info!("[PRIVACY] plugin initialized ({:?})", mode);
            Ok(())
        })
        .on_event(|app, event| {
            if let tauri::RunEvent::WindowEvent { label, event, .. } = event {
                if let Some(window) = app.get_window(label) {
                    lifecycle::on_window_event(&window, event);
                }
            }
        })
        .build()
}
