//! Bridge command handlers.
//!
//! Thin wrappers translating frontend `invoke()` calls into state changes.
//! Success and failure messages keep the wording the plugin's JS callers
//! have always matched on. Internal error enums are stringified at this
//! boundary; nothing here panics into the host app.

use crate::lifecycle::SubscriptionId;
use crate::loader;
use crate::overlay::{CoverInfo, CoverState};
use crate::state::PrivacyState;
use serde::Serialize;
use tauri::State;

/// Result of a subscribe call: the id to pass to unsubscribe later.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub subscription_id: SubscriptionId,
    pub message: String,
}

/// Register a lifecycle subscription. Each call yields a fresh id; covers
/// are mounted once per focus loss no matter how many ids are active.
#[tauri::command]
pub fn subscribe_privacy_screen(
    state: State<'_, PrivacyState>,
) -> Result<SubscribeResponse, String> {
    let mut subs = state.subscriptions.lock().map_err(|e| e.to_string())?;
    let id = subs.register();
    log::info!("[PRIVACY] subscribed (id {}, {} active)", id.0, subs.len());
    Ok(SubscribeResponse {
        subscription_id: id,
        message: "success subscribe privacy screen service".to_string(),
    })
}

/// Drop a lifecycle subscription. Unknown ids succeed as a no-op.
#[tauri::command]
pub fn unsubscribe_privacy_screen(
    state: State<'_, PrivacyState>,
    subscription_id: u32,
) -> Result<String, String> {
    let mut subs = state.subscriptions.lock().map_err(|e| e.to_string())?;
    let removed = subs.remove(SubscriptionId(subscription_id));
    log::info!(
        "[PRIVACY] unsubscribe id {} ({}, {} active)",
        subscription_id,
        if removed { "removed" } else { "unknown" },
        subs.len()
    );
    Ok("success unsubscribe privacy screen service".to_string())
}

/// Turn the privacy screen on. Affects future focus-loss events only.
#[tauri::command]
pub fn enable_privacy_screen(state: State<'_, PrivacyState>) -> Result<String, String> {
    *state.enabled.lock().map_err(|e| e.to_string())? = true;
    log::info!("[PRIVACY] enabled");
    Ok("success enable privacy screen service".to_string())
}

/// Turn the privacy screen off. An already-mounted cover still comes down
/// on the next focus regain.
#[tauri::command]
pub fn disable_privacy_screen(state: State<'_, PrivacyState>) -> Result<String, String> {
    *state.enabled.lock().map_err(|e| e.to_string())? = false;
    log::info!("[PRIVACY] disabled");
    Ok("success disable privacy screen service".to_string())
}

/// Set a custom cover image from a data URL, file path, or http(s) URL.
///
/// The reference is resolved and decoded before anything is stored, so a
/// failed set never clobbers a previously stored image.
#[tauri::command]
pub async fn set_privacy_screen(
    state: State<'_, PrivacyState>,
    image_reference: String,
) -> Result<String, String> {
    let bytes = loader::load(&image_reference)
        .await
        .map_err(|e| format!("failed set privacy screen image: {}", e))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("failed set privacy screen image: {}", e))?;

    let (width, height) = (decoded.width(), decoded.height());
    *state.custom_image.lock().map_err(|e| e.to_string())? = Some(decoded);
    log::info!(
        "[PRIVACY] custom cover image set ({}x{}, {} bytes)",
        width,
        height,
        bytes.len()
    );
    Ok("success set privacy screen image".to_string())
}

/// Get the current cover info (image path for the dedicated cover window).
///
/// Called by the cover page on load. This backstops the cover-ready event,
/// which can fire before the page's JS is listening.
#[tauri::command]
pub fn get_privacy_cover(state: State<'_, CoverState>) -> Result<CoverInfo, String> {
    let info = state.info.lock().map_err(|e| e.to_string())?;
    info.clone().ok_or_else(|| "no cover is mounted".to_string())
}

/// Drop the custom cover image; covers fall back to the blurred screenshot.
#[tauri::command]
pub fn clear_privacy_screen(state: State<'_, PrivacyState>) -> Result<String, String> {
    *state.custom_image.lock().map_err(|e| e.to_string())? = None;
    log::info!("[PRIVACY] custom cover image cleared");
    Ok("success clear privacy screen image".to_string())
}
