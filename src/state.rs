//! Plugin context state.
//!
//! One struct owns everything the commands and the lifecycle hook mutate:
//! the enabled flag, the optional custom cover image, and the subscription
//! registry. All fields sit behind a `Mutex` so the state can live in
//! Tauri's managed-state map; locks are held only for short copy/swap
//! sections, never across capture, blur, or network I/O.

use crate::lifecycle::SubscriptionRegistry;
use image::DynamicImage;
use std::sync::Mutex;

pub struct PrivacyState {
    /// Whether the privacy screen reacts to focus loss. Defaults to true;
    /// toggled only by the enable/disable commands, never persisted.
    pub enabled: Mutex<bool>,
    /// Caller-supplied cover image. Overwritten whole on each successful
    /// set command; a failed set leaves it untouched.
    pub custom_image: Mutex<Option<DynamicImage>>,
    /// Active lifecycle subscriptions.
    pub subscriptions: Mutex<SubscriptionRegistry>,
}

impl PrivacyState {
    pub fn new() -> Self {
        Self {
            enabled: Mutex::new(true),
            custom_image: Mutex::new(None),
            subscriptions: Mutex::new(SubscriptionRegistry::new()),
        }
    }
}

impl Default for PrivacyState {
    fn default() -> Self {
        Self::new()
    }
}
