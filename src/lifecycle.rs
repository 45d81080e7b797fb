//! Focus lifecycle: subscription registry and window-event dispatch.
//!
//! Losing interactive focus (app switcher, another window raised) covers
//! the app, regaining it uncovers. Tauri reports both as
//! `WindowEvent::Focused`.
//!
//! Subscriptions are explicit: each subscribe call yields an id that can be
//! unregistered later. Dispatch fires the presenter once per focus
//! transition no matter how many subscriptions exist, and the presenter is
//! idempotent, so a double subscribe can never double-mount a cover.

use crate::presenter::SharedPresenter;
use crate::state::PrivacyState;
use tauri::{AppHandle, Manager, Runtime, Window, WindowEvent};

/// Label of the cover window created by the dedicated-window strategy.
/// Focus events from that window are ignored: mounting an always-on-top
/// window steals focus from the app window, and reacting to that would
/// tear the cover down the instant it appears.
pub const COVER_WINDOW_LABEL: &str = "privacy-screen-cover";

/// Handle for one lifecycle subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionId(pub u32);

/// Active subscriptions. Ids are monotonic and never reused within a
/// process, so a stale unsubscribe cannot detach someone else's
/// registration.
pub struct SubscriptionRegistry {
    next_id: u32,
    active: Vec<SubscriptionId>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active: Vec::new(),
        }
    }

    pub fn register(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.active.push(id);
        id
    }

    /// Returns whether the id was actually registered. Unknown ids are a
    /// no-op.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.active.len();
        self.active.retain(|s| *s != id);
        self.active.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Window-event hook installed by the plugin builder.
///
/// Focus loss shows the cover (gated on an active subscription and the
/// enabled flag), focus regain hides it. Hide is dispatched even with no
/// subscriptions left so that unsubscribing while covered cannot strand the
/// cover on screen.
pub fn on_window_event<R: Runtime>(window: &Window<R>, event: &WindowEvent) {
    if let WindowEvent::Focused(focused) = event {
        dispatch_focus(window.app_handle(), window.label(), *focused);
    }
}

/// Route one focus transition to the presenter. Split out of the event
/// hook so it can be driven directly against a mock runtime.
///
/// Poisoned state locks fail closed: when in doubt, cover. A poisoned
/// custom-image lock falls back to the blurred screenshot, which still
/// covers.
pub(crate) fn dispatch_focus<R: Runtime>(app: &AppHandle<R>, source_label: &str, focused: bool) {
    if source_label == COVER_WINDOW_LABEL {
        return;
    }

    let presenter = app.state::<SharedPresenter>();
    let Ok(mut presenter) = presenter.0.lock() else {
        return;
    };

    if focused {
        presenter.hide();
        return;
    }

    let state = app.state::<PrivacyState>();
    let subscribed = state
        .subscriptions
        .lock()
        .map(|subs| !subs.is_empty())
        .unwrap_or(true);
    if !subscribed {
        return;
    }

    let enabled = state.enabled.lock().map(|e| *e).unwrap_or(true);
    let custom = state
        .custom_image
        .lock()
        .map(|img| (*img).clone())
        .unwrap_or(None);
    presenter.show(enabled, custom.as_ref());
}
