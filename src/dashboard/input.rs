//! Input routing: host signals to session actions.
//!
//! Resolution precedence: while any dialog is open, dialogs own the input and
//! navigation signals are swallowed. Otherwise signals map onto view
//! navigation and refresh controls.

#![allow(missing_docs)]

use super::dialogs::CancelPolicy;
use super::view::View;

/// Raw signals translated by the host wiring (keys, gestures, buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    /// Escape key or equivalent.
    Cancel,
    /// Mobile back button.
    Back,
    SwipeLeft,
    SwipeRight,
    /// Number key `1`–`7`.
    Hotkey(u8),
    ToggleRefresh,
    RefreshNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Close dialogs per the configured cancel policy.
    CancelDialogs(CancelPolicy),
    /// Close only the topmost dialog.
    CloseTopmost,
    Navigate(View),
    ToggleRefresh,
    RefreshNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub view: View,
    pub dialogs_open: bool,
    pub cancel_policy: CancelPolicy,
}

impl Default for InputContext {
    fn default() -> Self {
        Self {
            view: View::Overview,
            dialogs_open: false,
            cancel_policy: CancelPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolution {
    pub action: Option<SessionAction>,
    pub consumed: bool,
}

impl InputResolution {
    const fn action(action: SessionAction) -> Self {
        Self {
            action: Some(action),
            consumed: true,
        }
    }

    const fn consumed_without_action() -> Self {
        Self {
            action: None,
            consumed: true,
        }
    }

    const fn passthrough() -> Self {
        Self {
            action: None,
            consumed: false,
        }
    }
}

/// Resolve a signal against the current session context.
#[must_use]
pub fn resolve_signal(signal: InputSignal, context: InputContext) -> InputResolution {
    if context.dialogs_open {
        return resolve_dialog_signal(signal, context.cancel_policy);
    }
    resolve_global_signal(signal, context.view)
}

fn resolve_dialog_signal(signal: InputSignal, policy: CancelPolicy) -> InputResolution {
    match signal {
        InputSignal::Cancel => InputResolution::action(SessionAction::CancelDialogs(policy)),
        InputSignal::Back => InputResolution::action(SessionAction::CloseTopmost),
        InputSignal::ToggleRefresh => InputResolution::action(SessionAction::ToggleRefresh),
        InputSignal::RefreshNow => InputResolution::action(SessionAction::RefreshNow),
        InputSignal::SwipeLeft | InputSignal::SwipeRight | InputSignal::Hotkey(_) => {
            InputResolution::consumed_without_action()
        }
    }
}

fn resolve_global_signal(signal: InputSignal, view: View) -> InputResolution {
    match signal {
        // Nothing to close and no view history to walk back through.
        InputSignal::Cancel | InputSignal::Back => InputResolution::passthrough(),
        InputSignal::SwipeLeft => InputResolution::action(SessionAction::Navigate(view.next())),
        InputSignal::SwipeRight => InputResolution::action(SessionAction::Navigate(view.prev())),
        InputSignal::Hotkey(n) => match View::from_number(n) {
            Some(target) => InputResolution::action(SessionAction::Navigate(target)),
            None => InputResolution::passthrough(),
        },
        InputSignal::ToggleRefresh => InputResolution::action(SessionAction::ToggleRefresh),
        InputSignal::RefreshNow => InputResolution::action(SessionAction::RefreshNow),
    }
}
