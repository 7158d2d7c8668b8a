//! Modal dialog stack.
//!
//! Dialogs are identified by a monotonically increasing [`DialogId`] and a
//! free-form kind tag naming the template the presentation layer draws.
//! Opening a dialog whose kind is already open replaces the old instance
//! rather than stacking a duplicate.
//!
//! Every operation is total: "nothing to close" is a `false`/`None` result,
//! never an error, since double clicks and stale handles are routine in UI
//! code.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ──────────────────── identifiers ────────────────────

/// Unique identifier of an open dialog. Never reused within a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogId(u64);

impl DialogId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

/// One open modal surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dialog {
    /// Identifier handed back by [`DialogStack::open`].
    pub id: DialogId,
    /// Template name, e.g. `persona-mixing` or `technique-detail`.
    pub kind: String,
    /// Data the template needs, e.g. the technique a detail dialog shows.
    pub payload: Option<serde_json::Value>,
    /// Local time the dialog was opened.
    pub opened_at: DateTime<Local>,
}

// ──────────────────── cancel policy ────────────────────

/// What a cancel signal (Escape, host back gesture) does to the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Close every open dialog at once.
    #[default]
    CloseAll,
    /// Close only the topmost dialog, one layer per signal.
    CloseTopmost,
}

impl CancelPolicy {
    /// Config spelling of the policy.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CloseAll => "close_all",
            Self::CloseTopmost => "close_topmost",
        }
    }
}

impl fmt::Display for CancelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "close_all" | "all" => Ok(Self::CloseAll),
            "close_topmost" | "topmost" => Ok(Self::CloseTopmost),
            other => Err(format!(
                "unknown cancel policy {other:?} (expected close_all or close_topmost)"
            )),
        }
    }
}

// ──────────────────── presentation hooks ────────────────────

/// Mount/unmount notifications for the presentation layer.
pub trait DialogSink {
    /// A dialog was pushed and should be drawn.
    fn mount(&mut self, _dialog: &Dialog) {}
    /// A dialog was removed and its surface should be destroyed.
    fn unmount(&mut self, _id: DialogId) {}
}

/// Sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDialogSink;

impl DialogSink for NoopDialogSink {}

// ──────────────────── stack ────────────────────

/// Ordered collection of open dialogs, last opened on top.
pub struct DialogStack {
    dialogs: Vec<Dialog>,
    next_id: u64,
    sink: Box<dyn DialogSink>,
}

impl fmt::Debug for DialogStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogStack")
            .field("dialogs", &self.dialogs)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl Default for DialogStack {
    fn default() -> Self {
        Self::new(NoopDialogSink)
    }
}

impl DialogStack {
    /// Create an empty stack reporting mounts to `sink`.
    pub fn new(sink: impl DialogSink + 'static) -> Self {
        Self {
            dialogs: Vec::new(),
            next_id: 1,
            sink: Box::new(sink),
        }
    }

    /// Push a new dialog of `kind`, replacing any open dialog of the same kind.
    ///
    /// The replaced dialog is unmounted before the new one is mounted.
    pub fn open(&mut self, kind: &str, payload: Option<serde_json::Value>) -> DialogId {
        if let Some(pos) = self.dialogs.iter().position(|d| d.kind == kind) {
            let replaced = self.dialogs.remove(pos);
            tracing::debug!(id = %replaced.id, kind, "replacing open dialog");
            self.sink.unmount(replaced.id);
        }

        let id = DialogId(self.next_id);
        self.next_id += 1;
        let dialog = Dialog {
            id,
            kind: kind.to_string(),
            payload,
            opened_at: Local::now(),
        };
        tracing::debug!(%id, kind, depth = self.dialogs.len() + 1, "dialog opened");
        self.sink.mount(&dialog);
        self.dialogs.push(dialog);
        id
    }

    /// Close the dialog `id`, or the topmost dialog when `id` is `None`.
    ///
    /// Returns `false` when nothing matched.
    pub fn close(&mut self, id: Option<DialogId>) -> bool {
        let removed = match id {
            Some(id) => self
                .dialogs
                .iter()
                .position(|d| d.id == id)
                .map(|pos| self.dialogs.remove(pos)),
            None => self.dialogs.pop(),
        };

        match removed {
            Some(dialog) => {
                tracing::debug!(id = %dialog.id, kind = %dialog.kind, "dialog closed");
                self.sink.unmount(dialog.id);
                true
            }
            None => false,
        }
    }

    /// Close every dialog, topmost first. Returns how many were removed.
    pub fn close_all(&mut self) -> usize {
        let count = self.dialogs.len();
        while let Some(dialog) = self.dialogs.pop() {
            self.sink.unmount(dialog.id);
        }
        if count > 0 {
            tracing::debug!(count, "all dialogs closed");
        }
        count
    }

    /// Apply a cancel signal under `policy`. Returns how many dialogs closed.
    pub fn cancel(&mut self, policy: CancelPolicy) -> usize {
        match policy {
            CancelPolicy::CloseAll => self.close_all(),
            CancelPolicy::CloseTopmost => usize::from(self.close(None)),
        }
    }

    /// Most recently opened dialog still open.
    #[must_use]
    pub fn topmost(&self) -> Option<&Dialog> {
        self.dialogs.last()
    }

    /// Whether a dialog of `kind` is open.
    #[must_use]
    pub fn is_open(&self, kind: &str) -> bool {
        self.dialogs.iter().any(|d| d.kind == kind)
    }

    /// Open dialog with identifier `id`.
    #[must_use]
    pub fn get(&self, id: DialogId) -> Option<&Dialog> {
        self.dialogs.iter().find(|d| d.id == id)
    }

    /// Open dialogs from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Dialog> {
        self.dialogs.iter()
    }

    /// Number of open dialogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    /// Whether no dialog is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Hook {
        Mount(DialogId, String),
        Unmount(DialogId),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Hook>>>);

    impl DialogSink for Recorder {
        fn mount(&mut self, dialog: &Dialog) {
            self.0
                .borrow_mut()
                .push(Hook::Mount(dialog.id, dialog.kind.clone()));
        }

        fn unmount(&mut self, id: DialogId) {
            self.0.borrow_mut().push(Hook::Unmount(id));
        }
    }

    fn recording_stack() -> (DialogStack, Recorder) {
        let recorder = Recorder::default();
        (DialogStack::new(recorder.clone()), recorder)
    }

    #[test]
    fn open_pushes_and_mounts() {
        let (mut stack, hooks) = recording_stack();
        let id = stack.open("persona-mixing", None);

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.topmost().map(|d| d.id), Some(id));
        assert!(stack.is_open("persona-mixing"));
        assert_eq!(
            hooks.0.borrow().as_slice(),
            &[Hook::Mount(id, "persona-mixing".into())]
        );
    }

    #[test]
    fn reopening_same_kind_replaces() {
        let (mut stack, hooks) = recording_stack();
        let first = stack.open("persona-mixing", None);
        let second = stack.open("persona-mixing", None);

        assert_ne!(first, second);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.iter().filter(|d| d.kind == "persona-mixing").count(), 1);
        assert_eq!(stack.topmost().map(|d| d.id), Some(second));
        assert_eq!(
            hooks.0.borrow().as_slice(),
            &[
                Hook::Mount(first, "persona-mixing".into()),
                Hook::Unmount(first),
                Hook::Mount(second, "persona-mixing".into()),
            ]
        );
    }

    #[test]
    fn replacement_moves_kind_to_top() {
        let mut stack = DialogStack::default();
        stack.open("a", None);
        stack.open("b", None);
        stack.open("a", None);
        let kinds: Vec<&str> = stack.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, ["b", "a"]);
    }

    #[test]
    fn close_without_id_removes_topmost() {
        let mut stack = DialogStack::default();
        stack.open("a", None);
        stack.open("b", None);

        assert!(stack.close(None));
        assert!(stack.is_open("a"));
        assert!(!stack.is_open("b"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn close_by_id_removes_from_middle() {
        let (mut stack, hooks) = recording_stack();
        stack.open("a", None);
        let b = stack.open("b", None);
        stack.open("c", None);

        assert!(stack.close(Some(b)));
        let kinds: Vec<&str> = stack.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, ["a", "c"]);
        assert_eq!(hooks.0.borrow().last(), Some(&Hook::Unmount(b)));
    }

    #[test]
    fn close_missing_is_false() {
        let (mut stack, hooks) = recording_stack();
        assert!(!stack.close(None));
        let id = stack.open("a", None);
        assert!(stack.close(Some(id)));
        assert!(!stack.close(Some(id)), "double close must be a no-op");
        assert_eq!(hooks.0.borrow().len(), 2);
    }

    #[test]
    fn close_all_counts_and_empties() {
        let (mut stack, hooks) = recording_stack();
        let a = stack.open("a", None);
        let b = stack.open("b", None);
        let c = stack.open("c", None);

        assert_eq!(stack.close_all(), 3);
        assert!(stack.is_empty());
        assert_eq!(stack.close_all(), 0);

        let unmounts: Vec<Hook> = hooks.0.borrow()[3..].to_vec();
        assert_eq!(
            unmounts,
            vec![Hook::Unmount(c), Hook::Unmount(b), Hook::Unmount(a)]
        );
    }

    #[test]
    fn ids_are_never_reused() {
        let mut stack = DialogStack::default();
        let a = stack.open("a", None);
        stack.close(Some(a));
        let b = stack.open("a", None);
        assert!(b > a);
    }

    #[test]
    fn payload_is_kept() {
        let mut stack = DialogStack::default();
        let id = stack.open("technique-detail", Some(json!({"technique": "mirroring"})));
        let dialog = stack.get(id).unwrap();
        assert_eq!(dialog.payload, Some(json!({"technique": "mirroring"})));
    }

    #[test]
    fn cancel_follows_policy() {
        let mut stack = DialogStack::default();
        stack.open("a", None);
        stack.open("b", None);
        assert_eq!(stack.cancel(CancelPolicy::CloseTopmost), 1);
        assert!(stack.is_open("a"));

        stack.open("b", None);
        assert_eq!(stack.cancel(CancelPolicy::CloseAll), 2);
        assert_eq!(stack.cancel(CancelPolicy::CloseTopmost), 0);
    }

    #[test]
    fn cancel_policy_parses_aliases() {
        assert_eq!("close_all".parse::<CancelPolicy>(), Ok(CancelPolicy::CloseAll));
        assert_eq!(
            "close-topmost".parse::<CancelPolicy>(),
            Ok(CancelPolicy::CloseTopmost)
        );
        assert!("sometimes".parse::<CancelPolicy>().is_err());
    }

    #[test]
    fn dialog_id_display() {
        let mut stack = DialogStack::default();
        let id = stack.open("a", None);
        assert_eq!(id.to_string(), "dialog-1");
        assert_eq!(id.get(), 1);
    }
}
