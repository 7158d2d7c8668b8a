//! Bounded, newest-first activity log for the on-screen log panel.

use std::collections::VecDeque;
use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Pattern used when a configured time format cannot be rendered.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Whether `format` is a non-empty strftime pattern chrono can render.
#[must_use]
pub fn is_valid_time_format(format: &str) -> bool {
    !format.trim().is_empty()
        && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// One timestamped line of narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Local time the entry was appended.
    pub timestamp: DateTime<Local>,
    /// Narration text, shown verbatim.
    pub message: String,
}

impl LogEntry {
    /// Build an entry stamped with the current local time.
    pub fn now(message: impl Into<String>) -> Self {
        Self::at(Local::now(), message)
    }

    /// Build an entry with an explicit timestamp.
    pub fn at(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Timestamp rendered with a strftime pattern such as `%H:%M:%S`.
    ///
    /// A pattern chrono rejects renders with [`DEFAULT_TIME_FORMAT`] instead.
    #[must_use]
    pub fn display_time(&self, format: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.timestamp.format(format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", self.timestamp.format(DEFAULT_TIME_FORMAT));
        }
        out
    }
}

/// Newest-first ring of [`LogEntry`] values.
///
/// `len() <= capacity()` holds after every mutation; appending at capacity
/// evicts the oldest entry from the back.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ActivityLog {
    /// Create an empty log. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `message` at the current time. Empty messages are kept as-is.
    pub fn append(&mut self, message: impl Into<String>) {
        self.push(LogEntry::now(message));
    }

    /// Insert a pre-built entry at the front, evicting from the back.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries from newest to oldest.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recently appended entry.
    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Drop every entry (the settings "clear records" action).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy of the entries, newest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}
