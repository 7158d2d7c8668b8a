//! Pausable periodic refresh timer driven by the caller's clock.
//!
//! The timer owns no thread. The runtime feeds it `Instant`s (real or
//! simulated) and it reports how many intervals fell due, which keeps
//! pause/resume semantics deterministic under test.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Lifecycle of a [`RefreshTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Built but never started.
    Idle,
    /// Firing every interval.
    Running,
    /// Suspended until resumed.
    Paused,
    /// Terminal; the timer never fires again.
    Stopped,
}

/// Pausable fixed-interval schedule polled with caller-supplied instants.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    state: TimerState,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    /// Create an idle timer. Zero intervals are raised to one millisecond.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            state: TimerState::Idle,
            next_due: None,
        }
    }

    /// Begin firing every interval from `now`. Only valid from `Idle`.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.state = TimerState::Running;
        self.next_due = Some(now + self.interval);
        true
    }

    /// Suspend firing. Returns `true` if the timer was running.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        self.next_due = None;
        true
    }

    /// Resume firing; the next tick is one full interval after `now`.
    ///
    /// An idle timer is started. A stopped timer stays stopped.
    pub fn resume(&mut self, now: Instant) -> bool {
        match self.state {
            TimerState::Paused | TimerState::Idle => {
                self.state = TimerState::Running;
                self.next_due = Some(now + self.interval);
                true
            }
            TimerState::Running | TimerState::Stopped => false,
        }
    }

    /// Flip between running and paused. Returns whether the timer now runs.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.state == TimerState::Running {
            self.pause();
        } else {
            self.resume(now);
        }
        self.is_running()
    }

    /// Cancel the timer for good. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.state == TimerState::Stopped {
            return false;
        }
        self.state = TimerState::Stopped;
        self.next_due = None;
        true
    }

    /// Number of intervals that elapsed since the previous poll.
    ///
    /// Always 0 unless running. The schedule advances past `now` so each
    /// interval is reported once.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if self.state != TimerState::Running || now < due {
            return 0;
        }

        let overdue = now.duration_since(due);
        let extra = overdue.as_nanos() / self.interval.as_nanos();
        let fired = u32::try_from(extra.saturating_add(1)).unwrap_or(u32::MAX);
        self.next_due = Some(due + self.interval * fired);
        fired
    }

    /// Configured refresh interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Whether the timer is in [`TimerState::Running`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// When the next tick is scheduled, if running.
    #[must_use]
    pub const fn next_due(&self) -> Option<Instant> {
        self.next_due
    }
}
