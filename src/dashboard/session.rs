//! Dashboard session: the single owner of view, dialog, log and timer state.
//!
//! One session exists per mounted dashboard. Collaborators are injected at
//! construction; nothing is reachable through globals. Request handlers in
//! this module never propagate errors: invalid requests are clamped (state
//! unchanged, warning logged, failure narrated) so a bad event from the host
//! can't take the dashboard down.

use std::time::Instant;

use serde::Serialize;

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::dashboard::activity::{self, ActivityLog, LogEntry};
use crate::dashboard::controller::{RenderSink, ViewController};
use crate::dashboard::dialogs::{CancelPolicy, Dialog, DialogId, DialogSink, DialogStack};
use crate::dashboard::input::{InputContext, InputSignal, SessionAction, resolve_signal};
use crate::dashboard::stats::{StatsSnapshot, StatsSource};
use crate::dashboard::timer::{RefreshTimer, TimerState};
use crate::dashboard::view::View;

/// Refresh bookkeeping exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    /// Successful refresh passes.
    pub refreshes: u64,
    /// Refresh passes where the stats source failed.
    pub refresh_failures: u64,
    /// Intervals that elapsed between ticks and were coalesced.
    pub missed_ticks: u64,
}

/// Serialisable view of the whole session for polling presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Visible view.
    pub view: View,
    /// Active tab of a tabbed view.
    pub tab: Option<String>,
    /// Open dialogs, bottom to top.
    pub dialogs: Vec<Dialog>,
    /// Activity log, newest first.
    pub log: Vec<LogEntry>,
    /// Refresh timer state.
    pub refresh: TimerState,
    /// Configured refresh interval.
    pub refresh_interval_ms: u64,
    /// Result of the last successful refresh.
    pub stats: Option<StatsSnapshot>,
    /// Refresh bookkeeping.
    pub counters: SessionCounters,
}

/// Owner of one mounted dashboard's state.
///
/// After [`DashboardSession::teardown`] every mutating entry point is a
/// no-op: nothing renders, mounts or narrates.
pub struct DashboardSession {
    views: ViewController,
    dialogs: DialogStack,
    log: ActivityLog,
    timer: RefreshTimer,
    source: Box<dyn StatsSource>,
    latest: Option<StatsSnapshot>,
    cancel_policy: CancelPolicy,
    time_format: String,
    counters: SessionCounters,
    torn_down: bool,
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("views", &self.views)
            .field("dialogs", &self.dialogs)
            .field("log", &self.log)
            .field("timer", &self.timer)
            .field("counters", &self.counters)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl DashboardSession {
    /// Build a session showing the configured start view.
    ///
    /// With `refresh.auto_start` the timer starts at `now`. A time format
    /// chrono cannot render is replaced with the default pattern.
    pub fn new(
        config: &Config,
        renderer: impl RenderSink + 'static,
        dialog_sink: impl DialogSink + 'static,
        source: impl StatsSource + 'static,
        now: Instant,
    ) -> Self {
        let mut timer = RefreshTimer::new(config.refresh.interval());
        if config.refresh.auto_start {
            timer.start(now);
        }

        let time_format = if activity::is_valid_time_format(&config.activity.time_format) {
            config.activity.time_format.clone()
        } else {
            tracing::warn!(
                time_format = %config.activity.time_format,
                fallback = activity::DEFAULT_TIME_FORMAT,
                "unusable activity time format"
            );
            activity::DEFAULT_TIME_FORMAT.to_string()
        };

        let mut session = Self {
            views: ViewController::with_view(config.session.start_view, renderer),
            dialogs: DialogStack::new(dialog_sink),
            log: ActivityLog::new(config.activity.capacity),
            timer,
            source: Box::new(source),
            latest: None,
            cancel_policy: config.dialogs.cancel_policy,
            time_format,
            counters: SessionCounters::default(),
            torn_down: false,
        };
        session.log.append("Status monitor started");
        tracing::info!(
            view = %config.session.start_view,
            interval_ms = config.refresh.interval_ms,
            auto_start = config.refresh.auto_start,
            "dashboard session created"
        );
        session
    }

    // ── views ──

    /// Switch to `view` and narrate the change.
    ///
    /// Returns `false` once the session is torn down.
    pub fn navigate(&mut self, view: View) -> bool {
        if self.torn_down {
            return false;
        }
        self.views.switch_view(view);
        self.log.append(format!("Switched to {} view", view.title()));
        true
    }

    /// Switch to the view named `id`; unknown names are clamped.
    ///
    /// Returns whether the switch happened.
    pub fn handle_view_request(&mut self, id: &str) -> bool {
        if self.torn_down {
            return false;
        }
        match self.views.switch_view_named(id) {
            Ok(view) => {
                self.log.append(format!("Switched to {} view", view.title()));
                true
            }
            Err(err) => {
                tracing::warn!(code = err.code(), requested = id, "ignoring view request");
                self.log.append(format!("Ignored request: {err}"));
                false
            }
        }
    }

    /// Select `tab` in the current view; unknown tabs are clamped.
    pub fn handle_tab_request(&mut self, tab: &str) -> bool {
        if self.torn_down {
            return false;
        }
        match self.views.switch_tab(tab) {
            Ok(()) => {
                self.log.append(format!("Switched to {tab} tab"));
                true
            }
            Err(err) => {
                tracing::warn!(code = err.code(), tab, "ignoring tab request");
                self.log.append(format!("Ignored request: {err}"));
                false
            }
        }
    }

    // ── dialogs ──

    /// Open a dialog of `kind`, replacing an open one of the same kind.
    ///
    /// Returns `None` once the session is torn down.
    pub fn open_dialog(
        &mut self,
        kind: &str,
        payload: Option<serde_json::Value>,
    ) -> Option<DialogId> {
        if self.torn_down {
            return None;
        }
        Some(self.dialogs.open(kind, payload))
    }

    /// Close dialog `id`, or the topmost one. `false` when nothing matched.
    pub fn close_dialog(&mut self, id: Option<DialogId>) -> bool {
        self.dialogs.close(id)
    }

    /// Apply a cancel signal. Ignored (returns 0) when no dialog is open.
    pub fn cancel(&mut self) -> usize {
        if self.dialogs.is_empty() {
            return 0;
        }
        self.dialogs.cancel(self.cancel_policy)
    }

    // ── input ──

    /// Routing context for the current state.
    #[must_use]
    pub fn input_context(&self) -> InputContext {
        InputContext {
            view: self.views.current_view(),
            dialogs_open: !self.dialogs.is_empty(),
            cancel_policy: self.cancel_policy,
        }
    }

    /// Route a host signal. Returns whether the signal was consumed; an
    /// unconsumed signal is free for the host's own handling.
    ///
    /// Navigation while a dialog is open is consumed without effect.
    pub fn apply(&mut self, signal: InputSignal, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        let resolution = resolve_signal(signal, self.input_context());
        let Some(action) = resolution.action else {
            return resolution.consumed;
        };
        match action {
            SessionAction::CancelDialogs(policy) => {
                self.dialogs.cancel(policy);
            }
            SessionAction::CloseTopmost => {
                self.dialogs.close(None);
            }
            SessionAction::Navigate(view) => {
                self.navigate(view);
            }
            SessionAction::ToggleRefresh => {
                self.toggle_refresh(now);
            }
            SessionAction::RefreshNow => self.refresh_now(),
        }
        resolution.consumed
    }

    // ── refresh ──

    /// Advance the session clock. Runs at most one refresh pass per call;
    /// extra elapsed intervals are counted as missed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        let due = self.timer.poll(now);
        if due == 0 {
            return false;
        }
        self.counters.missed_ticks += u64::from(due - 1);
        self.refresh_now();
        true
    }

    /// Sample the stats source, narrate the result and re-render.
    ///
    /// Source failures are narrated and counted; they never escape. Both
    /// outcomes re-render so the host re-polls the log.
    pub fn refresh_now(&mut self) {
        if self.torn_down {
            return;
        }
        match self.source.sample() {
            Ok(snapshot) => {
                self.log
                    .append(format!("Stats refreshed: {}", snapshot.summary()));
                self.latest = Some(snapshot);
                self.counters.refreshes += 1;
                self.views.rerender();
            }
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "stats refresh failed");
                self.log.append(format!("Refresh failed: {err}"));
                self.counters.refresh_failures += 1;
                self.views.rerender();
            }
        }
    }

    /// Suspend auto refresh. Returns `true` if it was running.
    pub fn pause_refresh(&mut self) -> bool {
        let paused = self.timer.pause();
        if paused {
            tracing::info!("auto refresh paused");
        }
        paused
    }

    /// Resume auto refresh; the next pass is one interval after `now`.
    pub fn resume_refresh(&mut self, now: Instant) -> bool {
        let resumed = self.timer.resume(now);
        if resumed {
            tracing::info!("auto refresh resumed");
        }
        resumed
    }

    /// Flip auto refresh. Returns whether it is now running.
    pub fn toggle_refresh(&mut self, now: Instant) -> bool {
        let running = self.timer.toggle(now);
        tracing::info!(running, "auto refresh toggled");
        running
    }

    // ── log ──

    /// Append operator narration to the activity log.
    pub fn narrate(&mut self, message: impl Into<String>) {
        if self.torn_down {
            return;
        }
        self.log.append(message);
    }

    /// Empty the activity log (the settings "clear records" action).
    pub fn clear_log(&mut self) {
        if self.torn_down {
            return;
        }
        self.log.clear();
        tracing::info!("activity log cleared");
    }

    /// Log entries formatted as `[time] message`, newest first.
    #[must_use]
    pub fn log_lines(&self) -> Vec<String> {
        self.log
            .entries()
            .map(|e| format!("[{}] {}", e.display_time(&self.time_format), e.message))
            .collect()
    }

    // ── lifecycle ──

    /// Stop the refresh timer and close every dialog.
    ///
    /// Returns `true` only the first time; later calls do nothing.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.timer.stop();
        let closed = self.dialogs.close_all();
        tracing::info!(closed_dialogs = closed, "dashboard session torn down");
        true
    }

    /// Whether [`DashboardSession::teardown`] has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ── accessors ──

    /// Visible view.
    #[must_use]
    pub const fn current_view(&self) -> View {
        self.views.current_view()
    }

    /// Active tab of a tabbed view.
    #[must_use]
    pub const fn current_tab(&self) -> Option<&'static str> {
        self.views.current_tab()
    }

    /// Open dialogs.
    #[must_use]
    pub const fn dialogs(&self) -> &DialogStack {
        &self.dialogs
    }

    /// Activity log.
    #[must_use]
    pub const fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Refresh timer state.
    #[must_use]
    pub const fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    /// Result of the last successful refresh.
    #[must_use]
    pub const fn latest_stats(&self) -> Option<&StatsSnapshot> {
        self.latest.as_ref()
    }

    /// Refresh bookkeeping.
    #[must_use]
    pub const fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Copy of the whole session state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            view: self.views.current_view(),
            tab: self.views.current_tab().map(str::to_string),
            dialogs: self.dialogs.iter().cloned().collect(),
            log: self.log.to_vec(),
            refresh: self.timer.state(),
            refresh_interval_ms: u64::try_from(self.timer.interval().as_millis())
                .unwrap_or(u64::MAX),
            stats: self.latest.clone(),
            counters: self.counters,
        }
    }

    /// [`DashboardSession::snapshot`] serialised as JSON.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
