//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use spm_monitor::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SpmError};

// Dashboard state
pub use crate::dashboard::activity::{ActivityLog, LogEntry};
pub use crate::dashboard::controller::{RenderSink, ViewController};
pub use crate::dashboard::dialogs::{
    CancelPolicy, Dialog, DialogId, DialogSink, DialogStack, NoopDialogSink,
};
pub use crate::dashboard::view::View;

// Session and runtime
pub use crate::dashboard::input::{InputSignal, SessionAction};
pub use crate::dashboard::session::{DashboardSession, DashboardSnapshot, SessionCounters};
pub use crate::dashboard::stats::{MockStatsSource, StatsSnapshot, StatsSource};
pub use crate::dashboard::ticker::Ticker;
pub use crate::dashboard::timer::{RefreshTimer, TimerState};
