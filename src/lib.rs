#![forbid(unsafe_code)]

//! SPM Status Monitor core: the state machine behind the status dashboard.
//!
//! Four pieces, owned together by one [`dashboard::DashboardSession`]:
//! 1. **ViewController**: the visible view and the active tab of tabbed views
//! 2. **DialogStack**: open modal dialogs, replace-by-kind, cancel handling
//! 3. **ActivityLog**: bounded newest-first narration for the log panel
//! 4. **RefreshTimer**: pausable periodic refresh driving the stats source
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use spm_monitor::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use spm_monitor::core::config::Config;
//! use spm_monitor::dashboard::dialogs::{CancelPolicy, DialogStack};
//! ```

pub mod prelude;

pub mod core;
pub mod dashboard;
