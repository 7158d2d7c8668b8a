//! Dashboard core: view/tab state, modal dialog stack, activity log and the
//! refresh clock, wired together by [`session::DashboardSession`].
//!
//! Rendering is not done here. The presentation layer plugs in through
//! [`controller::RenderSink`] and [`dialogs::DialogSink`] and polls
//! [`activity::ActivityLog`] for the log panel.

pub mod activity;
pub mod controller;
pub mod dialogs;
pub mod input;
pub mod session;
pub mod stats;
pub mod ticker;
pub mod timer;
pub mod view;

#[cfg(test)]
mod test_properties;

pub use session::{DashboardSession, DashboardSnapshot, SessionCounters};
