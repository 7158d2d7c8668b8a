//! Property-based tests for dashboard state invariants.
//!
//! Uses `proptest` to drive arbitrary sequences of view switches, dialog
//! operations, log appends and timer controls, checking after every step that
//! the state stays consistent.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::activity::ActivityLog;
use super::controller::ViewController;
use super::dialogs::{DialogId, DialogStack};
use super::timer::RefreshTimer;
use super::view::{ALL_VIEWS, View};

// ──────────────────── strategies ────────────────────

fn arb_view() -> impl Strategy<Value = View> {
    (1u8..=7).prop_map(|n| View::from_number(n).unwrap())
}

fn arb_view_request() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_view().prop_map(|v| v.id().to_string()),
        Just("history".to_string()),
        Just(String::new()),
        "[a-z]{1,10}",
    ]
}

#[derive(Debug, Clone)]
enum DialogOp {
    Open(&'static str),
    CloseTop,
    CloseNth(usize),
    CloseStale(u64),
    CloseAll,
}

fn arb_dialog_op() -> impl Strategy<Value = DialogOp> {
    prop_oneof![
        4 => prop_oneof![
            Just("persona-mixing"),
            Just("technique-detail"),
            Just("export"),
            Just("confirm-reset"),
        ]
        .prop_map(DialogOp::Open),
        2 => Just(DialogOp::CloseTop),
        2 => (0usize..6).prop_map(DialogOp::CloseNth),
        1 => (0u64..64).prop_map(DialogOp::CloseStale),
        1 => Just(DialogOp::CloseAll),
    ]
}

#[derive(Debug, Clone, Copy)]
enum TimerOp {
    Advance(u64),
    Pause,
    Resume,
    Toggle,
}

fn arb_timer_op() -> impl Strategy<Value = TimerOp> {
    prop_oneof![
        4 => (0u64..12_000).prop_map(TimerOp::Advance),
        1 => Just(TimerOp::Pause),
        1 => Just(TimerOp::Resume),
        1 => Just(TimerOp::Toggle),
    ]
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn current_view_tracks_last_accepted(requests in prop::collection::vec(arb_view_request(), 0..40)) {
        let renders = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&renders);
        let mut controller = ViewController::new(move |_: View, _: Option<&str>| {
            counter.set(counter.get() + 1);
        });

        let mut expected = View::Overview;
        let mut accepted = 0usize;
        for request in &requests {
            match controller.switch_view_named(request) {
                Ok(view) => {
                    expected = view;
                    accepted += 1;
                    prop_assert_eq!(controller.current_tab(), view.default_tab());
                }
                Err(err) => prop_assert_eq!(err.code(), "SPM-2001"),
            }
            prop_assert_eq!(controller.current_view(), expected);
            prop_assert_eq!(renders.get(), accepted);
        }
    }

    #[test]
    fn tab_is_always_registered_for_current_view(
        steps in prop::collection::vec((arb_view(), "[a-z]{0,12}"), 0..30)
    ) {
        let mut controller = ViewController::new(|_: View, _: Option<&str>| {});
        for (view, tab) in &steps {
            controller.switch_view(*view);
            let _ = controller.switch_tab(tab);
            let current = controller.current_view();
            match controller.current_tab() {
                Some(t) => prop_assert!(current.tabs().contains(&t)),
                None => prop_assert!(current.tabs().is_empty()),
            }
        }
    }

    #[test]
    fn log_is_bounded_and_newest_first(
        capacity in 1usize..16,
        messages in prop::collection::vec(".{0,8}", 0..50)
    ) {
        let mut log = ActivityLog::new(capacity);
        for (i, msg) in messages.iter().enumerate() {
            log.append(msg.clone());
            prop_assert!(log.len() <= capacity);
            prop_assert_eq!(log.len(), (i + 1).min(capacity));
            prop_assert_eq!(&log.latest().unwrap().message, msg);
        }

        let kept: Vec<&String> = log.entries().map(|e| &e.message).collect();
        let expected: Vec<&String> = messages.iter().rev().take(capacity).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn dialog_stack_stays_consistent(ops in prop::collection::vec(arb_dialog_op(), 0..60)) {
        let mut stack = DialogStack::default();
        let mut issued: Vec<DialogId> = Vec::new();

        for op in &ops {
            let before = stack.len();
            match op {
                DialogOp::Open(kind) => {
                    let was_open = stack.is_open(kind);
                    let id = stack.open(kind, None);
                    prop_assert!(!issued.contains(&id), "id reused: {id}");
                    issued.push(id);
                    prop_assert_eq!(stack.topmost().map(|d| d.id), Some(id));
                    prop_assert_eq!(stack.len(), if was_open { before } else { before + 1 });
                }
                DialogOp::CloseTop => {
                    let top = stack.topmost().map(|d| d.id);
                    prop_assert_eq!(stack.close(None), top.is_some());
                    prop_assert_eq!(stack.len(), before.saturating_sub(1));
                    if let Some(top) = top {
                        prop_assert!(stack.get(top).is_none());
                    }
                }
                DialogOp::CloseNth(n) => {
                    let target = stack.iter().nth(*n).map(|d| d.id);
                    if let Some(id) = target {
                        prop_assert!(stack.close(Some(id)));
                        prop_assert_eq!(stack.len(), before - 1);
                    }
                }
                DialogOp::CloseStale(n) => {
                    if let Some(&id) = issued.get(usize::try_from(*n).unwrap_or(usize::MAX)) {
                        let was_open = stack.get(id).is_some();
                        prop_assert_eq!(stack.close(Some(id)), was_open);
                    }
                }
                DialogOp::CloseAll => {
                    prop_assert_eq!(stack.close_all(), before);
                    prop_assert!(stack.is_empty());
                }
            }

            // At most one dialog per kind, ids unique and increasing bottom to top.
            let kinds: HashSet<&str> = stack.iter().map(|d| d.kind.as_str()).collect();
            prop_assert_eq!(kinds.len(), stack.len());
            let ids: Vec<DialogId> = stack.iter().map(|d| d.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn paused_timer_never_fires(ops in prop::collection::vec(arb_timer_op(), 0..40)) {
        let interval = Duration::from_millis(5_000);
        let t0 = Instant::now();
        let mut now = t0;
        let mut timer = RefreshTimer::new(interval);
        timer.start(now);

        for op in ops {
            match op {
                TimerOp::Advance(ms) => {
                    now += Duration::from_millis(ms);
                    let running = timer.is_running();
                    let fired = timer.poll(now);
                    if !running {
                        prop_assert_eq!(fired, 0);
                    }
                    if let Some(next) = timer.next_due() {
                        prop_assert!(next > now);
                    }
                }
                TimerOp::Pause => { timer.pause(); }
                TimerOp::Resume => { timer.resume(now); }
                TimerOp::Toggle => { timer.toggle(now); }
            }
        }
    }
}

#[test]
fn every_view_is_reachable_by_swipe() {
    let mut seen = HashSet::new();
    let mut view = View::Overview;
    for _ in 0..ALL_VIEWS.len() {
        seen.insert(view);
        view = view.next();
    }
    assert_eq!(seen.len(), ALL_VIEWS.len());
}
