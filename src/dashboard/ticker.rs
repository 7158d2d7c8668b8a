//! Background ticker that paces the dashboard event loop.
//!
//! A dedicated thread emits `Instant` ticks over a bounded crossbeam channel.
//! The UI loop drains the channel and forwards each tick to the session, whose
//! [`RefreshTimer`](super::timer::RefreshTimer) decides whether a refresh is
//! due. Ticks are dropped rather than queued when the loop falls behind.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use parking_lot::Mutex;

use crate::core::errors::{Result, SpmError};

/// Ticks buffered before the ticker starts dropping.
const TICK_BUFFER: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Default)]
struct TickerStats {
    emitted: u64,
    dropped: u64,
}

/// Handle owning the ticker thread.
///
/// Dropping the handle stops the thread.
#[derive(Debug)]
pub struct Ticker {
    ticks: Receiver<Instant>,
    control: Sender<Control>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<TickerStats>>,
}

impl Ticker {
    /// Spawn a ticker that emits every `period`.
    pub fn spawn(period: Duration) -> Result<Self> {
        let period = period.max(Duration::from_millis(1));
        let (tick_tx, tick_rx) = bounded::<Instant>(TICK_BUFFER);
        let (control_tx, control_rx) = bounded::<Control>(8);
        let stats = Arc::new(Mutex::new(TickerStats::default()));
        let thread_stats = Arc::clone(&stats);

        let join = thread::Builder::new()
            .name("spm-ticker".to_string())
            .spawn(move || ticker_thread_main(period, &tick_tx, &control_rx, &thread_stats))
            .map_err(|e| SpmError::Runtime {
                details: format!("failed to spawn ticker thread: {e}"),
            })?;

        tracing::debug!(period_ms = period.as_millis(), "ticker started");
        Ok(Self {
            ticks: tick_rx,
            control: control_tx,
            join: Some(join),
            stats,
        })
    }

    /// Receiver the UI loop drains.
    #[must_use]
    pub const fn ticks(&self) -> &Receiver<Instant> {
        &self.ticks
    }

    /// Block until the next tick.
    pub fn recv(&self) -> Result<Instant> {
        self.ticks.recv().map_err(|_| SpmError::ChannelClosed {
            component: "ticker",
        })
    }

    /// Stop emitting ticks until [`Ticker::resume`].
    pub fn pause(&self) {
        let _ = self.control.send(Control::Pause);
    }

    /// Restart emitting after [`Ticker::pause`].
    pub fn resume(&self) {
        let _ = self.control.send(Control::Resume);
    }

    /// Stop the thread and join it. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        let Some(join) = self.join.take() else {
            return false;
        };
        let _ = self.control.send(Control::Stop);
        if join.join().is_err() {
            tracing::warn!("ticker thread panicked during shutdown");
        }
        let stats = self.stats.lock();
        tracing::debug!(emitted = stats.emitted, dropped = stats.dropped, "ticker stopped");
        true
    }

    /// Whether the thread has not been stopped yet.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.join.is_some()
    }

    /// Ticks delivered to the channel so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.stats.lock().emitted
    }

    /// Ticks discarded because the loop was not draining the channel.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.stats.lock().dropped
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn ticker_thread_main(
    period: Duration,
    ticks: &Sender<Instant>,
    control: &Receiver<Control>,
    stats: &Mutex<TickerStats>,
) {
    let mut paused = false;
    let mut next = Instant::now() + period;

    loop {
        let wait = if paused {
            // Nothing to emit; block until a control message arrives.
            match control.recv() {
                Ok(msg) => Some(msg),
                Err(_) => return,
            }
        } else {
            match control.recv_timeout(next.saturating_duration_since(Instant::now())) {
                Ok(msg) => Some(msg),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        };

        match wait {
            Some(Control::Stop) => return,
            Some(Control::Pause) => paused = true,
            Some(Control::Resume) => {
                if paused {
                    paused = false;
                    next = Instant::now() + period;
                }
            }
            None => {
                let now = Instant::now();
                match ticks.try_send(now) {
                    Ok(()) => stats.lock().emitted += 1,
                    Err(TrySendError::Full(_)) => stats.lock().dropped += 1,
                    Err(TrySendError::Disconnected(_)) => return,
                }
                next += period;
                if next < now {
                    next = now + period;
                }
            }
        }
    }
}
