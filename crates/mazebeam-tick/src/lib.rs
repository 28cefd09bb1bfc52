//! Fixed-interval polling cadence for mazebeam.
//!
//! Every long-running loop in the installation polls: drain whatever is
//! queued, act on it, then wait for the next tick. The worst-case reaction
//! latency is one interval. [`Cadence`] is that wait, built on
//! `tokio::time::sleep_until` so tests can drive it with a paused clock
//! instead of real sleeps.
//!
//! # Integration
//!
//! ```ignore
//! let mut cadence = Cadence::new(Duration::from_millis(500));
//! loop {
//!     tokio::select! {
//!         _ = &mut shutdown => break,
//!         _ = cadence.wait() => { /* drain and process */ }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

/// Shortest interval a cadence will run at. A zero interval would turn
/// every loop into a busy spin.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// Information about one tick, returned by [`Cadence::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// `true` if the tick fired noticeably late (more than 10% of the
    /// interval), usually because the previous iteration ran long.
    pub overrun: bool,
    /// How many whole intervals were skipped to get back on schedule.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// A fixed-interval tick source.
///
/// Missed ticks are skipped rather than replayed: after an overrun the
/// next tick is scheduled one interval from *now*, so a slow iteration
/// never causes a burst of back-to-back ticks.
#[derive(Debug)]
pub struct Cadence {
    interval: Duration,
    tick_count: u64,
    next_tick: Instant,
}

impl Cadence {
    /// Creates a cadence whose first tick fires one interval from now.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval < MIN_INTERVAL {
            warn!(?interval, min = ?MIN_INTERVAL, "cadence interval too short, clamping");
            MIN_INTERVAL
        } else {
            interval
        };
        debug!(interval_ms = interval.as_secs_f64() * 1000.0, "cadence created");

        Self {
            interval,
            tick_count: 0,
            next_tick: Instant::now() + interval,
        }
    }

    /// Waits until the next tick is due.
    ///
    /// Cancel-safe: dropping the future (e.g., when another `select!`
    /// branch wins) leaves the schedule untouched.
    pub async fn wait(&mut self) -> TickInfo {
        let due = self.next_tick;
        time::sleep_until(due).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(due);
        let overrun = late_by > self.interval / 10;
        let ticks_skipped = if overrun {
            (late_by.as_nanos() / self.interval.as_nanos()) as u64
        } else {
            0
        };
        if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "cadence overrun, skipping ahead"
            );
        }

        self.next_tick = now + self.interval;
        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Restarts the schedule so the next tick is one interval from now.
    ///
    /// Use after intentionally blocking work (like a timed sound cue) so
    /// the delay isn't reported as an overrun.
    pub fn reset(&mut self) {
        self.next_tick = Instant::now() + self.interval;
    }

    /// Current tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The fixed interval between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
