//! Integration tests for the polling cadence.
//!
//! Uses `start_paused = true` so tokio's clock only moves when the runtime
//! is idle (auto-advance) or when a test calls `tokio::time::advance`.

use std::time::Duration;

use mazebeam_tick::{Cadence, MIN_INTERVAL};
use tokio::time::Instant;

// =========================================================================
// Construction
// =========================================================================

#[tokio::test]
async fn test_new_cadence_initial_state() {
    let c = Cadence::new(Duration::from_millis(500));
    assert_eq!(c.tick_count(), 0);
    assert_eq!(c.interval(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_is_clamped() {
    let c = Cadence::new(Duration::ZERO);
    assert_eq!(c.interval(), MIN_INTERVAL);
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_fires_after_one_interval() {
    let start = Instant::now();
    let mut c = Cadence::new(Duration::from_millis(500));

    let info = c.wait().await;
    assert_eq!(info.tick, 1);
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_ticks_increment_monotonically() {
    let mut c = Cadence::new(Duration::from_millis(100));
    for expected in 1..=5 {
        assert_eq!(c.wait().await.tick, expected);
    }
    assert_eq!(c.tick_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_wait_does_not_fire_early() {
    let mut c = Cadence::new(Duration::from_secs(1));
    let result = tokio::time::timeout(Duration::from_millis(900), c.wait()).await;
    assert!(result.is_err(), "tick should not fire before its interval");
    assert_eq!(c.tick_count(), 0);

    // The cancelled wait left the schedule alone.
    let info = c.wait().await;
    assert_eq!(info.tick, 1);
}

// =========================================================================
// Overrun handling
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_overrun_skips_missed_ticks() {
    let mut c = Cadence::new(Duration::from_millis(100));
    c.wait().await;

    // A slow iteration that ends 350ms past the next deadline.
    tokio::time::advance(Duration::from_millis(450)).await;

    let info = c.wait().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 3);

    // Schedule resumes from now: the next tick is a full interval away.
    let before = Instant::now();
    c.wait().await;
    assert_eq!(before.elapsed(), Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_reset_avoids_overrun_after_intentional_hold() {
    let mut c = Cadence::new(Duration::from_millis(100));
    c.wait().await;

    tokio::time::advance(Duration::from_secs(7)).await;
    c.reset();

    let info = c.wait().await;
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
}

// =========================================================================
// select! loop pattern (mirrors the engine and supervisor loops)
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_select_loop_pattern() {
    let mut c = Cadence::new(Duration::from_millis(50));
    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(10);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(160)).await;
        tx.send("stop").await.ok();
    });

    let mut ticks_fired = 0u64;
    loop {
        tokio::select! {
            Some(cmd) = rx.recv() => {
                assert_eq!(cmd, "stop");
                break;
            }
            info = c.wait() => {
                ticks_fired += 1;
                assert_eq!(info.tick, ticks_fired);
            }
        }
    }

    assert_eq!(ticks_fired, 3);
}
