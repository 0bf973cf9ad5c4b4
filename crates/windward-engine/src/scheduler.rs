//! Periodic reconcile scheduling with cancellation.
//!
//! "Real-time" progress display is a polling concern, kept apart from
//! the pure reconciliation function: a tokio interval invokes a
//! caller-supplied callback (typically a `reconcile` over shared state)
//! and stops cleanly when the watch channel flips. Clients drive their
//! optimistic predictor with this; the server reconciles per request and
//! never needs it.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Create a stop channel for [`run_scheduler`]. Send `true` to stop.
pub fn stop_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Drive `on_tick` every `tick_interval_ms` until the stop channel flips
/// to `true` (or its sender is dropped). Returns the number of ticks
/// driven.
///
/// The first invocation happens one full interval after the call, not
/// immediately -- matching a polling display loop that renders current
/// state first and catches up afterwards.
pub async fn run_scheduler<F>(
    tick_interval_ms: u64,
    mut stop: watch::Receiver<bool>,
    mut on_tick: F,
) -> u64
where
    F: FnMut(),
{
    let mut interval = tokio::time::interval(Duration::from_millis(tick_interval_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // Consume the immediate first fire so ticks start one interval out.
    interval.tick().await;

    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                on_tick();
                ticks = ticks.saturating_add(1);
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    debug!(ticks, "Scheduler stopped");
                    return ticks;
                }
            }
        }
    }
}
