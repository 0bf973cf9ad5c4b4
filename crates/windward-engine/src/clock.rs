//! Elapsed-time resolution: the single time source for catch-up.
//!
//! The clock converts a stored `last_update` timestamp and the caller's
//! `now` into a whole number of production ticks. It never advances
//! `last_update` itself -- the reconciler does that, and only after
//! applying effects, always to the exact `now` used for the computation.
//! Fractional leftover time is intentionally discarded each pass; that
//! rounding-down policy is what makes rapid repeated calls idempotent.

use crate::config::EngineConfig;

/// Errors that can occur when building a clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid tick configuration (zero interval, or a value outside the
    /// millisecond-timestamp range).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Converts elapsed wall-clock time into whole production ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressClock {
    /// Milliseconds per production tick.
    tick_interval_ms: i64,
    /// Minimum elapsed milliseconds before any progress is recognized.
    min_progress_ms: i64,
}

impl ProgressClock {
    /// Create a clock with explicit tuning.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `tick_interval_ms` is zero
    /// or `min_progress_ms` is negative.
    pub fn new(tick_interval_ms: i64, min_progress_ms: i64) -> Result<Self, ClockError> {
        if tick_interval_ms < 1 {
            return Err(ClockError::InvalidConfig {
                reason: "tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if min_progress_ms < 0 {
            return Err(ClockError::InvalidConfig {
                reason: "min_progress_ms must not be negative".to_owned(),
            });
        }
        Ok(Self {
            tick_interval_ms,
            min_progress_ms,
        })
    }

    /// Create a clock from engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a zero tick interval or
    /// values that do not fit the signed millisecond range.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ClockError> {
        let interval = i64::try_from(config.tick_interval_ms).map_err(|_err| {
            ClockError::InvalidConfig {
                reason: "tick_interval_ms exceeds the millisecond range".to_owned(),
            }
        })?;
        let min_progress = i64::try_from(config.min_progress_ms).map_err(|_err| {
            ClockError::InvalidConfig {
                reason: "min_progress_ms exceeds the millisecond range".to_owned(),
            }
        })?;
        Self::new(interval, min_progress)
    }

    /// Milliseconds per production tick.
    pub const fn tick_interval_ms(&self) -> i64 {
        self.tick_interval_ms
    }

    /// Whether enough wall-clock time has passed for a reconcile pass to
    /// do anything at all. Below the minimum window the caller must
    /// short-circuit: no mutation, no timestamp advance.
    pub const fn has_progressed(&self, last_update: i64, now: i64) -> bool {
        now.saturating_sub(last_update) >= self.min_progress_ms
    }

    /// Whole ticks elapsed between `last_update` and `now`.
    ///
    /// A clock that has not moved (or moved backwards -- e.g. a client with
    /// a skewed local clock) yields zero ticks; elapsed time never goes
    /// negative.
    pub fn ticks_between(&self, last_update: i64, now: i64) -> u64 {
        let elapsed = now.saturating_sub(last_update);
        if elapsed <= 0 {
            return 0;
        }
        // tick_interval_ms >= 1 is guaranteed by the constructor.
        let ticks = elapsed.checked_div(self.tick_interval_ms).unwrap_or(0);
        u64::try_from(ticks).unwrap_or(0)
    }
}

/// Current wall-clock time in Unix milliseconds.
///
/// The engine itself is pure -- callers pass `now` explicitly -- but the
/// scheduler and server boundary need a real clock.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
