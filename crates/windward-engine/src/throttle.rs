//! Sliding-window request throttling as explicit state.
//!
//! The window table is a value, not a process-wide map: callers at the
//! HTTP boundary own a [`ThrottleState`], pass it in, and get the
//! updated state back alongside the decision. Nothing in the
//! reconciliation path depends on this module.

use std::collections::BTreeMap;

/// Throttle tuning: `max_requests` per `window_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Window length in milliseconds.
    pub window_ms: i64,
    /// Maximum requests allowed inside one window.
    pub max_requests: u32,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 100,
        }
    }
}

/// One key's active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    /// Requests counted so far.
    count: u32,
    /// When this window resets.
    reset_at: i64,
}

/// The whole throttle table (typically keyed by `method:path:ip`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThrottleState {
    windows: BTreeMap<String, Window>,
}

impl ThrottleState {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            windows: BTreeMap::new(),
        }
    }

    /// Number of live windows (including expired ones not yet swept).
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// The outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The request may proceed.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
    },
    /// The request exceeds the window's budget.
    Limited {
        /// Milliseconds until the window resets.
        retry_after_ms: i64,
    },
}

/// Count one request against `key` and decide whether it may proceed.
///
/// Expired windows restart; the updated table is returned alongside the
/// decision.
pub fn check(
    mut state: ThrottleState,
    key: &str,
    now: i64,
    policy: &ThrottlePolicy,
) -> (ThrottleState, ThrottleDecision) {
    let window = state
        .windows
        .get(key)
        .copied()
        .filter(|w| w.reset_at >= now)
        .unwrap_or(Window {
            count: 0,
            reset_at: now.saturating_add(policy.window_ms),
        });

    let window = Window {
        count: window.count.saturating_add(1),
        reset_at: window.reset_at,
    };
    state.windows.insert(key.to_owned(), window);

    let decision = if window.count > policy.max_requests {
        ThrottleDecision::Limited {
            retry_after_ms: window.reset_at.saturating_sub(now).max(0),
        }
    } else {
        ThrottleDecision::Allowed {
            remaining: policy.max_requests.saturating_sub(window.count),
        }
    };
    (state, decision)
}

/// Evict windows that reset before `now` (periodic housekeeping).
pub fn sweep(mut state: ThrottleState, now: i64) -> ThrottleState {
    state.windows.retain(|_, window| window.reset_at >= now);
    state
}
