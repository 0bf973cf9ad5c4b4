//! The state reconciler: the orchestrating entry point invoked on load
//! and save.
//!
//! `reconcile` sequences Clock -> Accrual -> Timer Lifecycle and then
//! advances `last_update` to the exact `now` it was given. It is invoked
//! independently by the client predictor (optimistic, on a local
//! interval) and by the server authority (on every load/save request);
//! given identical state and time inputs both produce identical results,
//! and the server's result wins on conflict.
//!
//! Ordering note: accrual runs against the buff aggregation and building
//! set as they were at the *start* of the window, so a building that
//! finishes construction during catch-up starts producing only on the
//! next pass -- never retroactively. That under-pays by at most one tick
//! per completed construction and is preserved deliberately: existing
//! snapshots depend on this rounding policy.

use std::collections::BTreeMap;

use tracing::info;
use windward_types::{BuildingId, GameState, Resource, ShipId, TechnologyId};

use crate::accrual::accrue;
use crate::buffs::BuffSummary;
use crate::clock::ProgressClock;
use crate::timers::{resolve_building_timers, resolve_research_timers, resolve_ship_timers};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Whole ticks applied.
    pub ticks: u64,
    /// Resources credited by accrual.
    pub produced: BTreeMap<Resource, u64>,
    /// Buildings whose construction completed.
    pub completed_buildings: Vec<BuildingId>,
    /// Ships launched.
    pub launched_ships: Vec<ShipId>,
    /// Research completed as `(technology, level)` pairs.
    pub completed_research: Vec<(TechnologyId, u32)>,
}

impl ReconcileReport {
    /// Whether this pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.ticks == 0
            && self.produced.is_empty()
            && self.completed_buildings.is_empty()
            && self.launched_ships.is_empty()
            && self.completed_research.is_empty()
    }
}

/// Recompute all progression effects for the elapsed wall-clock window.
///
/// Short-circuits -- no mutation, no timestamp advance -- when the window
/// is below the minimum progress threshold or rounds down to zero ticks;
/// that is what makes rapid repeated calls idempotent. Otherwise: accrual
/// with the current buff aggregation, then the three timer sub-resolvers
/// at `now`, then `last_update = now` (fractional leftover time is
/// discarded by design).
pub fn reconcile(state: &mut GameState, now: i64, clock: &ProgressClock) -> ReconcileReport {
    if !clock.has_progressed(state.last_update, now) {
        return ReconcileReport::default();
    }
    let ticks = clock.ticks_between(state.last_update, now);
    if ticks == 0 {
        return ReconcileReport::default();
    }

    let elapsed_secs = now.saturating_sub(state.last_update).saturating_div(1_000);
    info!(elapsed_secs, ticks, "Reconciling elapsed progress");

    let buffs = BuffSummary::aggregate(state);
    let produced = accrue(state, ticks, &buffs);
    let completed_buildings = resolve_building_timers(state, now);
    let launched_ships = resolve_ship_timers(state, now, &buffs);
    let completed_research = resolve_research_timers(state, now);

    state.last_update = now;

    let report = ReconcileReport {
        ticks,
        produced,
        completed_buildings,
        launched_ships,
        completed_research,
    };
    if !report.is_noop() {
        info!(
            ticks = report.ticks,
            buildings = report.completed_buildings.len(),
            ships = report.launched_ships.len(),
            research = report.completed_research.len(),
            "Reconciliation applied"
        );
    }
    report
}
