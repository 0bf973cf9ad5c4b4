//! Resource accrual: per-tick building production applied for a batch of
//! elapsed ticks.
//!
//! The engine is a floor-per-tick accumulator: each building's per-tick
//! output is computed as an integer (base production at its level, then
//! the technology bonus, then the captain bonus, each floored), and that
//! integer is credited once per elapsed tick. Flooring happens *before*
//! multiplying by the tick count, so one large catch-up credits exactly
//! what many small ones would.

use std::collections::BTreeMap;

use tracing::debug;
use windward_content::production_for_level;
use windward_types::{GameState, Resource};

use crate::buffs::{boosted_production, BuffSummary};

/// Apply `ticks` worth of production to the ledger.
///
/// Buildings that are constructing (including level-0 buildings whose
/// initial construction has not finished) contribute nothing. Returns the
/// total amounts credited, for reporting.
pub fn accrue(
    state: &mut GameState,
    ticks: u64,
    buffs: &BuffSummary,
) -> BTreeMap<Resource, u64> {
    let mut produced: BTreeMap<Resource, u64> = BTreeMap::new();
    if ticks == 0 {
        return produced;
    }

    for building in &state.buildings {
        if !building.produces() {
            continue;
        }

        for (resource, base) in production_for_level(building.kind, building.level) {
            let per_tick = boosted_production(base, building.kind, buffs);
            if per_tick == 0 {
                continue;
            }
            let total = per_tick.saturating_mul(ticks);
            let entry = produced.entry(resource).or_insert(0);
            *entry = entry.saturating_add(total);
            debug!(
                building = %building.id,
                ?resource,
                per_tick,
                ticks,
                "Accrued production"
            );
        }
    }

    state.resources.credit_all(&produced);
    produced
}
