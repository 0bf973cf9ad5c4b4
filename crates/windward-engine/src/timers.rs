//! Timer lifecycle: resolves pending construction, shipbuilding, and
//! research timers whose end time has passed.
//!
//! All three sub-resolvers share one contract: for every timer with
//! `end_time <= now`, mutate the owning entity and delete the timer.
//! Deletion is what makes re-observation idempotent -- a timer that
//! expired long ago resolves exactly once no matter how many passes see
//! it. A timer referencing an entity or content key that no longer
//! exists resolves as a no-op deletion, never an error: catch-up must
//! survive stale snapshots and content edits.

use tracing::{debug, warn};
use windward_content::ship_spec;
use windward_types::{
    BuildingId, GameState, Ship, ShipId, ShipKind, TechnologyId, TechnologyRecord,
};

use crate::buffs::{apply_ship_buffs, BuffSummary};

/// Prefix of every shipbuilding timer key.
const SHIP_TIMER_PREFIX: &str = "building_";

/// Resolve due construction timers. Returns the IDs of buildings whose
/// construction completed this pass.
///
/// Orphaned timers -- the building is gone, or it is no longer marked
/// constructing (the UI already resolved it) -- are dropped silently.
pub fn resolve_building_timers(state: &mut GameState, now: i64) -> Vec<BuildingId> {
    let mut completed = Vec::new();
    let keys: Vec<BuildingId> = state.building_timers.keys().cloned().collect();

    for id in keys {
        let Some(timer) = state.building_timers.get(&id).copied() else {
            continue;
        };

        let is_orphan = state
            .building(&id)
            .is_none_or(|building| !building.constructing);
        if is_orphan {
            warn!(building = %id, "Dropping orphaned construction timer");
            state.building_timers.remove(&id);
            continue;
        }

        if !timer.is_due(now) {
            continue;
        }

        if let Some(building) = state.building_mut(&id) {
            building.constructing = false;
            // Initial construction completes to level 1; upgrades already
            // hold the post-upgrade level while constructing.
            if building.level == 0 {
                building.level = 1;
            }
            debug!(building = %id, level = building.level, "Construction complete");
        }
        state.building_timers.remove(&id);
        completed.push(id);
    }

    completed
}

/// Resolve due shipbuilding timers. Returns the IDs of ships launched
/// this pass.
///
/// Ships are synthesized from base stats through the current buff
/// aggregation, with a deterministic ID derived from the timer's end
/// time so client and server reconciliations converge. Timers already
/// marked completed are never reprocessed; timers whose key names an
/// unknown ship kind are dropped as configuration gaps.
pub fn resolve_ship_timers(
    state: &mut GameState,
    now: i64,
    buffs: &BuffSummary,
) -> Vec<ShipId> {
    let mut launched = Vec::new();
    let keys: Vec<String> = state.ship_timers.keys().cloned().collect();

    for key in keys {
        let Some(timer) = state.ship_timers.get(&key).copied() else {
            continue;
        };
        if timer.completed || !timer.is_due(now) {
            continue;
        }

        let kind_key = key.strip_prefix(SHIP_TIMER_PREFIX).unwrap_or(key.as_str());
        let Some(kind) = ShipKind::from_key(kind_key) else {
            warn!(timer = %key, "Dropping ship timer for unknown ship kind");
            state.ship_timers.remove(&key);
            continue;
        };

        let spec = ship_spec(kind);
        let stats = apply_ship_buffs(spec.stats, buffs);
        let id = ShipId::new(format!("ship_{}_{}", kind.key(), timer.end_time));
        debug!(ship = %id, ?kind, "Ship launched");
        state.ships.push(Ship {
            id: id.clone(),
            kind,
            hp: stats.hp,
            max_hp: stats.max_hp,
            attack: stats.attack,
            defense: stats.defense,
            speed: stats.speed,
        });
        state.ship_timers.remove(&key);
        launched.push(id);
    }

    launched
}

/// Resolve due research timers. Returns `(technology, level)` pairs
/// completed this pass.
///
/// Timer keys encode `<tech_id>_<level>` and are split on the *last*
/// underscore so technology IDs containing underscores parse correctly.
/// First research and upgrades share one path: the record is found or
/// created, then set to the encoded level. Keys with no separator are
/// malformed and dropped.
pub fn resolve_research_timers(state: &mut GameState, now: i64) -> Vec<(TechnologyId, u32)> {
    let mut completed = Vec::new();
    let keys: Vec<String> = state.technology_timers.keys().cloned().collect();

    for key in keys {
        let Some(timer) = state.technology_timers.get(&key).copied() else {
            continue;
        };
        if timer.completed || !timer.is_due(now) {
            continue;
        }

        let Some((id_part, level_part)) = key.rsplit_once('_') else {
            warn!(timer = %key, "Dropping malformed research timer key");
            state.technology_timers.remove(&key);
            continue;
        };
        let tech_id = TechnologyId::from(id_part);
        let level: u32 = level_part.parse().unwrap_or(1);

        match state
            .researched_technologies
            .iter_mut()
            .find(|record| record.id == tech_id)
        {
            Some(record) => record.level = level,
            None => state.researched_technologies.push(TechnologyRecord {
                id: tech_id.clone(),
                level,
            }),
        }
        debug!(technology = %tech_id, level, "Research complete");
        state.technology_timers.remove(&key);
        completed.push((tech_id, level));
    }

    completed
}
