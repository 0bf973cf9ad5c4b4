//! The normalized player state: the aggregate every engine component
//! operates on.
//!
//! [`GameState`] is owned exclusively by one player and mutated only through
//! the engine's components (accrual, timer lifecycle, gacha, actions). It is
//! *not* the wire format -- snapshots cross the persistence boundary through
//! [`crate::snapshot`], which normalizes legacy shapes before any engine
//! code sees them. Internal logic only ever sees this module's types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BuildingKind, CaptainRole, Rarity, Resource, ShipKind};
use crate::ids::{BuildingId, CaptainId, CrewId, ShipId, TechnologyId};
use crate::ledger::ResourceLedger;

/// Default epic pity threshold (guaranteed epic on the Nth pull).
pub const DEFAULT_GUARANTEED_EPIC_AT: u32 = 50;

/// Default legendary pity threshold (guaranteed legendary on the Nth pull).
pub const DEFAULT_GUARANTEED_LEGENDARY_AT: u32 = 100;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A building placed on the island grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Unique identifier (stable across snapshots).
    pub id: BuildingId,
    /// The building's content kind.
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    /// Current level. Zero means initial construction has not completed;
    /// upgrades hold the post-upgrade level while constructing.
    pub level: u32,
    /// Grid column.
    pub x: i32,
    /// Grid row.
    pub y: i32,
    /// Whether a construction or upgrade is in flight.
    #[serde(rename = "isConstructing", default)]
    pub constructing: bool,
}

impl Building {
    /// Whether this building currently contributes passive production.
    ///
    /// Constructing buildings and level-0 buildings (initial construction
    /// pending) produce nothing.
    pub const fn produces(&self) -> bool {
        !self.constructing && self.level >= 1
    }
}

/// A ship in the player's fleet.
///
/// Stats are snapshotted at launch time and already include every buff
/// active at that moment; later buff changes never retroactively adjust a
/// launched ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Unique identifier, derived deterministically at launch.
    pub id: ShipId,
    /// The ship's content kind.
    #[serde(rename = "type")]
    pub kind: ShipKind,
    /// Current hull points.
    pub hp: u32,
    /// Maximum hull points.
    pub max_hp: u32,
    /// Attack rating.
    pub attack: u32,
    /// Defense rating.
    pub defense: u32,
    /// Speed rating.
    pub speed: u32,
}

/// A collectible captain the player owns.
///
/// Created on the first non-duplicate draw; duplicate draws add experience
/// to this record instead of creating a second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct OwnedCaptain {
    /// Content roster key.
    pub id: CaptainId,
    /// Rarity tier at acquisition.
    pub rarity: Rarity,
    /// Specialization role.
    pub role: CaptainRole,
    /// Current level (scales the captain's buff contribution).
    #[serde(default = "default_captain_level")]
    pub level: u32,
    /// Accumulated experience.
    #[serde(default)]
    pub xp: u64,
    /// Unix-millisecond timestamp of acquisition.
    #[serde(default)]
    pub obtained_at: i64,
}

const fn default_captain_level() -> u32 {
    1
}

/// A specialized crew member hired at the tavern.
///
/// Carried in the aggregate and snapshot; no engine behavior attaches to
/// crew beyond bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    /// Unique identifier.
    pub id: CrewId,
    /// Crew specialty (free-form content key).
    pub role: String,
    /// Unix-millisecond timestamp of hire.
    #[serde(default)]
    pub hired_at: i64,
}

/// A researched technology at a specific level.
///
/// Legacy snapshots stored bare ID strings meaning level 1; the snapshot
/// boundary normalizes those, so this record form is the only shape engine
/// code handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct TechnologyRecord {
    /// Content tree key.
    pub id: TechnologyId,
    /// Researched level (1-based).
    #[serde(default = "default_tech_level")]
    pub level: u32,
}

const fn default_tech_level() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

/// A pending timed action (construction, shipbuilding, or research).
///
/// The remaining duration is always derived from `end_time` and the
/// caller's `now`; it is never trusted from storage. Timers are created by
/// actions, resolved by the timer lifecycle manager once `end_time <= now`,
/// and deleted upon resolution -- so observing an expired timer twice
/// resolves it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// Unix-millisecond timestamp the action started.
    pub start_time: i64,
    /// Unix-millisecond timestamp the action completes.
    pub end_time: i64,
    /// Set on ship timers the client already surfaced; completed timers are
    /// never reprocessed.
    pub completed: bool,
}

impl Timer {
    /// Create a running timer for the given window.
    pub const fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
            completed: false,
        }
    }

    /// Milliseconds until completion, clamped to zero for expired timers.
    pub const fn remaining(&self, now: i64) -> i64 {
        let left = self.end_time.saturating_sub(now);
        if left < 0 { 0 } else { left }
    }

    /// Whether the timer has reached its end time.
    pub const fn is_due(&self, now: i64) -> bool {
        self.end_time <= now
    }
}

// ---------------------------------------------------------------------------
// Gacha pity
// ---------------------------------------------------------------------------

/// Dual pity counters for the captain recruitment draw.
///
/// `epic_pulls` / `legendary_pulls` count pulls since that rarity (or
/// higher) was last obtained. Each resets to zero exactly when its rarity
/// is drawn; a legendary draw resets both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct PityState {
    /// Pulls since the last epic (or legendary).
    pub epic_pulls: u32,
    /// Pulls since the last legendary.
    pub legendary_pulls: u32,
    /// Pull count at which an epic is guaranteed.
    pub guaranteed_epic_at: u32,
    /// Pull count at which a legendary is guaranteed.
    pub guaranteed_legendary_at: u32,
}

impl Default for PityState {
    fn default() -> Self {
        Self {
            epic_pulls: 0,
            legendary_pulls: 0,
            guaranteed_epic_at: DEFAULT_GUARANTEED_EPIC_AT,
            guaranteed_legendary_at: DEFAULT_GUARANTEED_LEGENDARY_AT,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate root
// ---------------------------------------------------------------------------

/// The full progression state of one player's island.
///
/// Ship and research timers are keyed by strings (`building_<ship_kind>`,
/// `<tech_id>_<level>`) because stale keys referencing content that no
/// longer exists must survive load and resolve as no-ops -- a typed key
/// would reject them at the boundary instead.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Resource balances.
    pub resources: ResourceLedger,
    /// Buildings on the island grid.
    pub buildings: Vec<Building>,
    /// The player's fleet.
    pub ships: Vec<Ship>,
    /// Collected captains.
    pub captains: Vec<OwnedCaptain>,
    /// Specialized crew members.
    pub crew: Vec<CrewMember>,
    /// Researched technologies (normalized record form).
    pub researched_technologies: Vec<TechnologyRecord>,
    /// Research timers keyed by `<tech_id>_<level>`.
    pub technology_timers: BTreeMap<String, Timer>,
    /// Construction timers keyed by building ID.
    pub building_timers: BTreeMap<BuildingId, Timer>,
    /// Shipbuilding timers keyed by `building_<ship_kind>`.
    pub ship_timers: BTreeMap<String, Timer>,
    /// Recruitment pity counters.
    pub gacha_pity: PityState,
    /// Unix-millisecond timestamp of the last reconciliation.
    pub last_update: i64,
    /// Snapshot schema version (see [`crate::snapshot::SNAPSHOT_VERSION`]).
    pub version: u32,
}

impl GameState {
    /// Create the starting state for a fresh island at time `now`.
    ///
    /// New players begin with a level-1 town hall and a small stockpile of
    /// every basic resource plus a premium-currency starting bonus.
    pub fn new_island(now: i64) -> Self {
        let resources: ResourceLedger = [
            (Resource::Gold, 1000),
            (Resource::Wood, 500),
            (Resource::Rum, 100),
            (Resource::Stone, 200),
            (Resource::Food, 50),
            (Resource::Crew, 20),
            (Resource::Diamonds, 100),
        ]
        .into_iter()
        .collect();

        Self {
            resources,
            buildings: vec![Building {
                id: BuildingId::new("town_hall_1"),
                kind: BuildingKind::TownHall,
                level: 1,
                x: 5,
                y: 2,
                constructing: false,
            }],
            ships: Vec::new(),
            captains: Vec::new(),
            crew: Vec::new(),
            researched_technologies: Vec::new(),
            technology_timers: BTreeMap::new(),
            building_timers: BTreeMap::new(),
            ship_timers: BTreeMap::new(),
            gacha_pity: PityState::default(),
            last_update: now,
            version: crate::snapshot::SNAPSHOT_VERSION,
        }
    }

    /// Look up a building by ID.
    pub fn building(&self, id: &BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == *id)
    }

    /// Look up a building by ID, mutably.
    pub fn building_mut(&mut self, id: &BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == *id)
    }

    /// Whether any building of the given kind exists (at any level).
    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.buildings.iter().any(|b| b.kind == kind)
    }

    /// The highest level among buildings of the given kind (zero if none).
    pub fn building_level(&self, kind: BuildingKind) -> u32 {
        self.buildings
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.level)
            .max()
            .unwrap_or(0)
    }

    /// The building currently under construction, if any.
    ///
    /// At most one construction is in flight at a time; the actions that
    /// start construction enforce this, not the engine.
    pub fn constructing_building(&self) -> Option<&Building> {
        self.buildings.iter().find(|b| b.constructing)
    }

    /// Researched level of a technology (zero when not researched).
    pub fn technology_level(&self, id: &TechnologyId) -> u32 {
        self.researched_technologies
            .iter()
            .find(|t| t.id == *id)
            .map_or(0, |t| t.level)
    }

    /// Look up an owned captain by roster key.
    pub fn captain(&self, id: &CaptainId) -> Option<&OwnedCaptain> {
        self.captains.iter().find(|c| c.id == *id)
    }

    /// Look up an owned captain by roster key, mutably.
    pub fn captain_mut(&mut self, id: &CaptainId) -> Option<&mut OwnedCaptain> {
        self.captains.iter_mut().find(|c| c.id == *id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_island_starts_with_town_hall() {
        let state = GameState::new_island(1_000);
        assert_eq!(state.buildings.len(), 1);
        let town_hall = state.buildings.first().unwrap();
        assert_eq!(town_hall.kind, BuildingKind::TownHall);
        assert_eq!(town_hall.level, 1);
        assert!(!town_hall.constructing);
        assert_eq!(state.last_update, 1_000);
    }

    #[test]
    fn new_island_starting_resources() {
        let state = GameState::new_island(0);
        assert_eq!(state.resources.amount(Resource::Gold), 1000);
        assert_eq!(state.resources.amount(Resource::Diamonds), 100);
        assert_eq!(state.resources.amount(Resource::Cannons), 0);
    }

    #[test]
    fn timer_remaining_clamps_to_zero() {
        let timer = Timer::new(0, 5_000);
        assert_eq!(timer.remaining(1_000), 4_000);
        assert_eq!(timer.remaining(9_000), 0);
        assert!(!timer.is_due(4_999));
        assert!(timer.is_due(5_000));
        assert!(timer.is_due(5_001));
    }

    #[test]
    fn technology_level_defaults_to_zero() {
        let mut state = GameState::new_island(0);
        let id = TechnologyId::from("advanced_mining");
        assert_eq!(state.technology_level(&id), 0);

        state.researched_technologies.push(TechnologyRecord {
            id: id.clone(),
            level: 3,
        });
        assert_eq!(state.technology_level(&id), 3);
    }

    #[test]
    fn building_produces_only_when_built() {
        let mut b = Building {
            id: BuildingId::new("gold_mine_1"),
            kind: BuildingKind::GoldMine,
            level: 1,
            x: 0,
            y: 0,
            constructing: false,
        };
        assert!(b.produces());
        b.constructing = true;
        assert!(!b.produces());
        b.constructing = false;
        b.level = 0;
        assert!(!b.produces());
    }

    #[test]
    fn default_pity_thresholds() {
        let pity = PityState::default();
        assert_eq!(pity.guaranteed_epic_at, 50);
        assert_eq!(pity.guaranteed_legendary_at, 100);
        assert_eq!(pity.epic_pulls, 0);
        assert_eq!(pity.legendary_pulls, 0);
    }
}
