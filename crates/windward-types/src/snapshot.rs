//! The serialized snapshot boundary.
//!
//! [`GameStateSnapshot`] mirrors the JSON wire format exactly, including
//! every legacy shape older saves may present:
//!
//! - `researchedTechnologies` entries as bare ID strings (meaning level 1)
//!   or as `{ id, level }` records;
//! - `technologyTimers` keys without a level suffix (meaning level 1);
//! - timers missing `endTime` but carrying `startTime` + `remaining`
//!   (reconstructible) or missing both (dropped);
//! - `gachaPity` with only the legacy single `pulls` counter, or with
//!   zero/absent thresholds.
//!
//! Decoding normalizes all of these so engine code only ever sees the
//! record forms in [`crate::state`]. Unknown building/ship/resource kinds
//! inside typed fields fail the decode outright -- content keys are closed
//! enums, rejected at load time rather than at lookup time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::BuildingId;
use crate::ledger::ResourceLedger;
use crate::state::{
    Building, CrewMember, GameState, OwnedCaptain, PityState, Ship, TechnologyRecord, Timer,
    DEFAULT_GUARANTEED_EPIC_AT, DEFAULT_GUARANTEED_LEGENDARY_AT,
};

/// Current snapshot schema version.
///
/// Version 4 introduced technology levels; decoding upgrades older
/// snapshots to this version after normalization.
pub const SNAPSHOT_VERSION: u32 = 4;

/// Errors that can occur at the snapshot boundary.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot JSON could not be parsed (malformed JSON, or an unknown
    /// building/ship/resource kind in a typed field).
    #[error("snapshot decode failed: {source}")]
    Decode {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The state could not be serialized.
    #[error("snapshot encode failed: {source}")]
    Encode {
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// A researched-technology entry as it appears on the wire.
///
/// Legacy snapshots stored bare ID strings; current snapshots store
/// `{ id, level }` records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(untagged)]
pub enum TechEntry {
    /// Current record form.
    Record(TechnologyRecord),
    /// Legacy bare-ID form, meaning level 1.
    Legacy(String),
}

impl TechEntry {
    /// Normalize to the record form (legacy entries become level 1).
    pub fn into_record(self) -> TechnologyRecord {
        match self {
            Self::Record(record) => record,
            Self::Legacy(id) => TechnologyRecord {
                id: id.into(),
                level: 1,
            },
        }
    }
}

/// A timer as it appears on the wire.
///
/// Older saves sometimes persisted a `remaining` duration instead of an
/// `endTime`; the completion flag is only ever meaningful on ship timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    /// Unix-millisecond start timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Unix-millisecond end timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Legacy remaining-duration field (milliseconds); never trusted except
    /// to reconstruct a missing `endTime`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    /// Whether the timer was already surfaced as completed.
    #[serde(default)]
    pub completed: bool,
}

impl TimerRecord {
    /// Normalize to a [`Timer`], reconstructing a missing `endTime` from
    /// `startTime + remaining` when possible.
    ///
    /// Returns `None` for unreconstructible timers; the boundary drops
    /// those rather than letting a malformed record crash catch-up.
    pub fn normalize(self) -> Option<Timer> {
        let end_time = match self.end_time {
            Some(end) => end,
            None => {
                let start = self.start_time?;
                let remaining = self.remaining?;
                start.saturating_add(remaining)
            }
        };
        Some(Timer {
            start_time: self.start_time.unwrap_or(end_time),
            end_time,
            completed: self.completed,
        })
    }

    /// Build a wire record from a normalized [`Timer`].
    pub const fn from_timer(timer: &Timer) -> Self {
        Self {
            start_time: Some(timer.start_time),
            end_time: Some(timer.end_time),
            remaining: None,
            completed: timer.completed,
        }
    }
}

/// Pity counters as they appear on the wire.
///
/// The legacy single `pulls` counter seeds both modern counters when they
/// are absent; zero thresholds are treated as unset (old saves wrote
/// falsy placeholders there) and replaced with the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct PityRecord {
    /// Legacy combined pull counter.
    #[serde(default)]
    pub pulls: u32,
    /// Pulls since the last epic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic_pulls: Option<u32>,
    /// Pulls since the last legendary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legendary_pulls: Option<u32>,
    /// Epic guarantee threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guaranteed_epic_at: Option<u32>,
    /// Legendary guarantee threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guaranteed_legendary_at: Option<u32>,
}

impl PityRecord {
    /// Normalize to a [`PityState`], applying legacy fallbacks.
    pub fn normalize(self) -> PityState {
        let threshold = |value: Option<u32>, default: u32| match value {
            Some(n) if n > 0 => n,
            _ => default,
        };
        PityState {
            epic_pulls: self.epic_pulls.unwrap_or(self.pulls),
            legendary_pulls: self.legendary_pulls.unwrap_or(self.pulls),
            guaranteed_epic_at: threshold(self.guaranteed_epic_at, DEFAULT_GUARANTEED_EPIC_AT),
            guaranteed_legendary_at: threshold(
                self.guaranteed_legendary_at,
                DEFAULT_GUARANTEED_LEGENDARY_AT,
            ),
        }
    }

    /// Build a wire record from a normalized [`PityState`].
    ///
    /// The legacy `pulls` field mirrors the epic counter for old clients.
    pub const fn from_pity(pity: &PityState) -> Self {
        Self {
            pulls: pity.epic_pulls,
            epic_pulls: Some(pity.epic_pulls),
            legendary_pulls: Some(pity.legendary_pulls),
            guaranteed_epic_at: Some(pity.guaranteed_epic_at),
            guaranteed_legendary_at: Some(pity.guaranteed_legendary_at),
        }
    }
}

/// The nested construction/shipbuilding timer maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimerSets {
    /// Construction timers keyed by building ID.
    #[serde(default)]
    pub buildings: BTreeMap<String, TimerRecord>,
    /// Shipbuilding timers keyed by `building_<ship_kind>`.
    #[serde(default)]
    pub ships: BTreeMap<String, TimerRecord>,
}

// ---------------------------------------------------------------------------
// Snapshot root
// ---------------------------------------------------------------------------

/// The serialized snapshot of one player's state, exactly as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    /// Resource balances.
    #[serde(default)]
    pub resources: ResourceLedger,
    /// Buildings on the island grid.
    #[serde(default)]
    pub buildings: Vec<Building>,
    /// The player's fleet.
    #[serde(default)]
    pub ships: Vec<Ship>,
    /// Collected captains.
    #[serde(default)]
    pub captains: Vec<OwnedCaptain>,
    /// Specialized crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    /// Researched technologies (record or legacy bare-ID form).
    #[serde(default)]
    pub researched_technologies: Vec<TechEntry>,
    /// Research timers keyed by `<tech_id>_<level>` (legacy keys lack the
    /// level suffix).
    #[serde(default)]
    pub technology_timers: BTreeMap<String, TimerRecord>,
    /// Construction and shipbuilding timers.
    #[serde(default)]
    pub timers: TimerSets,
    /// Recruitment pity counters.
    #[serde(default)]
    pub gacha_pity: PityRecord,
    /// Unix-millisecond timestamp of the last reconciliation.
    #[serde(default)]
    pub last_update: i64,
    /// Snapshot schema version.
    #[serde(default)]
    pub version: u32,
}

impl GameStateSnapshot {
    /// Normalize this snapshot into engine-facing [`GameState`].
    ///
    /// `now` backfills a missing `lastUpdate` (fresh saves) so a brand-new
    /// snapshot does not appear to have been offline since the epoch.
    pub fn into_state(self, now: i64) -> GameState {
        let researched_technologies = self
            .researched_technologies
            .into_iter()
            .map(TechEntry::into_record)
            .collect();

        let technology_timers = self
            .technology_timers
            .into_iter()
            .filter_map(|(key, record)| {
                let timer = record.normalize()?;
                // Pre-level keys carry no suffix; those researches targeted
                // level 1.
                let key = if key.contains('_') {
                    key
                } else {
                    format!("{key}_1")
                };
                Some((key, timer))
            })
            .collect();

        let building_timers = self
            .timers
            .buildings
            .into_iter()
            .filter_map(|(key, record)| Some((BuildingId::new(key), record.normalize()?)))
            .collect();

        let ship_timers = self
            .timers
            .ships
            .into_iter()
            .filter_map(|(key, record)| Some((key, record.normalize()?)))
            .collect();

        let last_update = if self.last_update == 0 {
            now
        } else {
            self.last_update
        };

        GameState {
            resources: self.resources,
            buildings: self.buildings,
            ships: self.ships,
            captains: self.captains,
            crew: self.crew,
            researched_technologies,
            technology_timers,
            building_timers,
            ship_timers,
            gacha_pity: self.gacha_pity.normalize(),
            last_update,
            version: self.version.max(SNAPSHOT_VERSION),
        }
    }

    /// Build a snapshot from normalized state (the save path).
    pub fn from_state(state: &GameState) -> Self {
        Self {
            resources: state.resources.clone(),
            buildings: state.buildings.clone(),
            ships: state.ships.clone(),
            captains: state.captains.clone(),
            crew: state.crew.clone(),
            researched_technologies: state
                .researched_technologies
                .iter()
                .cloned()
                .map(TechEntry::Record)
                .collect(),
            technology_timers: state
                .technology_timers
                .iter()
                .map(|(key, timer)| (key.clone(), TimerRecord::from_timer(timer)))
                .collect(),
            timers: TimerSets {
                buildings: state
                    .building_timers
                    .iter()
                    .map(|(id, timer)| (id.as_str().to_owned(), TimerRecord::from_timer(timer)))
                    .collect(),
                ships: state
                    .ship_timers
                    .iter()
                    .map(|(key, timer)| (key.clone(), TimerRecord::from_timer(timer)))
                    .collect(),
            },
            gacha_pity: PityRecord::from_pity(&state.gacha_pity),
            last_update: state.last_update,
            version: state.version,
        }
    }
}

/// Decode a snapshot JSON document into normalized state.
///
/// # Errors
///
/// Returns [`SnapshotError::Decode`] for malformed JSON or unknown content
/// kinds in typed fields.
pub fn decode(json: &str, now: i64) -> Result<GameState, SnapshotError> {
    let snapshot: GameStateSnapshot =
        serde_json::from_str(json).map_err(|source| SnapshotError::Decode { source })?;
    Ok(snapshot.into_state(now))
}

/// Encode normalized state as a snapshot JSON document.
///
/// # Errors
///
/// Returns [`SnapshotError::Encode`] if serialization fails.
pub fn encode(state: &GameState) -> Result<String, SnapshotError> {
    serde_json::to_string(&GameStateSnapshot::from_state(state))
        .map_err(|source| SnapshotError::Encode { source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::enums::Resource;

    #[test]
    fn legacy_tech_entries_normalize_to_level_one() {
        let json = r#"{
            "researchedTechnologies": ["shipbuilding", {"id": "advanced_mining", "level": 3}],
            "lastUpdate": 1000,
            "version": 2
        }"#;
        let state = decode(json, 5_000).unwrap();

        assert_eq!(state.researched_technologies.len(), 2);
        assert_eq!(state.technology_level(&"shipbuilding".into()), 1);
        assert_eq!(state.technology_level(&"advanced_mining".into()), 3);
        assert_eq!(state.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn legacy_tech_timer_keys_gain_level_suffix() {
        let json = r#"{
            "technologyTimers": {
                "navigation": {"startTime": 0, "endTime": 60000},
                "combat_tactics_2": {"startTime": 0, "endTime": 90000}
            },
            "lastUpdate": 1000
        }"#;
        let state = decode(json, 5_000).unwrap();

        assert!(state.technology_timers.contains_key("navigation_1"));
        assert!(state.technology_timers.contains_key("combat_tactics_2"));
    }

    #[test]
    fn timer_without_end_time_is_reconstructed() {
        let record = TimerRecord {
            start_time: Some(10_000),
            end_time: None,
            remaining: Some(5_000),
            completed: false,
        };
        let timer = record.normalize().unwrap();
        assert_eq!(timer.end_time, 15_000);
        assert_eq!(timer.start_time, 10_000);
    }

    #[test]
    fn unreconstructible_timer_is_dropped() {
        let json = r#"{
            "timers": {
                "buildings": {
                    "gold_mine_1": {"startTime": 10000},
                    "quarry_1": {"startTime": 0, "endTime": 60000}
                },
                "ships": {}
            },
            "lastUpdate": 1000
        }"#;
        let state = decode(json, 5_000).unwrap();

        assert_eq!(state.building_timers.len(), 1);
        assert!(state
            .building_timers
            .contains_key(&BuildingId::new("quarry_1")));
    }

    #[test]
    fn legacy_pity_pulls_seed_both_counters() {
        let json = r#"{
            "gachaPity": {"pulls": 12},
            "lastUpdate": 1000
        }"#;
        let state = decode(json, 5_000).unwrap();

        assert_eq!(state.gacha_pity.epic_pulls, 12);
        assert_eq!(state.gacha_pity.legendary_pulls, 12);
        assert_eq!(state.gacha_pity.guaranteed_epic_at, 50);
        assert_eq!(state.gacha_pity.guaranteed_legendary_at, 100);
    }

    #[test]
    fn zero_pity_threshold_falls_back_to_default() {
        let record = PityRecord {
            pulls: 0,
            epic_pulls: Some(3),
            legendary_pulls: Some(3),
            guaranteed_epic_at: Some(0),
            guaranteed_legendary_at: None,
        };
        let pity = record.normalize();
        assert_eq!(pity.guaranteed_epic_at, 50);
        assert_eq!(pity.guaranteed_legendary_at, 100);
        assert_eq!(pity.epic_pulls, 3);
    }

    #[test]
    fn missing_last_update_is_backfilled_with_now() {
        let state = decode("{}", 42_000).unwrap();
        assert_eq!(state.last_update, 42_000);
    }

    #[test]
    fn completed_ship_timer_survives_round_trip() {
        let json = r#"{
            "timers": {
                "buildings": {},
                "ships": {"building_sloop": {"startTime": 0, "endTime": 60000, "completed": true}}
            },
            "lastUpdate": 1000
        }"#;
        let state = decode(json, 5_000).unwrap();
        let timer = state.ship_timers.get("building_sloop").unwrap();
        assert!(timer.completed);

        let encoded = encode(&state).unwrap();
        let state2 = decode(&encoded, 5_000).unwrap();
        assert!(state2.ship_timers.get("building_sloop").unwrap().completed);
    }

    #[test]
    fn unknown_building_kind_fails_decode() {
        let json = r#"{
            "buildings": [{"id": "x_1", "type": "wizard_tower", "level": 1, "x": 0, "y": 0}],
            "lastUpdate": 1000
        }"#;
        assert!(decode(json, 5_000).is_err());
    }

    #[test]
    fn encode_uses_wire_field_names() {
        let state = GameState::new_island(1_234);
        let json = encode(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("lastUpdate").is_some());
        assert!(value.get("gachaPity").is_some());
        assert!(value.get("researchedTechnologies").is_some());
        let building = value
            .get("buildings")
            .and_then(|b| b.get(0))
            .unwrap();
        assert_eq!(
            building.get("type").and_then(serde_json::Value::as_str),
            Some("town_hall")
        );
        assert_eq!(
            building
                .get("isConstructing")
                .and_then(serde_json::Value::as_bool),
            Some(false)
        );
        assert_eq!(
            value.get("resources").and_then(|r| r.get("gold")).and_then(serde_json::Value::as_u64),
            Some(1000)
        );
    }

    #[test]
    fn full_catchup_fixture_decodes() {
        // A realistic mid-game save: one building upgrading, a ship under
        // construction, research in flight.
        let json = r#"{
            "resources": {"gold": 2500, "wood": 800, "stone": 300, "rum": 120, "food": 60, "crew": 25, "diamonds": 40, "fragments": 5},
            "buildings": [
                {"id": "town_hall_1", "type": "town_hall", "level": 2, "x": 5, "y": 2, "isConstructing": false},
                {"id": "gold_mine_1", "type": "gold_mine", "level": 3, "x": 1, "y": 1, "isConstructing": true}
            ],
            "ships": [{"id": "ship_sloop_100", "type": "sloop", "hp": 50, "maxHp": 50, "attack": 15, "defense": 5, "speed": 10}],
            "captains": [{"id": "mary_read", "rarity": "common", "role": "economy", "level": 2, "xp": 150, "obtainedAt": 900}],
            "crew": [{"id": "crew_1", "role": "gunner", "hiredAt": 950}],
            "researchedTechnologies": [{"id": "advanced_mining", "level": 1}],
            "technologyTimers": {"navigation_1": {"startTime": 0, "endTime": 30000}},
            "timers": {
                "buildings": {"gold_mine_1": {"startTime": 0, "endTime": 45000}},
                "ships": {"building_sloop": {"startTime": 0, "endTime": 60000}}
            },
            "gachaPity": {"pulls": 4, "epicPulls": 4, "legendaryPulls": 10, "guaranteedEpicAt": 50, "guaranteedLegendaryAt": 100},
            "lastUpdate": 10000,
            "version": 4
        }"#;
        let state = decode(json, 20_000).unwrap();

        assert_eq!(state.buildings.len(), 2);
        assert_eq!(state.ships.len(), 1);
        assert_eq!(state.captains.len(), 1);
        assert_eq!(state.crew.first().map(|c| c.role.as_str()), Some("gunner"));
        assert_eq!(state.resources.amount(Resource::Gold), 2500);
        assert_eq!(state.gacha_pity.legendary_pulls, 10);
        assert_eq!(state.last_update, 10_000);
    }
}
