//! Enumeration types for the Windward progression engine.
//!
//! All closed sets of content keys are modeled as enums rather than raw
//! strings: a snapshot referencing an unknown building or ship kind fails
//! at decode time, not deep inside a production lookup. The serde
//! representation matches the wire keys persisted snapshots already use
//! (`town_hall`, `gold_mine`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource kind tracked by the [`ResourceLedger`].
///
/// `Diamonds` and `Fragments` are the premium currencies spent on captain
/// recruitment; everything else is produced by buildings or earned as loot.
///
/// [`ResourceLedger`]: crate::ledger::ResourceLedger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// The universal currency.
    Gold,
    /// Construction material from lumber mills.
    Wood,
    /// Construction material from quarries.
    Stone,
    /// Trade good brewed by distilleries.
    Rum,
    /// Keeps crews fed; produced by taverns.
    Food,
    /// Crew headcount available for shipbuilding.
    Crew,
    /// Armament stock for ships.
    Cannons,
    /// Premium currency for captain recruitment.
    Diamonds,
    /// Captain summoning shards (alternative recruitment currency).
    Fragments,
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// A type of building that can be placed on the island grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// The heart of the island; unlocks the other buildings.
    TownHall,
    /// Produces gold.
    GoldMine,
    /// Produces wood.
    LumberMill,
    /// Produces stone.
    Quarry,
    /// Produces rum.
    Distillery,
    /// Attracts new crew members.
    Tavern,
    /// Builds and repairs ships; no passive production.
    Dock,
}

impl BuildingKind {
    /// Every building kind, in content-table order.
    pub const ALL: [Self; 7] = [
        Self::TownHall,
        Self::GoldMine,
        Self::LumberMill,
        Self::Quarry,
        Self::Distillery,
        Self::Tavern,
        Self::Dock,
    ];

    /// The snake_case wire key for this kind (used in IDs and timer keys).
    pub const fn key(self) -> &'static str {
        match self {
            Self::TownHall => "town_hall",
            Self::GoldMine => "gold_mine",
            Self::LumberMill => "lumber_mill",
            Self::Quarry => "quarry",
            Self::Distillery => "distillery",
            Self::Tavern => "tavern",
            Self::Dock => "dock",
        }
    }
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

/// A class of ship the dock can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ShipKind {
    /// Fast and cheap; available from the start.
    Sloop,
    /// Balanced mid-tier vessel.
    Brigantine,
    /// Slow, heavily armed warship.
    Galleon,
}

impl ShipKind {
    /// Every ship kind, in content-table order.
    pub const ALL: [Self; 3] = [Self::Sloop, Self::Brigantine, Self::Galleon];

    /// The snake_case wire key for this kind (used in timer keys).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Sloop => "sloop",
            Self::Brigantine => "brigantine",
            Self::Galleon => "galleon",
        }
    }

    /// Parse a wire key back into a ship kind.
    ///
    /// Returns `None` for unknown keys; callers treat that as a
    /// configuration gap, never an error.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "sloop" => Some(Self::Sloop),
            "brigantine" => Some(Self::Brigantine),
            "galleon" => Some(Self::Galleon),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Captains
// ---------------------------------------------------------------------------

/// Rarity tier of a collectible captain, in ascending draw-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// 70% base draw rate.
    Common,
    /// 25% base draw rate.
    Rare,
    /// 4% base draw rate; guaranteed by the epic pity counter.
    Epic,
    /// 1% base draw rate; guaranteed by the legendary pity counter.
    Legendary,
}

/// The specialization of a captain, shown in the roster UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CaptainRole {
    /// Boosts ship combat stats.
    Combat,
    /// Boosts production and build times.
    Economy,
    /// Boosts loot and mission speed.
    Exploration,
    /// Mixed defensive and utility buffs.
    Support,
    /// Trade-focused buffs.
    Commerce,
}

// ---------------------------------------------------------------------------
// Technology
// ---------------------------------------------------------------------------

/// The research branch a technology belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum TechBranch {
    /// Production and construction technologies.
    Economy,
    /// Ship combat technologies.
    Military,
    /// Navigation and loot technologies.
    Exploration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_kind_serializes_to_wire_key() {
        for kind in BuildingKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }

    #[test]
    fn unknown_building_kind_is_rejected() {
        let parsed: Result<BuildingKind, _> = serde_json::from_str("\"wizard_tower\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn ship_kind_key_round_trips() {
        for kind in ShipKind::ALL {
            assert_eq!(ShipKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ShipKind::from_key("submarine"), None);
    }

    #[test]
    fn rarity_orders_ascending() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }
}
