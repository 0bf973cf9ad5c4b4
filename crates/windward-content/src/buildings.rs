//! Building content: costs, build times, production, prerequisites.
//!
//! Every [`BuildingKind`] maps to exactly one spec; the mapping is total,
//! so a decoded snapshot can never reference a building without content.
//! Cost and production values are level-scaled on demand via
//! [`crate::scaling`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use windward_types::{BuildingKind, Resource};

use crate::scaling::{scaled_amount, time_for_level};

/// Geometric growth applied to building costs per level.
fn cost_growth() -> Decimal {
    Decimal::new(15, 1)
}

/// Geometric growth applied to building production per level.
fn production_growth() -> Decimal {
    Decimal::new(13, 1)
}

/// Static description of a building type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingSpec {
    /// The kind this spec describes.
    pub kind: BuildingKind,
    /// Display name.
    pub name: &'static str,
    /// Maximum reachable level.
    pub max_level: u32,
    /// Cost of the initial construction (level 1); scales geometrically.
    pub base_cost: Vec<(Resource, u64)>,
    /// Build time of level 1, in seconds; scales via the time curve.
    pub base_build_time_secs: u64,
    /// Per-tick production at level 1; scales geometrically.
    pub base_production: Vec<(Resource, u64)>,
    /// Buildings (and levels) that must exist before this one can be built.
    pub prerequisites: Vec<(BuildingKind, u32)>,
    /// Grid footprint width.
    pub grid_width: u32,
    /// Grid footprint height.
    pub grid_height: u32,
}

/// Look up the spec for a building kind. Total over [`BuildingKind`].
pub fn building_spec(kind: BuildingKind) -> BuildingSpec {
    match kind {
        BuildingKind::TownHall => BuildingSpec {
            kind,
            name: "Town Hall",
            max_level: 30,
            // The town hall is pre-placed; it is never purchased.
            base_cost: Vec::new(),
            base_build_time_secs: 30,
            base_production: Vec::new(),
            prerequisites: Vec::new(),
            grid_width: 2,
            grid_height: 2,
        },
        BuildingKind::GoldMine => BuildingSpec {
            kind,
            name: "Gold Mine",
            max_level: 30,
            base_cost: vec![
                (Resource::Gold, 100),
                (Resource::Wood, 50),
                (Resource::Stone, 25),
            ],
            base_build_time_secs: 20,
            base_production: vec![(Resource::Gold, 5)],
            prerequisites: vec![(BuildingKind::TownHall, 1)],
            grid_width: 1,
            grid_height: 1,
        },
        BuildingKind::LumberMill => BuildingSpec {
            kind,
            name: "Lumber Mill",
            max_level: 30,
            base_cost: vec![(Resource::Gold, 80), (Resource::Stone, 20)],
            base_build_time_secs: 15,
            base_production: vec![(Resource::Wood, 3)],
            prerequisites: vec![(BuildingKind::TownHall, 1)],
            grid_width: 1,
            grid_height: 1,
        },
        BuildingKind::Quarry => BuildingSpec {
            kind,
            name: "Quarry",
            max_level: 30,
            base_cost: vec![(Resource::Gold, 90), (Resource::Wood, 40)],
            base_build_time_secs: 18,
            base_production: vec![(Resource::Stone, 2)],
            prerequisites: vec![(BuildingKind::TownHall, 1)],
            grid_width: 1,
            grid_height: 1,
        },
        BuildingKind::Distillery => BuildingSpec {
            kind,
            name: "Distillery",
            max_level: 30,
            base_cost: vec![
                (Resource::Gold, 120),
                (Resource::Wood, 60),
                (Resource::Food, 20),
            ],
            base_build_time_secs: 25,
            base_production: vec![(Resource::Rum, 2)],
            prerequisites: vec![(BuildingKind::TownHall, 1)],
            grid_width: 1,
            grid_height: 1,
        },
        BuildingKind::Tavern => BuildingSpec {
            kind,
            name: "Tavern",
            max_level: 30,
            base_cost: vec![
                (Resource::Gold, 150),
                (Resource::Wood, 80),
                (Resource::Rum, 20),
            ],
            base_build_time_secs: 30,
            base_production: vec![(Resource::Crew, 1)],
            prerequisites: vec![(BuildingKind::TownHall, 1)],
            grid_width: 1,
            grid_height: 1,
        },
        BuildingKind::Dock => BuildingSpec {
            kind,
            name: "Dock",
            max_level: 30,
            base_cost: vec![
                (Resource::Gold, 200),
                (Resource::Wood, 150),
                (Resource::Stone, 100),
            ],
            base_build_time_secs: 60,
            base_production: Vec::new(),
            prerequisites: vec![(BuildingKind::TownHall, 2)],
            grid_width: 2,
            grid_height: 1,
        },
    }
}

/// Cost to build or upgrade to the given level.
pub fn cost_for_level(kind: BuildingKind, level: u32) -> BTreeMap<Resource, u64> {
    let spec = building_spec(kind);
    spec.base_cost
        .iter()
        .map(|(resource, base)| (*resource, scaled_amount(*base, level, cost_growth())))
        .collect()
}

/// Build time in seconds to reach the given level (before buffs).
pub fn build_time_for_level(kind: BuildingKind, level: u32) -> u64 {
    time_for_level(level, building_spec(kind).base_build_time_secs)
}

/// Per-tick production at the given level, floored per resource.
///
/// Empty for non-producing buildings (dock, town hall) and for level 0.
pub fn production_for_level(kind: BuildingKind, level: u32) -> BTreeMap<Resource, u64> {
    if level == 0 {
        return BTreeMap::new();
    }
    let spec = building_spec(kind);
    spec.base_production
        .iter()
        .map(|(resource, base)| (*resource, scaled_amount(*base, level, production_growth())))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_spec() {
        for kind in BuildingKind::ALL {
            let spec = building_spec(kind);
            assert_eq!(spec.kind, kind);
            assert_eq!(spec.max_level, 30);
        }
    }

    #[test]
    fn gold_mine_production_scales_geometrically() {
        assert_eq!(
            production_for_level(BuildingKind::GoldMine, 1).get(&Resource::Gold),
            Some(&5)
        );
        // floor(5 * 1.3) = 6, floor(5 * 1.69) = 8
        assert_eq!(
            production_for_level(BuildingKind::GoldMine, 2).get(&Resource::Gold),
            Some(&6)
        );
        assert_eq!(
            production_for_level(BuildingKind::GoldMine, 3).get(&Resource::Gold),
            Some(&8)
        );
    }

    #[test]
    fn level_zero_produces_nothing() {
        assert!(production_for_level(BuildingKind::GoldMine, 0).is_empty());
    }

    #[test]
    fn dock_never_produces() {
        assert!(production_for_level(BuildingKind::Dock, 5).is_empty());
    }

    #[test]
    fn upgrade_cost_grows_by_half_per_level() {
        let level1 = cost_for_level(BuildingKind::GoldMine, 1);
        let level2 = cost_for_level(BuildingKind::GoldMine, 2);
        assert_eq!(level1.get(&Resource::Gold), Some(&100));
        assert_eq!(level2.get(&Resource::Gold), Some(&150));
        // floor(25 * 1.5) = 37
        assert_eq!(level2.get(&Resource::Stone), Some(&37));
    }

    #[test]
    fn town_hall_is_free_and_silent() {
        assert!(cost_for_level(BuildingKind::TownHall, 1).is_empty());
        assert!(production_for_level(BuildingKind::TownHall, 3).is_empty());
    }

    #[test]
    fn dock_requires_developed_town_hall() {
        let spec = building_spec(BuildingKind::Dock);
        assert_eq!(spec.prerequisites, vec![(BuildingKind::TownHall, 2)]);
    }
}
