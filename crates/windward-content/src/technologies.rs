//! Technology tree content: research costs, times, prerequisites, effects.
//!
//! Technology IDs are open strings on the wire (stale snapshot timers may
//! reference removed technologies), so the registry lookup returns an
//! `Option` and callers treat a miss as a configuration gap.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use windward_types::{BuildingKind, Resource, TechBranch};

use crate::scaling::{scaled_amount, time_for_level};

/// Per-level increment for building production effects (+5%/level).
pub fn building_production_per_level() -> Decimal {
    Decimal::new(5, 2)
}

/// Per-level increment for ship attack and defense effects (+2%/level).
pub fn ship_combat_per_level() -> Decimal {
    Decimal::new(2, 2)
}

/// Per-level increment for ship speed effects (+3%/level).
pub fn ship_speed_per_level() -> Decimal {
    Decimal::new(3, 2)
}

/// Per-level increment for loot effects (+4%/level).
pub fn loot_per_level() -> Decimal {
    Decimal::new(4, 2)
}

/// Geometric growth applied to research costs per level.
fn cost_growth() -> Decimal {
    Decimal::new(15, 1)
}

/// The gameplay effects a technology grants (base values at level 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechEffects {
    /// Production bonus per building kind.
    pub building_production: Vec<(BuildingKind, Decimal)>,
    /// Global ship attack bonus.
    pub ship_attack: Option<Decimal>,
    /// Global ship defense bonus.
    pub ship_defense: Option<Decimal>,
    /// Global ship speed bonus.
    pub ship_speed: Option<Decimal>,
    /// Global loot bonus.
    pub loot: Option<Decimal>,
}

/// Static description of a technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechSpec {
    /// Content tree key.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Research branch.
    pub branch: TechBranch,
    /// Maximum researchable level.
    pub max_level: u32,
    /// Cost of level-1 research; scales geometrically.
    pub base_cost: Vec<(Resource, u64)>,
    /// Research time of level 1, in seconds; scales via the time curve.
    pub base_research_time_secs: u64,
    /// Technologies that must be researched (any level) before level 1.
    pub prerequisites: Vec<&'static str>,
    /// Content keys unlocked at level 1 (buildings, ships, features).
    pub unlocks: Vec<&'static str>,
    /// Effects granted per researched level.
    pub effects: TechEffects,
}

fn pct(hundredths: i64) -> Decimal {
    Decimal::new(hundredths, 2)
}

static TECHNOLOGIES: LazyLock<Vec<TechSpec>> = LazyLock::new(|| {
    vec![
        // --- Economy ---
        TechSpec {
            id: "advanced_mining",
            name: "Advanced Mining",
            branch: TechBranch::Economy,
            max_level: 10,
            base_cost: vec![(Resource::Gold, 500), (Resource::Stone, 200)],
            base_research_time_secs: 30,
            prerequisites: Vec::new(),
            unlocks: Vec::new(),
            effects: TechEffects {
                building_production: vec![(BuildingKind::GoldMine, pct(25))],
                ..TechEffects::default()
            },
        },
        TechSpec {
            id: "lumber_efficiency",
            name: "Lumber Efficiency",
            branch: TechBranch::Economy,
            max_level: 10,
            base_cost: vec![(Resource::Gold, 400), (Resource::Wood, 300)],
            base_research_time_secs: 30,
            prerequisites: Vec::new(),
            unlocks: Vec::new(),
            effects: TechEffects {
                building_production: vec![(BuildingKind::LumberMill, pct(25))],
                ..TechEffects::default()
            },
        },
        TechSpec {
            id: "shipbuilding",
            name: "Shipbuilding",
            branch: TechBranch::Economy,
            max_level: 10,
            base_cost: vec![
                (Resource::Gold, 1000),
                (Resource::Wood, 500),
                (Resource::Stone, 300),
            ],
            base_research_time_secs: 60,
            prerequisites: Vec::new(),
            unlocks: vec!["dock"],
            effects: TechEffects::default(),
        },
        TechSpec {
            id: "advanced_shipbuilding",
            name: "Advanced Shipbuilding",
            branch: TechBranch::Economy,
            max_level: 10,
            base_cost: vec![
                (Resource::Gold, 2000),
                (Resource::Wood, 1000),
                (Resource::Stone, 500),
            ],
            base_research_time_secs: 120,
            prerequisites: vec!["shipbuilding"],
            unlocks: vec!["brigantine", "galleon"],
            effects: TechEffects::default(),
        },
        // --- Military ---
        TechSpec {
            id: "combat_tactics",
            name: "Combat Tactics",
            branch: TechBranch::Military,
            max_level: 10,
            base_cost: vec![(Resource::Gold, 600), (Resource::Food, 200)],
            base_research_time_secs: 30,
            prerequisites: Vec::new(),
            unlocks: Vec::new(),
            effects: TechEffects {
                ship_attack: Some(pct(10)),
                ..TechEffects::default()
            },
        },
        TechSpec {
            id: "naval_defense",
            name: "Naval Defense",
            branch: TechBranch::Military,
            max_level: 10,
            base_cost: vec![(Resource::Gold, 600), (Resource::Stone, 200)],
            base_research_time_secs: 30,
            prerequisites: Vec::new(),
            unlocks: Vec::new(),
            effects: TechEffects {
                ship_defense: Some(pct(10)),
                ..TechEffects::default()
            },
        },
        TechSpec {
            id: "crew_training",
            name: "Crew Training",
            branch: TechBranch::Military,
            max_level: 10,
            base_cost: vec![
                (Resource::Gold, 800),
                (Resource::Rum, 300),
                (Resource::Food, 200),
            ],
            base_research_time_secs: 60,
            prerequisites: Vec::new(),
            unlocks: vec!["specialized_crew"],
            effects: TechEffects::default(),
        },
        TechSpec {
            id: "cannon_mastery",
            name: "Cannon Mastery",
            branch: TechBranch::Military,
            max_level: 10,
            base_cost: vec![
                (Resource::Gold, 1500),
                (Resource::Stone, 500),
                (Resource::Wood, 300),
            ],
            base_research_time_secs: 120,
            prerequisites: vec!["combat_tactics"],
            unlocks: vec!["cannon_production"],
            effects: TechEffects {
                ship_attack: Some(pct(15)),
                ..TechEffects::default()
            },
        },
        // --- Exploration ---
        TechSpec {
            id: "navigation",
            name: "Navigation",
            branch: TechBranch::Exploration,
            max_level: 10,
            base_cost: vec![(Resource::Gold, 500), (Resource::Wood, 300)],
            base_research_time_secs: 30,
            prerequisites: Vec::new(),
            unlocks: Vec::new(),
            effects: TechEffects {
                ship_speed: Some(pct(15)),
                ..TechEffects::default()
            },
        },
        TechSpec {
            id: "treasure_hunting",
            name: "Treasure Hunting",
            branch: TechBranch::Exploration,
            max_level: 10,
            base_cost: vec![(Resource::Gold, 700), (Resource::Rum, 200)],
            base_research_time_secs: 30,
            prerequisites: Vec::new(),
            unlocks: Vec::new(),
            effects: TechEffects {
                loot: Some(pct(20)),
                ..TechEffects::default()
            },
        },
        TechSpec {
            id: "expedition_leadership",
            name: "Expedition Leadership",
            branch: TechBranch::Exploration,
            max_level: 10,
            base_cost: vec![
                (Resource::Gold, 1200),
                (Resource::Food, 300),
                (Resource::Rum, 250),
            ],
            base_research_time_secs: 180,
            prerequisites: vec!["navigation", "treasure_hunting"],
            unlocks: vec!["advanced_missions"],
            effects: TechEffects::default(),
        },
    ]
});

/// Every technology, in tree order.
pub fn all_technologies() -> &'static [TechSpec] {
    &TECHNOLOGIES
}

/// Look up a technology by ID. `None` is a configuration gap, not an error.
pub fn technology_spec(id: &str) -> Option<&'static TechSpec> {
    TECHNOLOGIES.iter().find(|tech| tech.id == id)
}

/// Technologies belonging to a branch, in tree order.
pub fn technologies_by_branch(branch: TechBranch) -> Vec<&'static TechSpec> {
    TECHNOLOGIES
        .iter()
        .filter(|tech| tech.branch == branch)
        .collect()
}

/// Research cost for a technology at the given level.
///
/// Returns `None` when the technology does not exist.
pub fn research_cost(id: &str, level: u32) -> Option<BTreeMap<Resource, u64>> {
    let spec = technology_spec(id)?;
    Some(
        spec.base_cost
            .iter()
            .map(|(resource, base)| (*resource, scaled_amount(*base, level, cost_growth())))
            .collect(),
    )
}

/// Research time in seconds for a technology at the given level.
///
/// Returns `None` when the technology does not exist.
pub fn research_time_secs(id: &str, level: u32) -> Option<u64> {
    let spec = technology_spec(id)?;
    Some(time_for_level(level, spec.base_research_time_secs))
}
