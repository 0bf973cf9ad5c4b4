//! Captain roster content: the collectible characters and their buff sets.
//!
//! Buffs are additive fractions (0.05 = +5%) aggregated by the engine's
//! buff aggregator; a captain's contribution scales with its level.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use windward_types::{CaptainRole, Rarity};

use crate::scaling::scaled_amount;

/// Base draw rates per rarity, in percent, in cumulative walk order.
pub const GACHA_RATES: [(Rarity, u32); 4] = [
    (Rarity::Common, 70),
    (Rarity::Rare, 25),
    (Rarity::Epic, 4),
    (Rarity::Legendary, 1),
];

/// The flat buff set a captain contributes (all additive fractions).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuffSet {
    /// Ship attack bonus.
    pub ship_attack: Decimal,
    /// Ship defense bonus.
    pub ship_defense: Decimal,
    /// Ship hull-point bonus.
    pub ship_hp: Decimal,
    /// Ship speed bonus.
    pub ship_speed: Decimal,
    /// Construction time reduction.
    pub build_time_reduction: Decimal,
    /// Global resource production bonus.
    pub resource_production: Decimal,
    /// Warehouse capacity bonus.
    pub storage_bonus: Decimal,
    /// Battle loot bonus.
    pub loot_bonus: Decimal,
    /// Mission completion speed bonus.
    pub mission_speed: Decimal,
}

/// Static description of a collectible captain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptainSpec {
    /// Roster key.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Specialization role.
    pub role: CaptainRole,
    /// Experience required to leave level 1.
    pub base_xp_to_next: u64,
    /// Buff contribution at level 1.
    pub buffs: BuffSet,
}

fn pct(hundredths: i64) -> Decimal {
    Decimal::new(hundredths, 2)
}

static ROSTER: LazyLock<Vec<CaptainSpec>> = LazyLock::new(|| {
    vec![
        // --- Common ---
        CaptainSpec {
            id: "anne_sharp",
            name: "Anne Sharp",
            rarity: Rarity::Common,
            role: CaptainRole::Combat,
            base_xp_to_next: 100,
            buffs: BuffSet {
                ship_attack: pct(5),
                ship_defense: pct(2),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "mary_read",
            name: "Mary Read",
            rarity: Rarity::Common,
            role: CaptainRole::Economy,
            base_xp_to_next: 100,
            buffs: BuffSet {
                build_time_reduction: pct(3),
                resource_production: pct(5),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "grace_o_malley",
            name: "Grace O'Malley",
            rarity: Rarity::Common,
            role: CaptainRole::Exploration,
            base_xp_to_next: 100,
            buffs: BuffSet {
                loot_bonus: pct(8),
                mission_speed: pct(5),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "sarah_kidd",
            name: "Sarah Kidd",
            rarity: Rarity::Common,
            role: CaptainRole::Support,
            base_xp_to_next: 100,
            buffs: BuffSet {
                ship_hp: pct(4),
                build_time_reduction: pct(2),
                ..BuffSet::default()
            },
        },
        // --- Rare ---
        CaptainSpec {
            id: "charlotte_badger",
            name: "Charlotte Badger",
            rarity: Rarity::Rare,
            role: CaptainRole::Combat,
            base_xp_to_next: 150,
            buffs: BuffSet {
                ship_attack: pct(10),
                ship_hp: pct(8),
                ship_defense: pct(5),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "rachel_wall",
            name: "Rachel Wall",
            rarity: Rarity::Rare,
            role: CaptainRole::Economy,
            base_xp_to_next: 150,
            buffs: BuffSet {
                build_time_reduction: pct(8),
                resource_production: pct(12),
                storage_bonus: pct(10),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "isabella_black",
            name: "Isabella Black",
            rarity: Rarity::Rare,
            role: CaptainRole::Exploration,
            base_xp_to_next: 150,
            buffs: BuffSet {
                loot_bonus: pct(12),
                mission_speed: pct(8),
                ship_speed: pct(5),
                ..BuffSet::default()
            },
        },
        // --- Epic ---
        CaptainSpec {
            id: "anne_bonny",
            name: "Anne Bonny",
            rarity: Rarity::Epic,
            role: CaptainRole::Combat,
            base_xp_to_next: 200,
            buffs: BuffSet {
                ship_attack: pct(15),
                ship_hp: pct(12),
                ship_defense: pct(10),
                ship_speed: pct(5),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "ching_shih",
            name: "Ching Shih",
            rarity: Rarity::Epic,
            role: CaptainRole::Support,
            base_xp_to_next: 200,
            buffs: BuffSet {
                ship_attack: pct(10),
                ship_defense: pct(12),
                build_time_reduction: pct(10),
                resource_production: pct(8),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "elena_crimson",
            name: "Elena Crimson",
            rarity: Rarity::Epic,
            role: CaptainRole::Economy,
            base_xp_to_next: 200,
            buffs: BuffSet {
                resource_production: pct(15),
                build_time_reduction: pct(12),
                loot_bonus: pct(8),
                storage_bonus: pct(10),
                ..BuffSet::default()
            },
        },
        // --- Legendary ---
        CaptainSpec {
            id: "nadia",
            name: "Nadia",
            rarity: Rarity::Legendary,
            role: CaptainRole::Combat,
            base_xp_to_next: 300,
            buffs: BuffSet {
                ship_attack: pct(25),
                ship_hp: pct(20),
                ship_defense: pct(18),
                ship_speed: pct(15),
                loot_bonus: pct(15),
                resource_production: pct(10),
                ..BuffSet::default()
            },
        },
        CaptainSpec {
            id: "sayyida_al_hurra",
            name: "Sayyida al-Hurra",
            rarity: Rarity::Legendary,
            role: CaptainRole::Support,
            base_xp_to_next: 300,
            buffs: BuffSet {
                ship_attack: pct(12),
                ship_defense: pct(12),
                build_time_reduction: pct(15),
                resource_production: pct(15),
                loot_bonus: pct(12),
                mission_speed: pct(10),
                ..BuffSet::default()
            },
        },
    ]
});

/// The complete captain roster, in content order.
pub fn roster() -> &'static [CaptainSpec] {
    &ROSTER
}

/// Look up a captain by roster key. `None` is a configuration gap.
pub fn captain_spec(id: &str) -> Option<&'static CaptainSpec> {
    ROSTER.iter().find(|captain| captain.id == id)
}

/// Captains of a given rarity, in content order.
pub fn captains_by_rarity(rarity: Rarity) -> Vec<&'static CaptainSpec> {
    ROSTER
        .iter()
        .filter(|captain| captain.rarity == rarity)
        .collect()
}

/// Experience required to advance from the given level:
/// `floor(100 * 1.5^(level-1))`.
pub fn xp_for_level(level: u32) -> u64 {
    scaled_amount(100, level, Decimal::new(15, 1))
}
