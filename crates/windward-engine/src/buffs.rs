//! Buff aggregation: folds owned captains and researched technologies
//! into the flat multiplier set the rest of the engine consumes.
//!
//! Captain buffs are additive across captains, each scaled by
//! `1 + (level-1) * 0.05`. Technology bonuses scale linearly per
//! researched level with a per-bonus-kind increment (5%/level for
//! building production, 2%/level for ship attack/defense, 3%/level for
//! ship speed, 4%/level for loot). Unknown captain or technology IDs are
//! skipped silently -- content edits after a snapshot was saved must
//! never break catch-up.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use windward_content::{
    building_production_per_level, captain_spec, effect_for_level, loot_per_level,
    ship_combat_per_level, ship_speed_per_level, BuffSet, ShipStats,
};
use windward_types::{BuildingKind, GameState, OwnedCaptain};

/// Technology-derived ship stat bonuses (global, additive with captain
/// ship buffs at application time).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TechShipBonus {
    /// Attack bonus fraction.
    pub attack: Decimal,
    /// Defense bonus fraction.
    pub defense: Decimal,
    /// Speed bonus fraction.
    pub speed: Decimal,
}

/// The full aggregated buff picture for one player.
///
/// Captain and technology contributions are kept separate because the
/// accrual engine applies them as two successive floored multiplications
/// (technology first, then captains); pre-summing them would change the
/// rounding and break convergence with existing saves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuffSummary {
    /// Summed, level-scaled captain buffs.
    pub captains: BuffSet,
    /// Technology production bonus per building kind.
    pub building_production: BTreeMap<BuildingKind, Decimal>,
    /// Technology ship stat bonuses.
    pub ship_tech: TechShipBonus,
    /// Technology loot bonus.
    pub loot_tech: Decimal,
}

impl BuffSummary {
    /// Aggregate every buff source in the given state.
    pub fn aggregate(state: &GameState) -> Self {
        let mut summary = Self {
            captains: aggregate_captain_buffs(&state.captains),
            ..Self::default()
        };

        for record in &state.researched_technologies {
            let Some(spec) = windward_content::technology_spec(record.id.as_str()) else {
                // Configuration gap: the technology was removed from
                // content after this snapshot was saved.
                continue;
            };
            let level = record.level;

            for (kind, base) in &spec.effects.building_production {
                let bonus = effect_for_level(level, *base, building_production_per_level());
                let entry = summary
                    .building_production
                    .entry(*kind)
                    .or_insert(Decimal::ZERO);
                *entry = entry.checked_add(bonus).unwrap_or(Decimal::MAX);
            }
            if let Some(base) = spec.effects.ship_attack {
                let bonus = effect_for_level(level, base, ship_combat_per_level());
                summary.ship_tech.attack =
                    summary.ship_tech.attack.checked_add(bonus).unwrap_or(Decimal::MAX);
            }
            if let Some(base) = spec.effects.ship_defense {
                let bonus = effect_for_level(level, base, ship_combat_per_level());
                summary.ship_tech.defense =
                    summary.ship_tech.defense.checked_add(bonus).unwrap_or(Decimal::MAX);
            }
            if let Some(base) = spec.effects.ship_speed {
                let bonus = effect_for_level(level, base, ship_speed_per_level());
                summary.ship_tech.speed =
                    summary.ship_tech.speed.checked_add(bonus).unwrap_or(Decimal::MAX);
            }
            if let Some(base) = spec.effects.loot {
                let bonus = effect_for_level(level, base, loot_per_level());
                summary.loot_tech = summary.loot_tech.checked_add(bonus).unwrap_or(Decimal::MAX);
            }
        }

        summary
    }

    /// Technology production bonus for a building kind (zero when no
    /// researched technology targets it).
    pub fn production_bonus(&self, kind: BuildingKind) -> Decimal {
        self.building_production
            .get(&kind)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Combined loot bonus (captains plus technologies).
    pub fn total_loot_bonus(&self) -> Decimal {
        self.captains
            .loot_bonus
            .checked_add(self.loot_tech)
            .unwrap_or(Decimal::MAX)
    }
}

/// Sum every owned captain's buff set, scaled by its level.
pub fn aggregate_captain_buffs(captains: &[OwnedCaptain]) -> BuffSet {
    let mut total = BuffSet::default();
    for owned in captains {
        let Some(spec) = captain_spec(owned.id.as_str()) else {
            // Configuration gap: skipped, not an error.
            continue;
        };
        let scale = level_multiplier(owned.level);
        accumulate(&mut total, &spec.buffs, scale);
    }
    total
}

/// Level scaling for a captain's contribution: `1 + (level-1) * 0.05`.
fn level_multiplier(level: u32) -> Decimal {
    let per_level = Decimal::new(5, 2);
    let extra = per_level
        .checked_mul(Decimal::from(level.saturating_sub(1)))
        .unwrap_or(Decimal::MAX);
    Decimal::ONE.checked_add(extra).unwrap_or(Decimal::MAX)
}

/// Add `buffs * scale` into `total`, field by field.
fn accumulate(total: &mut BuffSet, buffs: &BuffSet, scale: Decimal) {
    let add = |current: Decimal, base: Decimal| {
        current
            .checked_add(base.checked_mul(scale).unwrap_or(Decimal::MAX))
            .unwrap_or(Decimal::MAX)
    };
    total.ship_attack = add(total.ship_attack, buffs.ship_attack);
    total.ship_defense = add(total.ship_defense, buffs.ship_defense);
    total.ship_hp = add(total.ship_hp, buffs.ship_hp);
    total.ship_speed = add(total.ship_speed, buffs.ship_speed);
    total.build_time_reduction = add(total.build_time_reduction, buffs.build_time_reduction);
    total.resource_production = add(total.resource_production, buffs.resource_production);
    total.storage_bonus = add(total.storage_bonus, buffs.storage_bonus);
    total.loot_bonus = add(total.loot_bonus, buffs.loot_bonus);
    total.mission_speed = add(total.mission_speed, buffs.mission_speed);
}

/// `floor(value * (1 + bonus))`, clamped to the `u64` range.
pub fn floor_boosted(value: u64, bonus: Decimal) -> u64 {
    Decimal::ONE
        .checked_add(bonus)
        .and_then(|factor| Decimal::from(value).checked_mul(factor))
        .map_or(u64::MAX, |v| v.floor().to_u64().unwrap_or(u64::MAX))
}

/// Synthesize launch stats for a ship: base stats through captain and
/// technology ship bonuses, floored per stat.
pub fn apply_ship_buffs(stats: ShipStats, buffs: &BuffSummary) -> ShipStats {
    let combine = |captain: Decimal, tech: Decimal| captain.checked_add(tech).unwrap_or(Decimal::MAX);
    ShipStats {
        hp: floor_boosted(u64::from(stats.hp), buffs.captains.ship_hp)
            .try_into()
            .unwrap_or(u32::MAX),
        max_hp: floor_boosted(u64::from(stats.max_hp), buffs.captains.ship_hp)
            .try_into()
            .unwrap_or(u32::MAX),
        attack: floor_boosted(
            u64::from(stats.attack),
            combine(buffs.captains.ship_attack, buffs.ship_tech.attack),
        )
        .try_into()
        .unwrap_or(u32::MAX),
        defense: floor_boosted(
            u64::from(stats.defense),
            combine(buffs.captains.ship_defense, buffs.ship_tech.defense),
        )
        .try_into()
        .unwrap_or(u32::MAX),
        speed: floor_boosted(
            u64::from(stats.speed),
            combine(buffs.captains.ship_speed, buffs.ship_tech.speed),
        )
        .try_into()
        .unwrap_or(u32::MAX),
    }
}

/// Apply the captain build-time reduction to a base duration in seconds:
/// `max(1, floor(base * (1 - reduction)))`.
pub fn reduced_build_time(base_secs: u64, buffs: &BuffSummary) -> u64 {
    let factor = Decimal::ONE
        .checked_sub(buffs.captains.build_time_reduction)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    let reduced = Decimal::from(base_secs)
        .checked_mul(factor)
        .map_or(base_secs, |v| v.floor().to_u64().unwrap_or(base_secs));
    reduced.max(1)
}

/// Per-tick production of one resource for a building kind: technology
/// bonus first, then the global captain production bonus, each floored at
/// the point it is applied.
pub fn boosted_production(base: u64, kind: BuildingKind, buffs: &BuffSummary) -> u64 {
    let with_tech = floor_boosted(base, buffs.production_bonus(kind));
    floor_boosted(with_tech, buffs.captains.resource_production)
}

/// Apply the combined loot bonus to a battle reward map (the battle
/// system's only hook into this engine).
pub fn apply_loot_bonus(
    loot: &BTreeMap<windward_types::Resource, u64>,
    buffs: &BuffSummary,
) -> BTreeMap<windward_types::Resource, u64> {
    let bonus = buffs.total_loot_bonus();
    loot.iter()
        .map(|(resource, amount)| (*resource, floor_boosted(*amount, bonus)))
        .collect()
}
