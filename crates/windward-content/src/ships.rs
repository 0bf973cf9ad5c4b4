//! Ship content: base stats, costs, build times, repair pricing.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use windward_types::{Resource, ShipKind};

/// Base combat statistics of a ship class, before any buffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipStats {
    /// Hull points.
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

/// Static description of a ship class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipSpec {
    /// The kind this spec describes.
    pub kind: ShipKind,
    /// Display name.
    pub name: &'static str,
    /// Base stats before buffs.
    pub stats: ShipStats,
    /// Construction cost.
    pub cost: Vec<(Resource, u64)>,
    /// Construction time in seconds (before buffs).
    pub build_time_secs: u64,
    /// Fraction of the build cost charged for a full repair.
    pub repair_cost_multiplier: Decimal,
}

/// Look up the spec for a ship kind. Total over [`ShipKind`].
pub fn ship_spec(kind: ShipKind) -> ShipSpec {
    let repair = Decimal::new(3, 1);
    match kind {
        ShipKind::Sloop => ShipSpec {
            kind,
            name: "Small Sloop",
            stats: ShipStats {
                hp: 50,
                max_hp: 50,
                attack: 15,
                defense: 5,
                speed: 10,
            },
            cost: vec![
                (Resource::Gold, 500),
                (Resource::Wood, 200),
                (Resource::Rum, 50),
                (Resource::Crew, 10),
            ],
            build_time_secs: 60,
            repair_cost_multiplier: repair,
        },
        ShipKind::Brigantine => ShipSpec {
            kind,
            name: "Brigantine",
            stats: ShipStats {
                hp: 100,
                max_hp: 100,
                attack: 25,
                defense: 10,
                speed: 7,
            },
            cost: vec![
                (Resource::Gold, 1000),
                (Resource::Wood, 400),
                (Resource::Rum, 100),
                (Resource::Crew, 20),
            ],
            build_time_secs: 120,
            repair_cost_multiplier: repair,
        },
        ShipKind::Galleon => ShipSpec {
            kind,
            name: "Galleon",
            stats: ShipStats {
                hp: 200,
                max_hp: 200,
                attack: 40,
                defense: 20,
                speed: 4,
            },
            cost: vec![
                (Resource::Gold, 2500),
                (Resource::Wood, 1000),
                (Resource::Rum, 250),
                (Resource::Crew, 50),
            ],
            build_time_secs: 300,
            repair_cost_multiplier: repair,
        },
    }
}

/// Repair cost for a damaged ship: `ceil(cost * multiplier * damage)` per
/// resource, where damage is the missing fraction of max hull points.
///
/// An undamaged ship (or one with a zero `max_hp`, which shipped content
/// never produces) costs nothing to repair.
pub fn repair_cost(hp: u32, max_hp: u32, spec: &ShipSpec) -> BTreeMap<Resource, u64> {
    if max_hp == 0 || hp >= max_hp {
        return BTreeMap::new();
    }
    let damage = Decimal::ONE
        .checked_sub(
            Decimal::from(hp)
                .checked_div(Decimal::from(max_hp))
                .unwrap_or(Decimal::ONE),
        )
        .unwrap_or(Decimal::ZERO);

    spec.cost
        .iter()
        .map(|(resource, base)| {
            let charged = Decimal::from(*base)
                .checked_mul(spec.repair_cost_multiplier)
                .and_then(|v| v.checked_mul(damage))
                .map_or(u64::MAX, |v| v.ceil().to_u64().unwrap_or(u64::MAX));
            (*resource, charged)
        })
        .collect()
}
