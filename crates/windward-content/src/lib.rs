//! Static content tables for the Windward progression engine.
//!
//! This crate owns the data the engine treats as external collaborators:
//! building costs/production, ship classes, the technology tree, and the
//! captain roster, plus the level-scaling curves they all share.
//!
//! Lookups keyed by closed enums ([`BuildingKind`], [`ShipKind`]) are
//! total; lookups keyed by open wire strings (technology and captain IDs)
//! return `Option` and a miss is a configuration gap the engine skips over,
//! never an error.
//!
//! [`BuildingKind`]: windward_types::BuildingKind
//! [`ShipKind`]: windward_types::ShipKind

pub mod buildings;
pub mod captains;
pub mod scaling;
pub mod ships;
pub mod technologies;

pub use buildings::{
    build_time_for_level, building_spec, cost_for_level, production_for_level, BuildingSpec,
};
pub use captains::{
    captain_spec, captains_by_rarity, roster, xp_for_level, BuffSet, CaptainSpec, GACHA_RATES,
};
pub use scaling::{effect_for_level, growth_factor, scaled_amount, time_for_level};
pub use ships::{repair_cost, ship_spec, ShipSpec, ShipStats};
pub use technologies::{
    all_technologies, building_production_per_level, loot_per_level, research_cost,
    research_time_secs, ship_combat_per_level, ship_speed_per_level, technologies_by_branch,
    technology_spec, TechEffects, TechSpec,
};
