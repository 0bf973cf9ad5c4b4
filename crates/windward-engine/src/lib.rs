//! The Windward progression engine.
//!
//! Play continues while a client is disconnected, so all progression is
//! recomputed deterministically from a stored snapshot plus elapsed
//! wall-clock time. The recomputation is shared between an optimistic
//! client predictor and the authoritative server recalculation and is:
//!
//! - **idempotent** -- replaying the same elapsed window never
//!   double-applies effects (resolved timers are deleted; sub-threshold
//!   windows are exact no-ops);
//! - **monotonic** -- resources never go negative and completed timers
//!   never regress;
//! - **reconcilable** -- identical state and time inputs produce
//!   identical results on both sides, and the server's result wins.
//!
//! # Modules
//!
//! - [`clock`] -- elapsed-time resolution into whole production ticks
//! - [`buffs`] -- captain and technology bonuses folded into flat
//!   multipliers
//! - [`accrual`] -- per-tick building production applied in bulk
//! - [`timers`] -- construction, shipbuilding, and research timer
//!   lifecycle
//! - [`gacha`] -- weighted rarity draws with dual pity counters
//! - [`reconcile`] -- the orchestrating entry point
//! - [`actions`] -- player mutations that start timed work or spend
//!   resources
//! - [`config`] -- engine tuning loaded from YAML
//! - [`scheduler`] -- periodic reconcile driving with cancellation
//! - [`throttle`] -- sliding-window request limiting as explicit state
//!   (server boundary concern; the engine does not depend on it)

pub mod accrual;
pub mod actions;
pub mod buffs;
pub mod clock;
pub mod config;
pub mod gacha;
pub mod reconcile;
pub mod scheduler;
pub mod throttle;
pub mod timers;

pub use accrual::accrue;
pub use actions::{
    recruit, start_construction, start_research, start_ship_construction, start_upgrade,
    ActionError, GachaPayment,
};
pub use buffs::{
    aggregate_captain_buffs, apply_loot_bonus, apply_ship_buffs, boosted_production,
    reduced_build_time, BuffSummary, TechShipBonus,
};
pub use clock::{now_ms, ClockError, ProgressClock};
pub use config::{ConfigError, EngineConfig};
pub use gacha::{draw, recruit_pulls, Draw, GachaError, PullOutcome};
pub use reconcile::{reconcile, ReconcileReport};
pub use scheduler::{run_scheduler, stop_channel};
pub use throttle::{check as throttle_check, sweep as throttle_sweep, ThrottleDecision, ThrottlePolicy, ThrottleState};
pub use timers::{resolve_building_timers, resolve_research_timers, resolve_ship_timers};
