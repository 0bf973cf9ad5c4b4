//! Shared type definitions for the Windward progression engine.
//!
//! This crate is the single source of truth for all types used across the
//! Windward workspace. Snapshot-facing types flow downstream to
//! `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for entity identifiers
//! - [`enums`] -- Closed content-key enumerations (resources, buildings,
//!   ships, rarities, roles, branches)
//! - [`ledger`] -- Checked, non-negative resource balances
//! - [`state`] -- The normalized [`GameState`] aggregate and its parts
//! - [`snapshot`] -- The serialized wire format and its legacy-shape
//!   normalization

pub mod enums;
pub mod ids;
pub mod ledger;
pub mod snapshot;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use enums::{BuildingKind, CaptainRole, Rarity, Resource, ShipKind, TechBranch};
pub use ids::{BuildingId, CaptainId, CrewId, ShipId, TechnologyId};
pub use ledger::{LedgerError, ResourceLedger};
pub use snapshot::{
    GameStateSnapshot, PityRecord, SnapshotError, TechEntry, TimerRecord, TimerSets,
    SNAPSHOT_VERSION,
};
pub use state::{
    Building, CrewMember, GameState, OwnedCaptain, PityState, Ship, TechnologyRecord, Timer,
    DEFAULT_GUARANTEED_EPIC_AT, DEFAULT_GUARANTEED_LEGENDARY_AT,
};
