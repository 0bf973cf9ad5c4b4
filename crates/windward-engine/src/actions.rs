//! Player actions: the mutations that *start* timed work or spend
//! resources.
//!
//! Preconditions live here, not in the catch-up engine: affordability is
//! checked (and the ledger debited atomically) before any timer is
//! created, and the one-construction-at-a-time invariant is enforced at
//! action start. The reconciler itself never spends resources and never
//! validates -- it only applies elapsed time.

use rand::Rng;
use tracing::info;
use windward_content::{
    build_time_for_level, building_spec, cost_for_level, research_cost, research_time_secs,
    ship_spec, technology_spec,
};
use windward_types::{
    Building, BuildingId, BuildingKind, GameState, LedgerError, Resource, ShipKind, TechnologyId,
    Timer,
};

use crate::buffs::{reduced_build_time, BuffSummary};
use crate::config::EngineConfig;
use crate::gacha::{recruit_pulls, GachaError, PullOutcome};

/// Errors returned by action preconditions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The player cannot afford the action's cost.
    #[error("cannot afford action: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// A draw failed fatally (empty content roster).
    #[error("recruitment failed: {source}")]
    Gacha {
        /// The underlying gacha error.
        #[from]
        source: GachaError,
    },

    /// Another construction is already in flight; only one building may
    /// construct at a time.
    #[error("construction already in progress on {building}")]
    ConstructionInProgress {
        /// The building currently constructing.
        building: BuildingId,
    },

    /// A prerequisite building or technology is missing.
    #[error("prerequisite not met: {reason}")]
    PrerequisiteNotMet {
        /// What is missing.
        reason: String,
    },

    /// The building is already at its maximum level.
    #[error("{building} is already at maximum level {level}")]
    MaxLevelReached {
        /// The building at cap.
        building: BuildingId,
        /// Its current level.
        level: u32,
    },

    /// No building with the given ID exists.
    #[error("unknown building: {building}")]
    UnknownBuilding {
        /// The missing ID.
        building: BuildingId,
    },

    /// Shipbuilding requires a completed dock.
    #[error("shipbuilding requires a dock")]
    DockRequired,

    /// The ship class has not been unlocked by research.
    #[error("ship class {kind:?} is locked behind research")]
    ShipLocked {
        /// The locked class.
        kind: ShipKind,
    },

    /// A ship of this class is already under construction.
    #[error("a {kind:?} is already under construction")]
    ShipBuildInProgress {
        /// The class being built.
        kind: ShipKind,
    },

    /// The technology ID has no content definition.
    #[error("unknown technology: {id}")]
    UnknownTechnology {
        /// The missing ID.
        id: TechnologyId,
    },

    /// Research on this technology is already in flight.
    #[error("research already in progress for {id}")]
    ResearchInProgress {
        /// The technology being researched.
        id: TechnologyId,
    },

    /// The technology is already at its maximum level.
    #[error("{id} is already at maximum level {level}")]
    TechnologyMaxLevel {
        /// The technology at cap.
        id: TechnologyId,
        /// Its current level.
        level: u32,
    },
}

/// Currency used to pay for recruitment pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GachaPayment {
    /// Pay in diamonds.
    Diamonds,
    /// Pay in fragments.
    Fragments,
}

/// Start constructing a new building of `kind` at grid position `(x, y)`.
///
/// Checks unlock prerequisites and affordability, debits the cost
/// atomically, places a level-0 building marked constructing, and creates
/// its timer (build time reduced by captain buffs). Returns the new
/// building's ID.
///
/// # Errors
///
/// Returns [`ActionError`] when another construction is in flight, a
/// prerequisite is missing, or the cost is unaffordable.
pub fn start_construction(
    state: &mut GameState,
    kind: BuildingKind,
    x: i32,
    y: i32,
    now: i64,
) -> Result<BuildingId, ActionError> {
    if let Some(busy) = state.constructing_building() {
        return Err(ActionError::ConstructionInProgress {
            building: busy.id.clone(),
        });
    }
    check_building_prerequisites(state, kind)?;

    let cost = cost_for_level(kind, 1);
    state.resources.debit_all(&cost)?;

    let buffs = BuffSummary::aggregate(state);
    let duration_secs = reduced_build_time(build_time_for_level(kind, 1), &buffs);
    let id = allocate_building_id(state, kind);

    state.buildings.push(Building {
        id: id.clone(),
        kind,
        level: 0,
        x,
        y,
        constructing: true,
    });
    state
        .building_timers
        .insert(id.clone(), timer_from(now, duration_secs));

    info!(building = %id, ?kind, duration_secs, "Construction started");
    Ok(id)
}

/// Start upgrading an existing building to its next level.
///
/// The building holds the post-upgrade level while constructing;
/// completion only clears the flag.
///
/// # Errors
///
/// Returns [`ActionError`] when the building is unknown, at its cap,
/// another construction is in flight, or the cost is unaffordable.
pub fn start_upgrade(state: &mut GameState, id: &BuildingId, now: i64) -> Result<u32, ActionError> {
    if let Some(busy) = state.constructing_building() {
        return Err(ActionError::ConstructionInProgress {
            building: busy.id.clone(),
        });
    }

    let building = state
        .building(id)
        .ok_or_else(|| ActionError::UnknownBuilding {
            building: id.clone(),
        })?;
    let kind = building.kind;
    let level = building.level;
    let spec = building_spec(kind);
    let target = level.saturating_add(1);
    if target > spec.max_level {
        return Err(ActionError::MaxLevelReached {
            building: id.clone(),
            level,
        });
    }

    let cost = cost_for_level(kind, target);
    state.resources.debit_all(&cost)?;

    let buffs = BuffSummary::aggregate(state);
    let duration_secs = reduced_build_time(build_time_for_level(kind, target), &buffs);

    if let Some(building) = state.building_mut(id) {
        building.level = target;
        building.constructing = true;
    }
    state
        .building_timers
        .insert(id.clone(), timer_from(now, duration_secs));

    info!(building = %id, target, duration_secs, "Upgrade started");
    Ok(target)
}

/// Start constructing a ship of the given class at the dock.
///
/// # Errors
///
/// Returns [`ActionError`] when no dock exists, the class is locked, a
/// ship of this class is already building, or the cost is unaffordable.
pub fn start_ship_construction(
    state: &mut GameState,
    kind: ShipKind,
    now: i64,
) -> Result<String, ActionError> {
    let has_dock = state
        .buildings
        .iter()
        .any(|b| b.kind == BuildingKind::Dock && b.level >= 1 && !b.constructing);
    if !has_dock {
        return Err(ActionError::DockRequired);
    }
    if ship_class_locked(state, kind) {
        return Err(ActionError::ShipLocked { kind });
    }

    let key = format!("building_{}", kind.key());
    if state.ship_timers.contains_key(&key) {
        return Err(ActionError::ShipBuildInProgress { kind });
    }

    let spec = ship_spec(kind);
    let cost = spec.cost.iter().copied().collect();
    state.resources.debit_all(&cost)?;

    let buffs = BuffSummary::aggregate(state);
    let duration_secs = reduced_build_time(spec.build_time_secs, &buffs);
    state
        .ship_timers
        .insert(key.clone(), timer_from(now, duration_secs));

    info!(?kind, duration_secs, "Ship construction started");
    Ok(key)
}

/// Start researching the next level of a technology.
///
/// Level 1 requires the technology's prerequisites to be researched;
/// higher levels only require the previous level. Returns the target
/// level and creates the `<id>_<level>` timer.
///
/// # Errors
///
/// Returns [`ActionError`] when the technology is unknown, capped,
/// already in flight, locked by prerequisites, or unaffordable.
pub fn start_research(
    state: &mut GameState,
    id: &TechnologyId,
    now: i64,
) -> Result<u32, ActionError> {
    let spec = technology_spec(id.as_str()).ok_or_else(|| ActionError::UnknownTechnology {
        id: id.clone(),
    })?;

    let in_flight = state
        .technology_timers
        .keys()
        .any(|key| key.rsplit_once('_').is_some_and(|(tech, _)| tech == id.as_str()));
    if in_flight {
        return Err(ActionError::ResearchInProgress { id: id.clone() });
    }

    let current = state.technology_level(id);
    let target = current.saturating_add(1);
    if target > spec.max_level {
        return Err(ActionError::TechnologyMaxLevel {
            id: id.clone(),
            level: current,
        });
    }

    if target == 1 {
        for prereq in &spec.prerequisites {
            if state.technology_level(&TechnologyId::from(*prereq)) == 0 {
                return Err(ActionError::PrerequisiteNotMet {
                    reason: format!("requires {prereq}"),
                });
            }
        }
    }

    let cost = research_cost(id.as_str(), target).unwrap_or_default();
    state.resources.debit_all(&cost)?;

    let duration_secs = research_time_secs(id.as_str(), target).unwrap_or(0);
    state
        .technology_timers
        .insert(format!("{}_{target}", id.as_str()), timer_from(now, duration_secs));

    info!(technology = %id, target, duration_secs, "Research started");
    Ok(target)
}

/// Recruit captains: debit the payment, then run `count` sequential
/// pulls with duplicate handling.
///
/// # Errors
///
/// Returns [`ActionError`] when the payment is unaffordable or the
/// content roster is empty.
pub fn recruit(
    state: &mut GameState,
    payment: GachaPayment,
    count: u32,
    now: i64,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Result<Vec<PullOutcome>, ActionError> {
    let (resource, per_pull) = match payment {
        GachaPayment::Diamonds => (Resource::Diamonds, config.pull_cost_diamonds),
        GachaPayment::Fragments => (Resource::Fragments, config.pull_cost_fragments),
    };
    let total = per_pull.saturating_mul(u64::from(count));
    state.resources.debit(resource, total)?;

    let outcomes = recruit_pulls(state, count, now, config.duplicate_captain_xp, rng)?;
    info!(count, ?payment, "Recruitment pulls resolved");
    Ok(outcomes)
}

/// Whether a ship class still needs research to unlock.
///
/// The sloop is always available; the larger hulls are gated behind the
/// technology whose content entry unlocks them.
fn ship_class_locked(state: &GameState, kind: ShipKind) -> bool {
    if kind == ShipKind::Sloop {
        return false;
    }
    let unlocked = windward_content::all_technologies().iter().any(|tech| {
        tech.unlocks.contains(&kind.key())
            && state.technology_level(&TechnologyId::from(tech.id)) >= 1
    });
    !unlocked
}

/// Check the unlock chain for a new building.
///
/// A technology unlock takes priority and only requires a town hall to
/// exist; otherwise every building-level prerequisite must be met.
fn check_building_prerequisites(
    state: &GameState,
    kind: BuildingKind,
) -> Result<(), ActionError> {
    let unlocked_by_tech = windward_content::all_technologies().iter().any(|tech| {
        tech.unlocks.contains(&kind.key())
            && state.technology_level(&TechnologyId::from(tech.id)) >= 1
    });
    if unlocked_by_tech {
        if state.has_building(BuildingKind::TownHall) {
            return Ok(());
        }
        return Err(ActionError::PrerequisiteNotMet {
            reason: "requires a town hall".to_owned(),
        });
    }

    let spec = building_spec(kind);
    if spec.prerequisites.is_empty() {
        if state.has_building(BuildingKind::TownHall) {
            return Ok(());
        }
        return Err(ActionError::PrerequisiteNotMet {
            reason: "requires a town hall".to_owned(),
        });
    }

    for (required, level) in &spec.prerequisites {
        if state.building_level(*required) < *level {
            return Err(ActionError::PrerequisiteNotMet {
                reason: format!("requires {} level {level}", required.key()),
            });
        }
    }
    Ok(())
}

/// Allocate a fresh `<kind>_<n>` building ID.
fn allocate_building_id(state: &GameState, kind: BuildingKind) -> BuildingId {
    let mut n = state
        .buildings
        .iter()
        .filter(|b| b.kind == kind)
        .count()
        .saturating_add(1);
    loop {
        let candidate = BuildingId::new(format!("{}_{n}", kind.key()));
        if state.building(&candidate).is_none() {
            return candidate;
        }
        n = n.saturating_add(1);
    }
}

/// Build a timer running from `now` for `duration_secs`.
fn timer_from(now: i64, duration_secs: u64) -> Timer {
    let duration_ms = i64::try_from(duration_secs.saturating_mul(1_000)).unwrap_or(i64::MAX);
    Timer::new(now, now.saturating_add(duration_ms))
}
