//! The gacha draw engine: weighted rarity draws with dual pity counters.
//!
//! Rarity selection order:
//!
//! 1. Forced legendary when the legendary counter has reached its
//!    guarantee threshold.
//! 2. Forced epic when the epic counter has reached its threshold.
//! 3. Otherwise a uniform roll in `[0, 100)` walked against the cumulative
//!    rate table (common 70, rare 25, epic 4, legendary 1).
//!
//! A legendary draw resets both counters; an epic draw resets the epic
//! counter only; common and rare draws increment both. Batch pulls thread
//! the pity state sequentially, so guarantees inside one multi-pull are
//! honored exactly as in N single pulls.
//!
//! The engine reports duplicates; converting a duplicate into an XP grant
//! is the roster-applying wrapper's concern.

use rand::Rng;
use tracing::{debug, warn};
use windward_content::{captains_by_rarity, roster, CaptainSpec, GACHA_RATES};
use windward_types::{GameState, OwnedCaptain, PityState, Rarity};

/// Errors that can occur during a draw.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GachaError {
    /// The static captain roster is empty. This is corrupt or missing
    /// content data, not a recoverable runtime condition.
    #[error("no captains configured in the content roster")]
    EmptyRoster,
}

/// The outcome of a single draw.
#[derive(Debug, Clone, Copy)]
pub struct Draw {
    /// The captain that was drawn.
    pub captain: &'static CaptainSpec,
    /// The rarity actually obtained (after any configuration-gap
    /// fallback).
    pub rarity: Rarity,
    /// Whether the captain is already owned by the caller's roster.
    pub duplicate: bool,
    /// The pity state after this draw.
    pub pity: PityState,
}

/// The roster-level outcome of one pull inside a batch.
#[derive(Debug, Clone, Copy)]
pub struct PullOutcome {
    /// The captain that was drawn.
    pub captain: &'static CaptainSpec,
    /// The rarity actually obtained.
    pub rarity: Rarity,
    /// Whether the draw was converted into an XP grant.
    pub duplicate: bool,
}

/// Perform one draw against the given pity state and owned roster.
///
/// # Errors
///
/// Returns [`GachaError::EmptyRoster`] when the content roster is
/// completely empty (fatal configuration error).
pub fn draw(
    pity: &PityState,
    owned: &[OwnedCaptain],
    rng: &mut impl Rng,
) -> Result<Draw, GachaError> {
    // Legendary pity has priority over epic pity.
    let rarity = if pity.legendary_pulls >= pity.guaranteed_legendary_at.saturating_sub(1) {
        debug!(pulls = pity.legendary_pulls, "Legendary pity triggered");
        Rarity::Legendary
    } else if pity.epic_pulls >= pity.guaranteed_epic_at.saturating_sub(1) {
        debug!(pulls = pity.epic_pulls, "Epic pity triggered");
        Rarity::Epic
    } else {
        roll_rarity(rng)
    };

    let captain = select_captain(rarity, rng)?;
    // The fallback path may have shifted the rarity; pity updates follow
    // what was actually obtained.
    let obtained = captain.rarity;
    let duplicate = owned.iter().any(|c| c.id.as_str() == captain.id);

    Ok(Draw {
        captain,
        rarity: obtained,
        duplicate,
        pity: updated_pity(pity, obtained),
    })
}

/// Perform `count` sequential pulls against the state's roster and pity,
/// applying duplicate XP grants and new-captain creation.
///
/// Payment is the caller's concern (see `actions::recruit`).
///
/// # Errors
///
/// Returns [`GachaError::EmptyRoster`] when the content roster is empty.
pub fn recruit_pulls(
    state: &mut GameState,
    count: u32,
    now: i64,
    duplicate_xp: u64,
    rng: &mut impl Rng,
) -> Result<Vec<PullOutcome>, GachaError> {
    let mut outcomes = Vec::new();
    for _ in 0..count {
        let result = draw(&state.gacha_pity, &state.captains, rng)?;
        state.gacha_pity = result.pity;

        if result.duplicate {
            if let Some(existing) = state.captain_mut(&result.captain.id.into()) {
                existing.xp = existing.xp.saturating_add(duplicate_xp);
            }
        } else {
            state.captains.push(OwnedCaptain {
                id: result.captain.id.into(),
                rarity: result.captain.rarity,
                role: result.captain.role,
                level: 1,
                xp: 0,
                obtained_at: now,
            });
        }

        outcomes.push(PullOutcome {
            captain: result.captain,
            rarity: result.rarity,
            duplicate: result.duplicate,
        });
    }
    Ok(outcomes)
}

/// Roll a rarity against the cumulative rate table.
fn roll_rarity(rng: &mut impl Rng) -> Rarity {
    let roll: f64 = rng.random_range(0.0..100.0);
    let mut cumulative: u32 = 0;
    for (rarity, rate) in GACHA_RATES {
        cumulative = cumulative.saturating_add(rate);
        if roll <= f64::from(cumulative) {
            return rarity;
        }
    }
    // The table sums to 100 and the roll is below 100, so the walk always
    // selects a band; this arm only guards a mis-edited rate table.
    Rarity::Legendary
}

/// Pick a captain uniformly among the chosen rarity, falling back to
/// legendary and then to the whole roster on configuration gaps.
fn select_captain(rarity: Rarity, rng: &mut impl Rng) -> Result<&'static CaptainSpec, GachaError> {
    let mut candidates = captains_by_rarity(rarity);
    if candidates.is_empty() {
        warn!(?rarity, "No captains configured for rarity; falling back to legendary");
        candidates = captains_by_rarity(Rarity::Legendary);
    }
    if candidates.is_empty() {
        candidates = roster().iter().collect();
    }
    if candidates.is_empty() {
        return Err(GachaError::EmptyRoster);
    }
    let index = rng.random_range(0..candidates.len());
    candidates.get(index).copied().ok_or(GachaError::EmptyRoster)
}

/// Advance the pity counters for an obtained rarity.
const fn updated_pity(pity: &PityState, obtained: Rarity) -> PityState {
    let (epic_pulls, legendary_pulls) = match obtained {
        Rarity::Legendary => (0, 0),
        Rarity::Epic => (0, pity.legendary_pulls.saturating_add(1)),
        Rarity::Common | Rarity::Rare => (
            pity.epic_pulls.saturating_add(1),
            pity.legendary_pulls.saturating_add(1),
        ),
    };
    PityState {
        epic_pulls,
        legendary_pulls,
        guaranteed_epic_at: pity.guaranteed_epic_at,
        guaranteed_legendary_at: pity.guaranteed_legendary_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn pity(epic: u32, legendary: u32) -> PityState {
        PityState {
            epic_pulls: epic,
            legendary_pulls: legendary,
            ..PityState::default()
        }
    }

    #[test]
    fn epic_pity_forces_an_epic() {
        let mut rng = SmallRng::seed_from_u64(42);
        let result = draw(&pity(49, 10), &[], &mut rng).unwrap();
        assert_eq!(result.rarity, Rarity::Epic);
        assert_eq!(result.pity.epic_pulls, 0);
        assert_eq!(result.pity.legendary_pulls, 11);
    }

    #[test]
    fn legendary_pity_has_priority_over_epic_pity() {
        let mut rng = SmallRng::seed_from_u64(42);
        let result = draw(&pity(49, 99), &[], &mut rng).unwrap();
        assert_eq!(result.rarity, Rarity::Legendary);
        assert_eq!(result.pity.epic_pulls, 0);
        assert_eq!(result.pity.legendary_pulls, 0);
    }

    #[test]
    fn common_draws_increment_both_counters() {
        // With fresh counters the overwhelmingly likely outcome over a few
        // seeds is common/rare; verify counter bookkeeping holds for
        // whatever was drawn.
        let mut rng = SmallRng::seed_from_u64(7);
        let before = pity(3, 5);
        let result = draw(&before, &[], &mut rng).unwrap();
        match result.rarity {
            Rarity::Common | Rarity::Rare => {
                assert_eq!(result.pity.epic_pulls, 4);
                assert_eq!(result.pity.legendary_pulls, 6);
            }
            Rarity::Epic => {
                assert_eq!(result.pity.epic_pulls, 0);
                assert_eq!(result.pity.legendary_pulls, 6);
            }
            Rarity::Legendary => {
                assert_eq!(result.pity.epic_pulls, 0);
                assert_eq!(result.pity.legendary_pulls, 0);
            }
        }
    }

    #[test]
    fn pity_guarantee_over_a_full_dry_run() {
        // Exactly guaranteed_legendary_at consecutive draws with no
        // legendary obtained: the final draw is forced.
        let mut state = GameState::new_island(0);
        state.gacha_pity = pity(0, 99);
        let mut rng = SmallRng::seed_from_u64(1);
        let outcomes = recruit_pulls(&mut state, 1, 0, 50, &mut rng).unwrap();
        assert_eq!(outcomes.first().unwrap().rarity, Rarity::Legendary);
    }

    #[test]
    fn multi_pull_threads_pity_sequentially() {
        // Start one short of the epic guarantee: pull 1 must be epic and
        // the remaining nine run on the post-reset counter.
        let mut state = GameState::new_island(0);
        state.gacha_pity = pity(49, 0);
        let mut rng = SmallRng::seed_from_u64(99);
        let outcomes = recruit_pulls(&mut state, 10, 0, 50, &mut rng).unwrap();

        assert_eq!(outcomes.first().unwrap().rarity, Rarity::Epic);
        // After the forced epic the counter restarted; nine more pulls can
        // push it to at most nine.
        assert!(state.gacha_pity.epic_pulls <= 9);
    }

    #[test]
    fn duplicate_grants_xp_without_growing_the_roster() {
        let mut state = GameState::new_island(0);
        state.gacha_pity = pity(49, 0);
        let mut rng = SmallRng::seed_from_u64(3);

        // Forced epic; remember who arrived.
        let first = recruit_pulls(&mut state, 1, 0, 50, &mut rng).unwrap();
        let drawn = first.first().unwrap().captain.id;
        assert_eq!(state.captains.len(), 1);

        // Force the same captain again by resetting pity to the epic
        // guarantee until the same id shows up.
        let mut duplicates: u32 = 0;
        for seed in 0..64 {
            state.gacha_pity = pity(49, 0);
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcomes = recruit_pulls(&mut state, 1, 0, 50, &mut rng).unwrap();
            let outcome = outcomes.first().unwrap();
            if outcome.captain.id == drawn {
                assert!(outcome.duplicate);
                duplicates = duplicates.saturating_add(1);
            }
        }
        assert!(duplicates > 0, "expected at least one duplicate epic draw");

        // Still one record per distinct captain; the duplicate paid XP.
        let owned = state
            .captains
            .iter()
            .filter(|c| c.id.as_str() == drawn)
            .count();
        assert_eq!(owned, 1);
        let record = state.captain(&drawn.into()).unwrap();
        assert_eq!(record.xp, u64::from(duplicates) * 50);
        assert_eq!(record.level, 1);
    }

    #[test]
    fn rarity_walk_matches_rate_bands() {
        // Statistical smoke test: over many seeded rolls the common band
        // dominates and legendary stays rare.
        let mut rng = SmallRng::seed_from_u64(1234);
        let mut commons = 0u32;
        let mut legendaries = 0u32;
        for _ in 0..2_000 {
            match roll_rarity(&mut rng) {
                Rarity::Common => commons = commons.saturating_add(1),
                Rarity::Legendary => legendaries = legendaries.saturating_add(1),
                _ => {}
            }
        }
        assert!(commons > 1_200, "common band should dominate: {commons}");
        assert!(legendaries < 100, "legendary band should be rare: {legendaries}");
    }
}
