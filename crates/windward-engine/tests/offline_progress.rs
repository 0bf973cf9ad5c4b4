//! End-to-end catch-up tests: snapshot in, reconcile, snapshot out.
//!
//! These exercise the full offline-progress story the way the server
//! boundary uses the engine: decode a persisted snapshot, reconcile
//! against a later `now`, and verify that the client-side and
//! server-side recomputations converge on identical results.

#![allow(clippy::unwrap_used)]

use rand::rngs::SmallRng;
use rand::SeedableRng;

use windward_engine::{
    reconcile, recruit, start_construction, start_upgrade, EngineConfig, GachaPayment,
    ProgressClock,
};
use windward_types::{snapshot, BuildingId, GameState, Rarity, Resource, TechnologyId};

const MID_GAME_SAVE: &str = r#"{
    "resources": {"gold": 2500, "wood": 800, "stone": 300, "rum": 120, "food": 60, "crew": 25, "diamonds": 400, "fragments": 5},
    "buildings": [
        {"id": "town_hall_1", "type": "town_hall", "level": 2, "x": 5, "y": 2, "isConstructing": false},
        {"id": "gold_mine_1", "type": "gold_mine", "level": 3, "x": 1, "y": 1, "isConstructing": false},
        {"id": "lumber_mill_1", "type": "lumber_mill", "level": 2, "x": 2, "y": 1, "isConstructing": false},
        {"id": "quarry_1", "type": "quarry", "level": 0, "x": 3, "y": 1, "isConstructing": true}
    ],
    "ships": [],
    "captains": [{"id": "mary_read", "rarity": "common", "role": "economy", "level": 1, "xp": 0, "obtainedAt": 0}],
    "researchedTechnologies": ["advanced_mining"],
    "technologyTimers": {"navigation_1": {"startTime": 0, "endTime": 30000}},
    "timers": {
        "buildings": {"quarry_1": {"startTime": 0, "endTime": 45000}},
        "ships": {"building_sloop": {"startTime": 0, "endTime": 60000}}
    },
    "gachaPity": {"pulls": 4},
    "lastUpdate": 10000,
    "version": 3
}"#;

fn clock() -> ProgressClock {
    ProgressClock::from_config(&EngineConfig::default()).unwrap()
}

#[test]
fn offline_catchup_resolves_everything_in_one_pass() {
    // Two minutes pass while the player is offline.
    let now = 130_000;
    let mut state = snapshot::decode(MID_GAME_SAVE, now).unwrap();
    let report = reconcile(&mut state, now, &clock());

    // (130000 - 10000) / 8000 = 15 whole ticks.
    assert_eq!(report.ticks, 15);

    // Production: gold mine level 3 with advanced_mining level 1 (legacy
    // entry => level 1): floor(floor(5 * 1.69) * 1.25) = 10, then the
    // captain bonus (+5% from mary_read): floor(10 * 1.05) = 10.
    // Lumber mill level 2: floor(3 * 1.3) = 3, no bonus.
    // The quarry was constructing the whole window: nothing.
    assert_eq!(report.produced.get(&Resource::Gold), Some(&150));
    assert_eq!(report.produced.get(&Resource::Wood), Some(&45));
    assert_eq!(report.produced.get(&Resource::Stone), None);

    // All three timers were due.
    assert_eq!(
        report.completed_buildings,
        vec![BuildingId::from("quarry_1")]
    );
    assert_eq!(report.launched_ships.len(), 1);
    assert_eq!(
        report.completed_research,
        vec![(TechnologyId::from("navigation"), 1)]
    );

    // Entity state reflects the resolutions.
    let quarry = state.building(&BuildingId::from("quarry_1")).unwrap();
    assert_eq!(quarry.level, 1);
    assert!(!quarry.constructing);
    assert_eq!(state.ships.len(), 1);
    assert_eq!(state.technology_level(&TechnologyId::from("navigation")), 1);
    assert!(state.building_timers.is_empty());
    assert!(state.ship_timers.is_empty());
    assert!(state.technology_timers.is_empty());
    assert_eq!(state.last_update, now);

    // Ledger math: 2500 + 150 gold, 800 + 45 wood.
    assert_eq!(state.resources.amount(Resource::Gold), 2650);
    assert_eq!(state.resources.amount(Resource::Wood), 845);
}

#[test]
fn client_and_server_reconciliations_converge() {
    // The optimistic client and the authoritative server both decode the
    // same snapshot and reconcile at the same instant: the results must
    // be bit-identical, including the launched ship's ID.
    let now = 500_000;
    let mut client = snapshot::decode(MID_GAME_SAVE, now).unwrap();
    let mut server = snapshot::decode(MID_GAME_SAVE, now).unwrap();

    let client_report = reconcile(&mut client, now, &clock());
    let server_report = reconcile(&mut server, now, &clock());

    assert_eq!(client_report, server_report);
    assert_eq!(client, server);
    assert_eq!(
        snapshot::encode(&client).unwrap(),
        snapshot::encode(&server).unwrap()
    );
}

#[test]
fn many_small_catchups_match_one_bulk_catchup() {
    // A client polling every 8 seconds and a server reconciling once
    // after two minutes agree on production from buildings that existed
    // at the window start (floor-per-tick, so no drift accumulates). The
    // quarry that completes mid-window is the documented exception: it
    // starts producing on the pass *after* its completion, so the
    // fine-grained client sees its stone earlier than the bulk server
    // pass does.
    let final_now = 130_000;
    let mut bulk = snapshot::decode(MID_GAME_SAVE, final_now).unwrap();
    let _ = reconcile(&mut bulk, final_now, &clock());

    let mut stepped = snapshot::decode(MID_GAME_SAVE, final_now).unwrap();
    let mut now: i64 = 10_000;
    while now < final_now {
        now += 8_000;
        let _ = reconcile(&mut stepped, now.min(final_now), &clock());
    }
    let _ = reconcile(&mut stepped, final_now, &clock());

    assert_eq!(
        bulk.resources.amount(Resource::Gold),
        stepped.resources.amount(Resource::Gold)
    );
    assert_eq!(
        bulk.resources.amount(Resource::Wood),
        stepped.resources.amount(Resource::Wood)
    );
    assert_eq!(bulk.ships.len(), stepped.ships.len());
    assert_eq!(
        bulk.researched_technologies,
        stepped.researched_technologies
    );

    // The accepted next-pass policy: the bulk pass pays the completed
    // quarry nothing, the stepped passes pay it from its first full
    // post-completion pass onward.
    assert_eq!(bulk.resources.amount(Resource::Stone), 300);
    assert!(stepped.resources.amount(Resource::Stone) > 300);
}

#[test]
fn build_then_wait_then_produce() {
    // Action -> catch-up -> production: the full construction loop.
    let mut state = GameState::new_island(0);
    state.resources.credit(Resource::Gold, 10_000);
    state.resources.credit(Resource::Stone, 1_000);

    let id = start_construction(&mut state, windward_types::BuildingKind::GoldMine, 1, 1, 0)
        .unwrap();

    // The mine takes 20 seconds. After 16 seconds it is still building
    // and has produced nothing.
    let report = reconcile(&mut state, 16_000, &clock());
    assert!(report.completed_buildings.is_empty());
    assert!(report.produced.is_empty());

    // After 48 seconds the construction completed during the window, but
    // production starts on the *next* pass.
    let report = reconcile(&mut state, 48_000, &clock());
    assert_eq!(report.completed_buildings, vec![id.clone()]);
    assert!(report.produced.is_empty());

    // Eight more seconds: one tick of level-1 production (5 gold).
    let gold_before = state.resources.amount(Resource::Gold);
    let report = reconcile(&mut state, 56_000, &clock());
    assert_eq!(report.produced.get(&Resource::Gold), Some(&5));
    assert_eq!(state.resources.amount(Resource::Gold), gold_before + 5);
}

#[test]
fn upgrade_pauses_production_until_complete() {
    let now = 130_000;
    let mut state = snapshot::decode(MID_GAME_SAVE, now).unwrap();
    let _ = reconcile(&mut state, now, &clock());

    // Upgrade the gold mine to level 4; it holds the new level while
    // constructing but produces nothing.
    let target = start_upgrade(&mut state, &BuildingId::from("gold_mine_1"), now).unwrap();
    assert_eq!(target, 4);

    let report = reconcile(&mut state, now + 16_000, &clock());
    assert_eq!(report.produced.get(&Resource::Gold), None);
}

#[test]
fn pity_counters_persist_through_the_snapshot_boundary() {
    let config = EngineConfig::default();
    let now = 130_000;
    let mut state = snapshot::decode(MID_GAME_SAVE, now).unwrap();

    // Legacy `pulls: 4` seeded both counters.
    assert_eq!(state.gacha_pity.epic_pulls, 4);
    assert_eq!(state.gacha_pity.legendary_pulls, 4);

    // Walk the epic counter to the guarantee with forced state, then pull.
    state.gacha_pity.epic_pulls = 49;
    let mut rng = SmallRng::seed_from_u64(11);
    let outcomes = recruit(&mut state, GachaPayment::Diamonds, 1, now, &config, &mut rng).unwrap();
    assert_eq!(outcomes.first().unwrap().rarity, Rarity::Epic);
    assert_eq!(state.gacha_pity.epic_pulls, 0);

    // Round-trip: the reset counters survive persistence.
    let encoded = snapshot::encode(&state).unwrap();
    let restored = snapshot::decode(&encoded, now).unwrap();
    assert_eq!(restored.gacha_pity, state.gacha_pity);
    assert_eq!(restored.captains.len(), state.captains.len());
}

#[test]
fn reconcile_never_drives_resources_negative() {
    // Catch-up only ever credits; pair it with action debits and the
    // ledger still refuses deficits.
    let now = 130_000;
    let mut state = snapshot::decode(MID_GAME_SAVE, now).unwrap();
    let _ = reconcile(&mut state, now, &clock());

    // Drain gold, then try an unaffordable upgrade (gold mine level 4
    // costs 337 gold).
    let gold = state.resources.amount(Resource::Gold);
    state.resources.debit(Resource::Gold, gold).unwrap();
    let result = start_upgrade(&mut state, &BuildingId::from("gold_mine_1"), now);
    assert!(result.is_err());
    assert_eq!(state.resources.amount(Resource::Gold), 0);

    // Another catch-up window still works and stays non-negative.
    let report = reconcile(&mut state, now + 80_000, &clock());
    assert!(report.produced.get(&Resource::Gold).copied().unwrap_or(0) > 0);
}
