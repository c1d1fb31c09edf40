//! End-to-end scenarios driven through the public engine API.
//!
//! Every scenario starts from the reference configuration, so the numbers
//! below follow from the default tuning and the 12x10 starting layout.

#![allow(clippy::unwrap_used)]

use blockquest_core::{
    ChanceInputs, Engine, GameConfig, MemoryStore, PROGRESS_KEY, ProgressManager, SaveStore,
    ThreatModel,
};
use blockquest_types::{BlockKind, ItemKind, Phase};

/// The eight neighbours of the anchor, a floor under it, and two caps.
const SHELTER_TILES: [(i32, i32); 15] = [
    (5, 2),
    (7, 2),
    (6, 1),
    (6, 3),
    (5, 1),
    (7, 1),
    (5, 3),
    (7, 3),
    (4, 4),
    (5, 4),
    (6, 4),
    (7, 4),
    (8, 4),
    (4, 1),
    (8, 1),
];

fn new_engine() -> Engine {
    Engine::new(GameConfig::default()).unwrap()
}

fn run(engine: &mut Engine, ticks: u32) {
    for _ in 0..ticks {
        engine.tick();
    }
}

fn build_shelter(engine: &mut Engine) {
    assert!(engine.debug_grant(ItemKind::Dirt, 7));
    for (x, y) in SHELTER_TILES {
        assert!(engine.place_item(x, y, ItemKind::Dirt), "place at ({x}, {y})");
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

#[test]
fn phases_follow_the_cycle() {
    let mut engine = new_engine();
    let mut changes = Vec::new();
    let mut previous = engine.snapshot().phase;
    for tick in 1..=185_u32 {
        engine.tick();
        let snap = engine.snapshot();
        if snap.phase != previous {
            changes.push((tick, snap.phase, snap.day_number));
            previous = snap.phase;
        }
    }
    assert_eq!(
        changes,
        vec![
            (80, Phase::Dusk, 1),
            (100, Phase::Night, 1),
            (160, Phase::Dawn, 1),
            (180, Phase::Day, 2),
        ]
    );
}

#[test]
fn full_cycle_is_a_new_day() {
    let mut engine = new_engine();
    run(&mut engine, 180);
    let snap = engine.snapshot();
    assert_eq!(snap.day_number, 2);
    assert_eq!(snap.cycle_tick, 0);
    assert_eq!(snap.phase, Phase::Day);
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[test]
fn mining_a_tree_gives_wood() {
    let mut engine = new_engine();
    assert!(engine.mine(1, 6));
    assert_eq!(engine.block_at(1, 6), BlockKind::Empty);
    assert_eq!(engine.inventory_of(ItemKind::Wood), 1);
    assert_eq!(engine.snapshot().counters.blocks_mined, 1);
}

#[test]
fn plank_bundle_converts_wood() {
    let mut engine = new_engine();
    assert!(engine.debug_grant(ItemKind::Wood, 4));
    assert!(engine.craft("plank_bundle"));
    assert_eq!(engine.inventory_of(ItemKind::Wood), 2);
    assert_eq!(engine.inventory_of(ItemKind::Plank), 2);

    let snap = engine.snapshot();
    assert!(snap.crafted_this_cycle);
    assert_eq!(snap.buddy_trust, 53);
}

#[test]
fn failed_craft_is_atomic() {
    let mut engine = new_engine();
    // Mud brick needs a wood the player does not have.
    assert!(!engine.craft("mud_brick"));
    assert_eq!(engine.inventory_of(ItemKind::Dirt), 8);
    assert_eq!(engine.inventory_of(ItemKind::Wood), 0);
    assert_eq!(engine.inventory_of(ItemKind::Stone), 2);
    assert!(!engine.snapshot().crafted_this_cycle);
}

#[test]
fn trust_never_exceeds_the_cap() {
    let mut engine = new_engine();
    assert!(engine.debug_grant(ItemKind::Wood, 40));
    for _ in 0..20 {
        assert!(engine.craft("plank_bundle"));
    }
    assert_eq!(engine.snapshot().buddy_trust, 100);
}

#[test]
fn onboarding_needs_mine_place_and_shelter() {
    let mut engine = new_engine();
    assert!(engine.mine(1, 6));
    assert!(!engine.snapshot().onboarding_complete);

    build_shelter(&mut engine);
    let snap = engine.snapshot();
    assert_eq!(snap.shelter_safety, 100);
    assert!(snap.shelter_milestone);
    assert!(snap.onboarding_complete);
}

#[test]
fn easy_mode_toggle_lowers_the_threat() {
    let mut engine = new_engine();
    engine.toggle_easy_mode();
    assert!(engine.snapshot().easy_mode);

    let model = ThreatModel::new(engine.config().threat.clone());
    let mut inputs = ChanceInputs {
        shelter_score: 30,
        day: 4,
        threat: 3,
        boss_active: false,
        easy_mode: false,
        grace_nights: 0,
    };
    let normal = model.chance(&inputs);
    inputs.easy_mode = true;
    assert!(model.chance(&inputs) < normal);
    assert!(model.cooldown(4, true) > model.cooldown(4, false));
}

// ---------------------------------------------------------------------------
// Shelter
// ---------------------------------------------------------------------------

#[test]
fn walls_never_lower_safety() {
    let mut engine = new_engine();
    let mut safety = engine.snapshot().shelter_safety;
    for (x, y) in SHELTER_TILES {
        assert!(engine.debug_set_block(x, y, BlockKind::Stone));
        let next = engine.snapshot().shelter_safety;
        assert!(next >= safety, "safety dropped at ({x}, {y})");
        safety = next;
    }
    assert_eq!(safety, 100);
}

#[test]
fn enclosed_shelter_scores_and_builds_trust() {
    let mut engine = new_engine();
    build_shelter(&mut engine);
    let snap = engine.snapshot();
    assert_eq!(snap.shelter_score, 72);
    assert_eq!(snap.buddy_trust, 80);
    // Placements alone do not complete onboarding.
    assert!(!snap.onboarding_complete);
}

// ---------------------------------------------------------------------------
// Nights, rescues, and the sky wyrm
// ---------------------------------------------------------------------------

#[test]
fn open_sky_survival_run() {
    let mut engine = new_engine();
    for _ in 0..520 {
        engine.tick();
        let snap = engine.snapshot();
        assert!((1..=3).contains(&snap.hearts));
        assert!(snap.buddy_trust <= 100);
    }
    let snap = engine.snapshot();
    assert_eq!(snap.day_number, 3);
    assert_eq!(snap.counters.sky_wyrm_events, 1);
    assert!(snap.counters.boom_sprout_threat >= 1);
    assert!(snap.counters.rescued_count >= 1);
    assert!(snap.consecutive_rescues >= 2);
    assert!(snap.adaptive_grace_nights >= 1);
}

#[test]
fn sky_wyrm_comes_every_third_night() {
    let mut engine = new_engine();
    let mut boss_days = Vec::new();
    for _ in 0..(9 * 180 + 1) {
        engine.tick();
        let snap = engine.snapshot();
        if snap.boss_event_active && boss_days.last() != Some(&snap.day_number) {
            boss_days.push(snap.day_number);
        }
    }
    assert_eq!(boss_days, vec![3, 6, 9]);
    assert_eq!(engine.snapshot().counters.sky_wyrm_events, 3);
}

#[test]
fn sheltered_sky_wyrm_night_pays_out_at_sunrise() {
    let mut engine = new_engine();
    build_shelter(&mut engine);
    // Day 3, last tick of dawn.
    run(&mut engine, 2 * 180 + 179);
    let before = engine.snapshot();
    assert_eq!((before.day_number, before.cycle_tick), (3, 179));
    assert!(before.boss_event_active);
    assert!(before.boss_reward_pending);

    engine.tick();
    let after = engine.snapshot();
    assert_eq!(after.day_number, 4);
    assert!(!after.boss_event_active);
    assert!(!after.boss_reward_pending);
    assert!(after.stars >= before.stars.saturating_add(3));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn save_and_restore_is_lossless() {
    let mut engine = new_engine();
    assert!(engine.mine(1, 6));
    assert!(engine.place_item(5, 2, ItemKind::Dirt));
    engine.toggle_mode();
    run(&mut engine, 250);

    let payload = engine.to_save_payload();
    let restored = Engine::from_payload(GameConfig::default(), &payload).unwrap();
    assert_eq!(restored.to_save_payload(), payload);
    assert_eq!(restored.block_at(1, 6), BlockKind::Empty);
    assert_eq!(restored.block_at(5, 2), BlockKind::Dirt);

    let (a, b) = (engine.snapshot(), restored.snapshot());
    assert_eq!(a.day_number, b.day_number);
    assert_eq!(a.cycle_tick, b.cycle_tick);
    assert_eq!(a.inventory, b.inventory);
    assert_eq!(a.mode, b.mode);
    assert_eq!(a.shelter_score, b.shelter_score);
}

#[test]
fn corrupted_payload_starts_fresh() {
    let restored = Engine::from_payload(GameConfig::default(), "not|a|save|at all").unwrap();
    assert_eq!(restored.snapshot(), new_engine().snapshot());

    let truncated = new_engine().to_save_payload();
    let half = truncated.get(..truncated.len().div_euclid(2)).unwrap();
    let restored = Engine::from_payload(GameConfig::default(), half).unwrap();
    assert_eq!(restored.snapshot(), new_engine().snapshot());
}

/// Replace scalar `index` in the last payload section.
fn with_scalar(payload: &str, index: usize, value: &str) -> String {
    let (head, scalars) = payload.rsplit_once('|').unwrap();
    let mut fields: Vec<&str> = scalars.split(',').collect();
    fields[index] = value;
    format!("{head}|{}", fields.join(","))
}

#[test]
fn inflated_grace_or_hints_start_fresh() {
    let payload = new_engine().to_save_payload();
    for (index, value) in [(26, "1000"), (24, "999")] {
        let broken = with_scalar(&payload, index, value);
        let restored = Engine::from_payload(GameConfig::default(), &broken).unwrap();
        let snap = restored.snapshot();
        assert_eq!(snap, new_engine().snapshot(), "scalar {index} = {value}");
        assert_eq!(snap.adaptive_grace_nights, 0);
    }
}

#[test]
fn resume_through_progress_manager() {
    let mut progress = ProgressManager::new(MemoryStore::new());
    let fresh = Engine::resume(GameConfig::default(), &progress).unwrap();
    assert_eq!(fresh.snapshot().day_number, 1);

    let mut engine = fresh;
    run(&mut engine, 200);
    assert!(engine.mine(10, 5));
    engine.save_to(&mut progress).unwrap();
    assert!(progress.store().get(PROGRESS_KEY).is_some());

    let resumed = Engine::resume(GameConfig::default(), &progress).unwrap();
    assert_eq!(resumed.snapshot().day_number, 2);
    assert_eq!(resumed.inventory_of(ItemKind::Wood), engine.inventory_of(ItemKind::Wood));
    assert_eq!(resumed.to_save_payload(), engine.to_save_payload());
}
