use oops_i_missed::assets::AssetStore;
use oops_i_missed::compute::*;
use oops_i_missed::config::GameConfig;
use oops_i_missed::entities::*;
use oops_i_missed::motion::FlightMode;
use oops_i_missed::score_store::HighScoreStore;

use rand::rngs::StdRng;
use rand::SeedableRng;

const BOUNDS: Bounds = Bounds {
    width: 100.0,
    height: 40.0,
};
const DT: f32 = 1.0 / 60.0;
/// Below the band birds spawn in, so nothing is ever under it.
const EMPTY_SKY: Vec2 = Vec2 { x: 50.0, y: 35.0 };

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_round() -> Round {
    let store = AssetStore::bundled().unwrap();
    init_round(&GameConfig::default(), &store, BOUNDS, 30, &mut seeded_rng()).unwrap()
}

fn idle(elapsed: f32) -> FrameInput {
    FrameInput {
        elapsed,
        events: Vec::new(),
        pointer: EMPTY_SKY,
        bounds: BOUNDS,
    }
}

fn fire_at(x: f32, y: f32) -> FrameInput {
    FrameInput {
        elapsed: DT,
        events: vec![InputEvent::Fire { x, y }],
        pointer: Vec2::new(x, y),
        bounds: BOUNDS,
    }
}

fn place(round: &mut Round, kind: TargetKind, x: f32, y: f32) {
    let target = round.target_mut(kind).unwrap();
    target.bounds.x = x;
    target.bounds.y = y;
}

/// Let the shotgun finish its animation and cooldown (0.9 s of idle frames).
fn reload(round: &Round, rng: &mut StdRng) -> Round {
    let mut r = round.clone();
    for _ in 0..6 {
        r = tick(&r, &idle(0.15), rng);
    }
    r
}

// ── init_round ────────────────────────────────────────────────────────────────

#[test]
fn init_round_starts_clean() {
    let r = make_round();
    assert_eq!(r.score, 0);
    assert_eq!(r.streak, 0);
    assert_eq!(r.missed_shots, 0);
    assert_eq!(r.high_score, 30);
    assert_eq!(r.status, RoundStatus::Playing);
    assert!(!r.collision_armed);
}

#[test]
fn init_round_only_basic_tiers_fly() {
    let r = make_round();
    let kinds: Vec<TargetKind> = r.targets.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, TargetKind::ALL.to_vec());
    assert!(r.target(TargetKind::WhiteBird).unwrap().active);
    assert!(r.target(TargetKind::BlueBird).unwrap().active);
    assert!(!r.target(TargetKind::TurboBird).unwrap().active);
    assert!(!r.target(TargetKind::Monster).unwrap().active);
}

#[test]
fn init_round_point_values() {
    let r = make_round();
    let points: Vec<i32> = r.targets.iter().map(|t| t.points).collect();
    assert_eq!(points, vec![1, 2, 4, 10]);
}

#[test]
fn init_round_rejects_bad_config() {
    let store = AssetStore::bundled().unwrap();
    let config = GameConfig {
        hit_cooldown: 0.0,
        ..GameConfig::default()
    };
    let err = init_round(&config, &store, BOUNDS, 0, &mut seeded_rng()).unwrap_err();
    assert!(matches!(err, oops_i_missed::error::GameError::Configuration { .. }));
}

#[test]
fn attract_round_flies_turbo_but_not_monster() {
    let store = AssetStore::bundled().unwrap();
    let r = init_attract_round(&GameConfig::default(), &store, BOUNDS, &mut seeded_rng()).unwrap();
    assert!(r.target(TargetKind::TurboBird).unwrap().active);
    assert!(!r.target(TargetKind::Monster).unwrap().active);
}

// ── tick — hits ───────────────────────────────────────────────────────────────

#[test]
fn tick_hit_scores_and_respawns() {
    let mut r = make_round();
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    let r2 = tick(&r, &fire_at(51.0, 10.5), &mut seeded_rng());
    assert_eq!(r2.score, 1);
    assert_eq!(r2.streak, 1);
    assert_eq!(r2.missed_shots, 0);
    let white = r2.target(TargetKind::WhiteBird).unwrap();
    assert!(!white.bounds.contains(Vec2::new(51.0, 10.5)));
    assert_eq!(white.since_hit, 0.0);
}

#[test]
fn tick_monster_scores_ten() {
    let mut r = make_round();
    r.streak = 8;
    r = tick(&r, &idle(0.0), &mut seeded_rng());
    assert!(r.target(TargetKind::Monster).unwrap().active);
    for kind in [TargetKind::WhiteBird, TargetKind::BlueBird, TargetKind::TurboBird] {
        place(&mut r, kind, -500.0, -500.0);
    }
    place(&mut r, TargetKind::Monster, 20.0, 5.0);
    let r2 = tick(&r, &fire_at(21.0, 6.0), &mut seeded_rng());
    assert_eq!(r2.score, 10);
    assert_eq!(r2.streak, 9);
}

#[test]
fn tick_only_first_tier_is_credited() {
    let mut r = make_round();
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    place(&mut r, TargetKind::BlueBird, 50.0, 10.0);
    let r2 = tick(&r, &fire_at(51.0, 10.5), &mut seeded_rng());
    assert_eq!(r2.score, 1); // white (1), not white + blue (3)
    assert_eq!(r2.streak, 1);
    let blue = r2.target(TargetKind::BlueBird).unwrap();
    assert!((blue.bounds.x - 50.0).abs() < 1.0); // drifted, not respawned
}

#[test]
fn tick_outside_every_box_is_never_a_hit() {
    let mut r = make_round();
    r.streak = 3;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(r2.score, 0);
    assert_eq!(r2.streak, 0);
    assert_eq!(r2.missed_shots, 1);
}

#[test]
fn tick_inactive_tier_cannot_be_hit() {
    let mut r = make_round();
    place(&mut r, TargetKind::TurboBird, 50.0, 10.0);
    let r2 = tick(&r, &fire_at(51.0, 10.5), &mut seeded_rng());
    assert_eq!(r2.score, 0);
    assert_eq!(r2.missed_shots, 1);
}

#[test]
fn tick_hit_cooldown_blocks_quick_second_hit() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    r = tick(&r, &fire_at(51.0, 10.5), &mut rng);
    assert_eq!(r.score, 1);

    // Weapon ready again after 0.9 s, but the bird's 1.2 s window is still open.
    r = reload(&r, &mut rng);
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    place(&mut r, TargetKind::BlueBird, -500.0, -500.0);
    r = tick(&r, &fire_at(51.0, 10.5), &mut rng);
    assert_eq!(r.score, 1);
    assert_eq!(r.missed_shots, 1);

    r = reload(&r, &mut rng);
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    r = tick(&r, &fire_at(51.0, 10.5), &mut rng);
    assert_eq!(r.score, 2);
}

// ── tick — collision gating ──────────────────────────────────────────────────

#[test]
fn tick_no_hit_pass_without_a_shot() {
    let mut r = make_round();
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    let input = FrameInput {
        pointer: Vec2::new(51.0, 10.5),
        ..idle(DT)
    };
    let r2 = tick(&r, &input, &mut seeded_rng());
    assert_eq!(r2.score, 0);
    assert_eq!(r2.missed_shots, 0);
}

#[test]
fn tick_animation_does_not_rearm_collision() {
    let mut rng = seeded_rng();
    let mut r = tick(&make_round(), &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
    assert_eq!(r.missed_shots, 1);
    assert!(r.weapon.is_shooting());
    assert!(!r.collision_armed);

    // The recoil animation keeps playing, but no further passes happen.
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    let input = FrameInput {
        pointer: Vec2::new(51.0, 10.5),
        ..idle(0.1)
    };
    let r2 = tick(&r, &input, &mut rng);
    assert_eq!(r2.score, 0);
    assert_eq!(r2.missed_shots, 1);
}

#[test]
fn tick_two_clicks_in_one_frame_fire_once() {
    let input = FrameInput {
        events: vec![
            InputEvent::Fire {
                x: EMPTY_SKY.x,
                y: EMPTY_SKY.y,
            },
            InputEvent::Fire {
                x: EMPTY_SKY.x,
                y: EMPTY_SKY.y,
            },
        ],
        ..idle(DT)
    };
    let r2 = tick(&make_round(), &input, &mut seeded_rng());
    assert_eq!(r2.missed_shots, 1);
    assert_eq!(r2.cues, vec![AudioCue::Fire, AudioCue::Reload]);
}

#[test]
fn tick_click_during_cooldown_is_ignored() {
    let mut rng = seeded_rng();
    let r = tick(&make_round(), &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
    assert_eq!(r2.missed_shots, 1);
    assert!(r2.cues.is_empty());
}

// ── tick — misses ─────────────────────────────────────────────────────────────

#[test]
fn tick_penalty_only_past_threshold() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    r.missed_shots = 4;
    for _ in 0..3 {
        r = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
        r = reload(&r, &mut rng);
    }
    assert_eq!(r.missed_shots, 7);
    assert_eq!(r.score, -20); // 6th and 7th misses only
}

#[test]
fn tick_penalty_reapplies_on_every_later_miss() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    r.missed_shots = 5;
    r.score = 100;
    for expected in [90, 80, 70] {
        r = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
        assert_eq!(r.score, expected);
        r = reload(&r, &mut rng);
    }
}

#[test]
fn tick_score_can_go_negative() {
    let mut r = make_round();
    r.missed_shots = 7;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(r2.score, -10);
}

// ── tick — tier unlocks ──────────────────────────────────────────────────────

#[test]
fn tick_sixth_hit_unlocks_turbo() {
    let mut r = make_round();
    r.streak = 5;
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    let r2 = tick(&r, &fire_at(51.0, 10.5), &mut seeded_rng());
    assert_eq!(r2.streak, 6);
    let turbo = r2.target(TargetKind::TurboBird).unwrap();
    assert!(turbo.active);
    assert!(!r2.target(TargetKind::Monster).unwrap().active);
}

#[test]
fn tick_unlocked_turbo_spawns_offscreen() {
    let mut r = make_round();
    r.streak = 6;
    let r2 = tick(&r, &idle(0.0), &mut seeded_rng());
    let turbo = r2.target(TargetKind::TurboBird).unwrap();
    assert!(turbo.bounds.right() <= 0.0 || turbo.bounds.x >= BOUNDS.width);
}

#[test]
fn tick_unlock_survives_streak_reset() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    r.streak = 6;
    r = tick(&r, &idle(DT), &mut rng);
    r = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
    assert_eq!(r.streak, 0);
    assert!(r.target(TargetKind::TurboBird).unwrap().active);
}

#[test]
fn tick_unlock_is_idempotent() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    r.streak = 7;
    r = tick(&r, &idle(0.0), &mut rng);
    r = tick(&r, &idle(0.25), &mut rng);
    let phase = |r: &Round| {
        r.target(TargetKind::TurboBird)
            .unwrap()
            .motion
            .as_oscillating()
            .unwrap()
            .elapsed()
    };
    assert!((phase(&r) - 0.25).abs() < 1e-6);

    // Still above the threshold: a second unlock would restart the flight.
    let r2 = tick(&r, &idle(0.0), &mut rng);
    assert!((phase(&r2) - 0.25).abs() < 1e-6);
}

#[test]
fn tick_eighth_hit_unlocks_monster() {
    let mut r = make_round();
    r.streak = 7;
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    let r2 = tick(&r, &fire_at(51.0, 10.5), &mut seeded_rng());
    assert_eq!(r2.streak, 8);
    assert!(r2.target(TargetKind::TurboBird).unwrap().active);
    assert!(r2.target(TargetKind::Monster).unwrap().active);
}

// ── tick — session end ───────────────────────────────────────────────────────

#[test]
fn tick_tenth_miss_ends_round() {
    let mut r = make_round();
    r.missed_shots = 9;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(r2.missed_shots, 10);
    assert_eq!(r2.status, RoundStatus::Over);
}

#[test]
fn tick_round_over_is_frozen() {
    let mut r = make_round();
    r.missed_shots = 9;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    let before = r2.target(TargetKind::WhiteBird).unwrap().bounds;
    let r3 = tick(&r2, &idle(0.5), &mut seeded_rng());
    assert_eq!(r3.status, RoundStatus::Over);
    assert_eq!(r3.target(TargetKind::WhiteBird).unwrap().bounds, before);
}

#[test]
fn round_end_persists_beaten_high_score() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score"));
    store.save(30).unwrap();

    let mut r = make_round();
    r.high_score = store.load();
    r.missed_shots = 9;
    r.score = 52; // the tenth miss costs 10
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(r2.score, 42);

    let best = conclude_round(&r2);
    assert_eq!(best, Some(42));
    store.save(best.unwrap()).unwrap();
    assert_eq!(store.load(), 42);
}

#[test]
fn round_end_keeps_higher_stored_score() {
    let mut r = make_round();
    r.high_score = 30;
    r.missed_shots = 9;
    r.score = 30;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(r2.score, 20);
    assert_eq!(conclude_round(&r2), None);
}

// ── tick — flight modes ──────────────────────────────────────────────────────

fn turbo_mode(r: &Round) -> FlightMode {
    r.target(TargetKind::TurboBird)
        .unwrap()
        .motion
        .as_oscillating()
        .unwrap()
        .mode()
}

#[test]
fn tick_oscillating_birds_toggle_every_interval() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    r.streak = 6;
    r = tick(&r, &idle(0.0), &mut rng);
    assert!(r.target(TargetKind::TurboBird).unwrap().active);

    // 0.25 s frames: the 1.0 s interval closes on every fourth frame.
    for frame in 1..=12u32 {
        r = tick(&r, &idle(0.25), &mut rng);
        let expected = if (frame / 4) % 2 == 0 {
            FlightMode::Wavy
        } else {
            FlightMode::Straight
        };
        assert_eq!(turbo_mode(&r), expected, "frame {frame}");
    }
}

#[test]
fn tick_locked_birds_never_toggle() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    for _ in 0..12 {
        r = tick(&r, &idle(0.25), &mut rng);
    }
    for kind in [TargetKind::TurboBird, TargetKind::Monster] {
        let target = r.target(kind).unwrap();
        assert!(!target.active);
        assert_eq!(target.since_toggle, 0.0);
        assert_eq!(
            target.motion.as_oscillating().unwrap().mode(),
            FlightMode::Wavy
        );
    }
}

#[test]
fn tick_toggle_clock_starts_at_unlock() {
    let mut rng = seeded_rng();
    let mut r = make_round();
    for _ in 0..12 {
        r = tick(&r, &idle(0.25), &mut rng);
    }
    r.streak = 6;
    r = tick(&r, &idle(0.0), &mut rng);
    for _ in 0..3 {
        r = tick(&r, &idle(0.25), &mut rng);
        assert_eq!(turbo_mode(&r), FlightMode::Wavy);
    }
    r = tick(&r, &idle(0.25), &mut rng);
    assert_eq!(turbo_mode(&r), FlightMode::Straight);
}

// ── tick — weapon ────────────────────────────────────────────────────────────

#[test]
fn tick_recoil_starts_on_the_frame_after_the_shot() {
    let mut rng = seeded_rng();
    let input = FrameInput {
        elapsed: 0.15,
        ..fire_at(EMPTY_SKY.x, EMPTY_SKY.y)
    };
    let r = tick(&make_round(), &input, &mut rng);
    assert!(r.weapon.is_shooting());
    assert_eq!(r.weapon.frame(), 0);

    let r2 = tick(&r, &idle(0.1), &mut rng);
    assert_eq!(r2.weapon.frame(), 1);
}

// ── tick — other input ───────────────────────────────────────────────────────

#[test]
fn tick_quit_and_escape_end_round() {
    for event in [InputEvent::Quit, InputEvent::Escape] {
        let input = FrameInput {
            events: vec![event],
            ..idle(DT)
        };
        let r2 = tick(&make_round(), &input, &mut seeded_rng());
        assert_eq!(r2.status, RoundStatus::Quit);
    }
}

#[test]
fn tick_quit_halts_before_the_shot_is_resolved() {
    let input = FrameInput {
        events: vec![
            InputEvent::Quit,
            InputEvent::Fire {
                x: EMPTY_SKY.x,
                y: EMPTY_SKY.y,
            },
        ],
        ..idle(DT)
    };
    let r2 = tick(&make_round(), &input, &mut seeded_rng());
    assert_eq!(r2.status, RoundStatus::Quit);
    assert_eq!(r2.missed_shots, 0);
}

#[test]
fn tick_cursor_lock_confines_aim() {
    let lock = FrameInput {
        events: vec![InputEvent::ToggleCursorLock],
        ..idle(DT)
    };
    let mut rng = seeded_rng();
    let r = tick(&make_round(), &lock, &mut rng);
    assert!(r.cursor_locked);

    let far = FrameInput {
        pointer: Vec2::new(500.0, 500.0),
        ..idle(DT)
    };
    let r2 = tick(&r, &far, &mut rng);
    assert_eq!(r2.aim, Vec2::new(99.0, 26.0)); // floor(40 / 1.5)

    let r3 = tick(&r2, &lock, &mut rng);
    assert!(!r3.cursor_locked);
    let r4 = tick(&r3, &far, &mut rng);
    assert_eq!(r4.aim, Vec2::new(500.0, 500.0));
}

#[test]
fn tick_cues_last_one_frame() {
    let mut rng = seeded_rng();
    let r = tick(&make_round(), &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut rng);
    assert_eq!(r.cues, vec![AudioCue::Fire, AudioCue::Reload]);
    let r2 = tick(&r, &idle(DT), &mut rng);
    assert!(r2.cues.is_empty());
}

#[test]
fn tick_aims_weapon_at_pointer() {
    let r = make_round();
    let origin = weapon_origin(&r);
    let input = FrameInput {
        pointer: Vec2::new(origin.x + 20.0, origin.y - 2.0),
        ..idle(DT)
    };
    let r2 = tick(&r, &input, &mut seeded_rng());
    assert!((r2.weapon.angle() - (-9.0)).abs() < 1e-4);
}

#[test]
fn tick_increments_frame() {
    let mut r = make_round();
    r.frame = 5;
    let r2 = tick(&r, &idle(DT), &mut seeded_rng());
    assert_eq!(r2.frame, 6);
}

#[test]
fn tick_does_not_mutate_original() {
    let mut r = make_round();
    place(&mut r, TargetKind::WhiteBird, 50.0, 10.0);
    let _ = tick(&r, &fire_at(51.0, 10.5), &mut seeded_rng());
    assert_eq!(r.score, 0);
    assert_eq!(r.target(TargetKind::WhiteBird).unwrap().bounds.x, 50.0);
}

// ── compose_scene ─────────────────────────────────────────────────────────────

#[test]
fn scene_draw_order_skips_locked_tiers() {
    let r = make_round();
    let scene = compose_scene(&r);
    let assets: Vec<AssetId> = scene
        .draws
        .iter()
        .map(|d| d.asset)
        .filter(|a| *a != AssetId::Landscape)
        .collect();
    assert_eq!(
        assets,
        vec![AssetId::Shotgun, AssetId::WhiteBird, AssetId::BlueBird]
    );
    assert_eq!(scene.draws[0].asset, AssetId::Landscape);
}

#[test]
fn scene_background_covers_width() {
    let r = make_round();
    let scene = compose_scene(&r);
    let tiles: Vec<&DrawCommand> = scene
        .draws
        .iter()
        .filter(|d| d.asset == AssetId::Landscape)
        .collect();
    let last = tiles.last().unwrap();
    assert!(last.position.x + last.source.width as f32 >= BOUNDS.width);
}

#[test]
fn scene_mirrors_birds_flying_left() {
    let r = make_round();
    let scene = compose_scene(&r);
    for target in r.targets.iter().filter(|t| t.active) {
        let cmd = scene.draws.iter().find(|d| d.asset == target.kind.asset()).unwrap();
        let expected = match target.motion.direction() {
            Direction::LeftToRight => 1.0,
            Direction::RightToLeft => -1.0,
        };
        assert_eq!(cmd.scale.x, expected);
    }
}

#[test]
fn scene_hud_text() {
    let mut r = make_round();
    r.score = 12;
    r.streak = 3;
    r.missed_shots = 2;
    let hud = compose_scene(&r).hud;
    assert_eq!(hud.score, "Score: 12");
    assert_eq!(hud.high_score, "High Score: 30");
    assert_eq!(hud.streak, "Streak: 3");
    assert_eq!(hud.misses, "Misses X 2");
}

#[test]
fn scene_game_over_summary() {
    let mut r = make_round();
    assert!(compose_scene(&r).game_over.is_none());
    r.missed_shots = 9;
    r.score = 15;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    let (title, summary) = compose_scene(&r2).game_over.unwrap();
    assert_eq!(title, "Game Over");
    assert_eq!(summary, "Final Score: 5");
}

#[test]
fn scene_game_over_shows_new_record() {
    let mut r = make_round();
    r.missed_shots = 9;
    r.score = 52;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(compose_scene(&r2).hud.high_score, "High Score: 42");
}

#[test]
fn scene_game_over_keeps_standing_record() {
    let mut r = make_round();
    r.missed_shots = 9;
    r.score = 15;
    let r2 = tick(&r, &fire_at(EMPTY_SKY.x, EMPTY_SKY.y), &mut seeded_rng());
    assert_eq!(compose_scene(&r2).hud.high_score, "High Score: 30");
}
