/// Round logic.
///
/// `tick` takes the current `Round` plus one frame of input and returns the
/// next `Round`.  Side effects are limited to the injected RNG (respawn rows
/// and sides), so a seeded RNG replays a round exactly.

use rand::Rng;

use crate::assets::AssetStore;
use crate::config::GameConfig;
use crate::entities::{
    AssetId, Bounds, DrawCommand, FrameInput, HudText, InputEvent, Rect, Round, RoundStatus,
    Scene, Target, TargetKind, Vec2,
};
use crate::error::GameError;
use crate::motion::{LinearMotion, Motion, OscillatingMotion};
use crate::sprite::{AnimatedSprite, FrameRect, Playback};
use crate::weapon::WeaponState;

// ── Constructors ─────────────────────────────────────────────────────────────

fn build_target(
    kind: TargetKind,
    config: &GameConfig,
    store: &AssetStore,
) -> Result<Target, GameError> {
    let tuning = config.tuning(kind);
    let sprite = AnimatedSprite::new(
        kind.asset(),
        store.geometry(kind.asset())?,
        config.bird_frame_duration,
        Playback::Cyclic,
    )?;
    let (w, h) = sprite.frame_size();
    let motion = match kind {
        TargetKind::WhiteBird | TargetKind::BlueBird => {
            Motion::Linear(LinearMotion::new(tuning.speed))
        }
        TargetKind::TurboBird | TargetKind::Monster => Motion::Oscillating(
            OscillatingMotion::new(tuning.speed, tuning.amplitude, tuning.frequency),
        ),
    };
    Ok(Target {
        kind,
        sprite,
        bounds: Rect {
            x: 0.0,
            y: 0.0,
            width: w as f32,
            height: h as f32,
        },
        motion,
        points: tuning.points,
        active: false,
        since_hit: config.hit_cooldown,
        since_toggle: 0.0,
    })
}

/// Bring a bird into play at a fresh off-screen spawn point.
fn activate(target: &mut Target, bounds: Bounds, rng: &mut impl Rng) {
    target.active = true;
    target.since_toggle = 0.0;
    target.motion.reset(&mut target.bounds, bounds, rng);
}

/// Build the state for a new round: the white and blue birds already flying,
/// the turbo bird and monster waiting for their streaks.
pub fn init_round(
    config: &GameConfig,
    store: &AssetStore,
    bounds: Bounds,
    high_score: i32,
    rng: &mut impl Rng,
) -> Result<Round, GameError> {
    config.validate()?;

    let mut targets = Vec::with_capacity(TargetKind::ALL.len());
    for kind in TargetKind::ALL {
        let mut target = build_target(kind, config, store)?;
        if kind.starts_active() {
            activate(&mut target, bounds, rng);
        }
        targets.push(target);
    }

    let weapon_sprite = AnimatedSprite::new(
        AssetId::Shotgun,
        store.geometry(AssetId::Shotgun)?,
        config.weapon_frame_duration,
        Playback::OneShot,
    )?;

    tracing::info!(
        width = bounds.width,
        height = bounds.height,
        high_score,
        "round started"
    );

    Ok(Round {
        targets,
        weapon: WeaponState::new(weapon_sprite, config.fire_cooldown),
        score: 0,
        high_score,
        streak: 0,
        missed_shots: 0,
        status: RoundStatus::Playing,
        collision_armed: false,
        cursor_locked: false,
        aim: Vec2::new((bounds.width / 3.0).floor(), (bounds.height / 2.0).floor()),
        cues: Vec::new(),
        frame: 0,
        bounds,
        backdrop: store.geometry(AssetId::Landscape)?,
        config: config.clone(),
    })
}

/// Birds flying behind the title menu: everything but the monster, no scoring.
pub fn init_attract_round(
    config: &GameConfig,
    store: &AssetStore,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> Result<Round, GameError> {
    let mut round = init_round(config, store, bounds, 0, rng)?;
    if let Some(turbo) = round.target_mut(TargetKind::TurboBird) {
        activate(turbo, bounds, rng);
    }
    Ok(round)
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Muzzle of the weapon: top-centre of its frame, bottom-centre of the screen.
pub fn weapon_origin(round: &Round) -> Vec2 {
    let (_, h) = round.weapon.sprite().frame_size();
    Vec2::new(
        (round.bounds.width / 2.0).floor(),
        round.bounds.height - h as f32,
    )
}

/// With the cursor locked, aim stays inside the window and above the
/// configured fraction of its height.
fn confine_aim(round: &Round, p: Vec2) -> Vec2 {
    if !round.cursor_locked {
        return p;
    }
    let max_x = (round.bounds.width - 1.0).max(0.0);
    let max_y = (round.bounds.height * round.config.cursor_lock_height_ratio)
        .floor()
        .max(0.0);
    Vec2::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
}

/// New high score to persist, if the round beat the old one.
pub fn conclude_round(round: &Round) -> Option<i32> {
    (round.score > round.high_score).then_some(round.score)
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the round by one frame.
///
/// Order: clocks, input, weapon animation, hit test (only on the frame a shot
/// fired), tier unlocks, session end, bird movement, aim.
pub fn tick(state: &Round, input: &FrameInput, rng: &mut impl Rng) -> Round {
    let mut round = state.clone();
    round.frame += 1;
    round.cues.clear();
    if round.status != RoundStatus::Playing {
        return round;
    }
    round.bounds = input.bounds;
    let dt = input.elapsed.max(0.0);

    // ── 0. Clocks ────────────────────────────────────────────────────────────
    round.weapon.advance(dt);
    for target in round.targets.iter_mut() {
        target.since_hit += dt;
        if target.active {
            target.since_toggle += dt;
        }
    }

    // ── 1. Input ─────────────────────────────────────────────────────────────
    round.aim = confine_aim(&round, input.pointer);
    let mut fired = false;
    for event in &input.events {
        match *event {
            InputEvent::Quit | InputEvent::Escape => {
                tracing::info!(score = round.score, "round abandoned");
                round.status = RoundStatus::Quit;
                return round;
            }
            InputEvent::ToggleCursorLock => {
                round.cursor_locked = !round.cursor_locked;
                round.aim = confine_aim(&round, round.aim);
            }
            InputEvent::Fire { x, y } => {
                round.aim = confine_aim(&round, Vec2::new(x, y));
                if round.weapon.try_fire(&mut round.cues) {
                    round.collision_armed = true;
                    fired = true;
                }
            }
        }
    }

    // ── 2. Weapon animation ──────────────────────────────────────────────────
    // A shot fired this frame starts its recoil clock from zero.
    if !fired {
        round.weapon.advance_animation(dt);
    }

    // ── 3–4. One hit pass per shot ───────────────────────────────────────────
    if round.collision_armed {
        resolve_shot(&mut round, rng);
    }
    round.collision_armed = false;

    // ── 5. Tier unlocks ──────────────────────────────────────────────────────
    unlock_tiers(&mut round, rng);

    // ── 6. Session end ───────────────────────────────────────────────────────
    if round.missed_shots >= round.config.session_end_misses {
        tracing::info!(
            score = round.score,
            high_score = round.high_score,
            missed = round.missed_shots,
            "round over"
        );
        round.status = RoundStatus::Over;
        return round;
    }

    // ── 7. Birds ─────────────────────────────────────────────────────────────
    advance_targets(&mut round, dt, rng);

    // ── 8. Aim ───────────────────────────────────────────────────────────────
    let origin = weapon_origin(&round);
    let aim = round.aim;
    round.weapon.aim_at(aim, origin);

    round
}

/// Credit the first bird (in tier order) under the aim point whose hit
/// cooldown has run out, or count a miss.
fn resolve_shot(round: &mut Round, rng: &mut impl Rng) {
    let aim = round.aim;
    let bounds = round.bounds;
    let cooldown = round.config.hit_cooldown;

    let hit = round
        .targets
        .iter_mut()
        .find(|t| t.active && t.bounds.contains(aim) && t.since_hit >= cooldown);

    match hit {
        Some(target) => {
            target.motion.reset(&mut target.bounds, bounds, rng);
            target.since_hit = 0.0;
            round.score += target.points;
            round.streak += 1;
            tracing::debug!(
                kind = ?target.kind,
                score = round.score,
                streak = round.streak,
                "hit"
            );
        }
        None => {
            round.missed_shots += 1;
            round.streak = 0;
            if round.missed_shots > round.config.miss_penalty_threshold {
                round.score -= round.config.miss_penalty;
            }
            tracing::debug!(missed = round.missed_shots, score = round.score, "miss");
        }
    }
}

/// Permanently activate each locked tier whose streak threshold is reached.
fn unlock_tiers(round: &mut Round, rng: &mut impl Rng) {
    let streak = round.streak;
    let bounds = round.bounds;
    for target in round.targets.iter_mut().filter(|t| !t.active) {
        let Some(needed) = round.config.unlock_streak(target.kind) else {
            continue;
        };
        if streak >= needed {
            activate(target, bounds, rng);
            tracing::info!(kind = ?target.kind, streak, "tier unlocked");
        }
    }
}

fn advance_targets(round: &mut Round, dt: f32, rng: &mut impl Rng) {
    let bounds = round.bounds;
    let interval = round.config.mode_toggle_interval;
    for target in round.targets.iter_mut().filter(|t| t.active) {
        target.sprite.advance(dt);
        target.motion.advance(&mut target.bounds, bounds, dt, rng);
        if target.motion.is_oscillating() && target.since_toggle >= interval {
            target.motion.toggle_mode();
            target.since_toggle = 0.0;
        }
    }
}

// ── Scene ────────────────────────────────────────────────────────────────────

/// Everything to draw for the current state: background, weapon, active birds
/// in tier order, HUD text, reticle.
pub fn compose_scene(round: &Round) -> Scene {
    let mut draws = Vec::new();

    let tile = round.backdrop;
    if tile.width > 0 {
        let y = round.bounds.height - tile.height as f32;
        let mut x = 0.0;
        while x < round.bounds.width {
            draws.push(DrawCommand {
                asset: AssetId::Landscape,
                source: FrameRect {
                    x: 0,
                    y: 0,
                    width: tile.width,
                    height: tile.height,
                },
                position: Vec2::new(x, y),
                scale: Vec2::new(1.0, 1.0),
                rotation: 0.0,
            });
            x += tile.width as f32;
        }
    }

    let origin = weapon_origin(round);
    let (w, _) = round.weapon.sprite().frame_size();
    draws.push(DrawCommand {
        asset: AssetId::Shotgun,
        source: round.weapon.sprite().source(),
        position: Vec2::new(origin.x - (w / 2) as f32, origin.y),
        scale: Vec2::new(1.0, 1.0),
        rotation: round.weapon.angle(),
    });

    for target in round.targets.iter().filter(|t| t.active) {
        draws.push(DrawCommand {
            asset: target.sprite.asset(),
            source: target.sprite.source(),
            position: Vec2::new(target.bounds.x, target.bounds.y),
            scale: Vec2::new(target.motion.direction().mirror_scale(), 1.0),
            rotation: 0.0,
        });
    }

    // Once the round is over, a new record is already the best score.
    let best = if round.status == RoundStatus::Over {
        round.high_score.max(round.score)
    } else {
        round.high_score
    };
    let hud = HudText {
        score: format!("Score: {}", round.score),
        high_score: format!("High Score: {best}"),
        streak: format!("Streak: {}", round.streak),
        misses: format!("Misses X {}", round.missed_shots),
    };

    let game_over = (round.status == RoundStatus::Over)
        .then(|| ("Game Over".to_string(), format!("Final Score: {}", round.score)));

    Scene {
        draws,
        hud,
        game_over,
        reticle: round.aim,
    }
}
