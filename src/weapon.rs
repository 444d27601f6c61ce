/// The shotgun: fire-rate gate, one-shot recoil animation and aim heuristic.

use crate::entities::{AudioCue, Vec2};
use crate::sprite::{AnimatedSprite, Step};

pub const MAX_AIM_ANGLE: f32 = 45.0;

/// Barrel angle in degrees for aiming from `origin` at `target`.
///
/// This is a linear ratio (`dy / dx × 90°`), not an arctangent: it only
/// resembles the true angle near the horizontal and saturates at ±45°.
/// A point straight above or below the anchor saturates immediately.
pub fn aim_angle(target: Vec2, origin: Vec2) -> f32 {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    if dx == 0.0 {
        return if dy == 0.0 {
            0.0
        } else {
            MAX_AIM_ANGLE.copysign(dy)
        };
    }
    ((dy / dx) * 90.0).clamp(-MAX_AIM_ANGLE, MAX_AIM_ANGLE)
}

#[derive(Clone, Debug)]
pub struct WeaponState {
    sprite: AnimatedSprite,
    cooldown: f32,
    since_last_shot: f32,
    shooting: bool,
    angle: f32,
}

impl WeaponState {
    /// `sprite` should use `Playback::OneShot`.  The weapon starts ready to fire.
    pub fn new(sprite: AnimatedSprite, cooldown: f32) -> Self {
        Self {
            sprite,
            cooldown,
            since_last_shot: cooldown,
            shooting: false,
            angle: 0.0,
        }
    }

    /// Run the cooldown clock.
    pub fn advance(&mut self, dt: f32) {
        self.since_last_shot += dt;
    }

    /// Start a shot if the cooldown has run out and no shot is playing.
    /// On success the fire and reload cues are pushed to `cues`.
    pub fn try_fire(&mut self, cues: &mut Vec<AudioCue>) -> bool {
        if self.shooting || self.since_last_shot < self.cooldown {
            return false;
        }
        self.shooting = true;
        self.since_last_shot = 0.0;
        self.sprite.restart();
        cues.push(AudioCue::Fire);
        cues.push(AudioCue::Reload);
        true
    }

    /// Step the recoil animation.  Once the last frame has been shown the
    /// weapon returns to frame 0 and goes idle.
    pub fn advance_animation(&mut self, elapsed: f32) {
        if !self.shooting {
            return;
        }
        if self.sprite.advance(elapsed) == Step::Wrapped {
            self.shooting = false;
        }
    }

    pub fn aim_at(&mut self, target: Vec2, origin: Vec2) -> f32 {
        self.angle = aim_angle(target, origin);
        self.angle
    }

    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn is_ready(&self) -> bool {
        !self.shooting && self.since_last_shot >= self.cooldown
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn frame(&self) -> u32 {
        self.sprite.frame()
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }
}
