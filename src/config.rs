/// Tunable gameplay constants.
///
/// World units are terminal cells and durations are seconds.  Every field can
/// be overridden from a JSON file; omitted fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::TargetKind;
use crate::error::GameError;

/// Per-bird flight parameters.  Linear flyers ignore `amplitude`/`frequency`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightTuning {
    pub points: i32,
    /// Cells per second.
    pub speed: f32,
    /// Cells of vertical swing in wavy mode.
    pub amplitude: f32,
    /// Radians per second fed into the sine.
    pub frequency: f32,
}

impl FlightTuning {
    const fn linear(points: i32, speed: f32) -> Self {
        Self {
            points,
            speed,
            amplitude: 0.0,
            frequency: 0.0,
        }
    }

    const fn wavy(points: i32, speed: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            points,
            speed,
            amplitude,
            frequency,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fps: u32,
    pub fire_cooldown: f32,
    pub weapon_frame_duration: f32,
    pub bird_frame_duration: f32,
    /// A bird cannot be credited twice within this window.
    pub hit_cooldown: f32,
    /// Wavy/straight flip interval for oscillating birds.
    pub mode_toggle_interval: f32,
    /// Misses beyond this count each cost `miss_penalty` points.
    pub miss_penalty_threshold: u32,
    pub miss_penalty: i32,
    pub session_end_misses: u32,
    pub advanced_unlock_streak: u32,
    pub elite_unlock_streak: u32,
    pub game_over_pause_secs: f32,
    /// With the cursor locked, aim is kept above this fraction of the height.
    pub cursor_lock_height_ratio: f32,
    pub white_bird: FlightTuning,
    pub blue_bird: FlightTuning,
    pub turbo_bird: FlightTuning,
    pub monster: FlightTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            fire_cooldown: 0.74,
            weapon_frame_duration: 0.1,
            bird_frame_duration: 0.1,
            hit_cooldown: 1.2,
            mode_toggle_interval: 1.0,
            miss_penalty_threshold: 5,
            miss_penalty: 10,
            session_end_misses: 10,
            advanced_unlock_streak: 6,
            elite_unlock_streak: 8,
            game_over_pause_secs: 3.0,
            cursor_lock_height_ratio: 1.0 / 1.5,
            white_bird: FlightTuning::linear(1, 18.0),
            blue_bird: FlightTuning::linear(2, 24.0),
            turbo_bird: FlightTuning::wavy(4, 30.0, 3.0, 10.0),
            monster: FlightTuning::wavy(10, 20.0, 3.0, 5.0),
        }
    }
}

impl GameConfig {
    /// Read a JSON override file and validate the merged result.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::config(format!("{}: {e}", path.display())))?;
        let config: GameConfig = serde_json::from_str(&text)
            .map_err(|e| GameError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn tuning(&self, kind: TargetKind) -> &FlightTuning {
        match kind {
            TargetKind::WhiteBird => &self.white_bird,
            TargetKind::BlueBird => &self.blue_bird,
            TargetKind::TurboBird => &self.turbo_bird,
            TargetKind::Monster => &self.monster,
        }
    }

    /// Streak needed to bring `kind` into play, if it is not active from the start.
    pub fn unlock_streak(&self, kind: TargetKind) -> Option<u32> {
        match kind {
            TargetKind::TurboBird => Some(self.advanced_unlock_streak),
            TargetKind::Monster => Some(self.elite_unlock_streak),
            TargetKind::WhiteBird | TargetKind::BlueBird => None,
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.fps == 0 {
            return Err(GameError::config("fps must be at least 1"));
        }
        let durations = [
            ("fire_cooldown", self.fire_cooldown),
            ("weapon_frame_duration", self.weapon_frame_duration),
            ("bird_frame_duration", self.bird_frame_duration),
            ("hit_cooldown", self.hit_cooldown),
            ("mode_toggle_interval", self.mode_toggle_interval),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.game_over_pause_secs.is_finite() && self.game_over_pause_secs >= 0.0) {
            return Err(GameError::config("game_over_pause_secs must not be negative"));
        }
        if !(self.cursor_lock_height_ratio > 0.0 && self.cursor_lock_height_ratio <= 1.0) {
            return Err(GameError::config("cursor_lock_height_ratio must be in (0, 1]"));
        }
        if self.session_end_misses == 0 {
            return Err(GameError::config("session_end_misses must be at least 1"));
        }
        if self.elite_unlock_streak < self.advanced_unlock_streak {
            return Err(GameError::config(format!(
                "elite_unlock_streak ({}) is below advanced_unlock_streak ({})",
                self.elite_unlock_streak, self.advanced_unlock_streak
            )));
        }
        for kind in TargetKind::ALL {
            let t = self.tuning(kind);
            if !(t.speed.is_finite() && t.speed > 0.0) {
                return Err(GameError::config(format!(
                    "{} speed must be positive, got {}",
                    kind.label(),
                    t.speed
                )));
            }
        }
        Ok(())
    }
}
