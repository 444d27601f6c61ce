/// All game entity types — plain data plus the small geometric helpers the
/// frame loop leans on.  Behaviour lives in `sprite`, `motion`, `weapon` and
/// `compute`.

use crate::config::GameConfig;
use crate::motion::Motion;
use crate::sprite::{AnimatedSprite, FrameRect, SheetGeometry};
use crate::weapon::WeaponState;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in world units (terminal cells).  `x`/`y` is the top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Visible play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn from_cells(width: u16, height: u16) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// Horizontal travel direction.  It also decides the sprite's mirroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::LeftToRight => 1.0,
            Direction::RightToLeft => -1.0,
        }
    }

    /// Horizontal draw scale: sheets face right, so right-to-left flights are flipped.
    pub fn mirror_scale(self) -> f32 {
        self.sign()
    }
}

/// The four bird tiers, declared in collision-priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    WhiteBird,
    BlueBird,
    TurboBird,
    Monster,
}

impl TargetKind {
    pub const ALL: [TargetKind; 4] = [
        TargetKind::WhiteBird,
        TargetKind::BlueBird,
        TargetKind::TurboBird,
        TargetKind::Monster,
    ];

    pub fn asset(self) -> AssetId {
        match self {
            TargetKind::WhiteBird => AssetId::WhiteBird,
            TargetKind::BlueBird => AssetId::BlueBird,
            TargetKind::TurboBird => AssetId::TurboBird,
            TargetKind::Monster => AssetId::Monster,
        }
    }

    /// Birds that fly from the first frame of a round.  The rest unlock by streak.
    pub fn starts_active(self) -> bool {
        matches!(self, TargetKind::WhiteBird | TargetKind::BlueBird)
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetKind::WhiteBird => "White Bird",
            TargetKind::BlueBird => "Blue Bird",
            TargetKind::TurboBird => "Turbo Bird",
            TargetKind::Monster => "Monster",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Target {
    pub kind: TargetKind,
    pub sprite: AnimatedSprite,
    pub bounds: Rect,
    pub motion: Motion,
    pub points: i32,
    /// Inactive targets are not advanced, hit-tested or drawn.
    pub active: bool,
    /// Seconds since this target was last credited as a hit.
    pub since_hit: f32,
    /// Seconds since the last wavy/straight toggle (oscillating targets only).
    pub since_toggle: f32,
}

// ── Assets & audio ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    WhiteBird,
    BlueBird,
    TurboBird,
    Monster,
    Shotgun,
    Landscape,
}

impl AssetId {
    pub const ALL: [AssetId; 6] = [
        AssetId::WhiteBird,
        AssetId::BlueBird,
        AssetId::TurboBird,
        AssetId::Monster,
        AssetId::Shotgun,
        AssetId::Landscape,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetId::WhiteBird => "white_bird.txt",
            AssetId::BlueBird => "blue_bird.txt",
            AssetId::TurboBird => "turbo_bird.txt",
            AssetId::Monster => "monster.txt",
            AssetId::Shotgun => "shotgun.txt",
            AssetId::Landscape => "landscape.txt",
        }
    }
}

/// Fire-and-forget sound triggers raised by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    Fire,
    Reload,
}

// ── Frame input / output ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    Escape,
    ToggleCursorLock,
    /// Left-click at a screen point.
    Fire { x: f32, y: f32 },
}

/// Everything the core consumes for one frame.
#[derive(Clone, Debug)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub elapsed: f32,
    pub events: Vec<InputEvent>,
    pub pointer: Vec2,
    pub bounds: Bounds,
}

/// One sprite blit for the renderer.  A negative `scale.x` means mirrored.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub asset: AssetId,
    pub source: FrameRect,
    pub position: Vec2,
    pub scale: Vec2,
    /// Degrees; only the weapon rotates.
    pub rotation: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HudText {
    pub score: String,
    pub high_score: String,
    pub streak: String,
    pub misses: String,
}

/// Everything the renderer needs for one frame, already in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub draws: Vec<DrawCommand>,
    pub hud: HudText,
    /// `("Game Over", "Final Score: N")` once the round has ended.
    pub game_over: Option<(String, String)>,
    pub reticle: Vec2,
}

// ── Master round state ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Playing,
    /// Too many misses; the front end shows the summary and leaves the round.
    Over,
    /// The player asked to leave.
    Quit,
}

/// The entire round state.  Cloneable so the per-frame update can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct Round {
    /// Birds in collision-priority order (see `TargetKind::ALL`).
    pub targets: Vec<Target>,
    pub weapon: WeaponState,
    pub score: i32,
    pub high_score: i32,
    pub streak: u32,
    pub missed_shots: u32,
    pub status: RoundStatus,
    /// Set by a successful fire, consumed by the same frame's hit pass.
    pub collision_armed: bool,
    pub cursor_locked: bool,
    pub aim: Vec2,
    /// Cues raised during the most recent frame.
    pub cues: Vec<AudioCue>,
    pub frame: u64,
    pub bounds: Bounds,
    pub backdrop: SheetGeometry,
    pub config: GameConfig,
}

impl Round {
    pub fn target(&self, kind: TargetKind) -> Option<&Target> {
        self.targets.iter().find(|t| t.kind == kind)
    }

    pub fn target_mut(&mut self, kind: TargetKind) -> Option<&mut Target> {
        self.targets.iter_mut().find(|t| t.kind == kind)
    }
}
