/// Flight paths.
///
/// Both motions move a bird's bounding box horizontally across the play area
/// and respawn it just past one side once it has fully left through the other.

use rand::Rng;

use crate::entities::{Bounds, Direction, Rect};

fn random_direction(rng: &mut impl Rng) -> Direction {
    if rng.gen_bool(0.5) {
        Direction::LeftToRight
    } else {
        Direction::RightToLeft
    }
}

/// Whole-cell row in `[0, height / divisor)`, or 0 when that band is empty.
fn random_row(rng: &mut impl Rng, bounds: Bounds, divisor: f32) -> f32 {
    let band = (bounds.height / divisor).floor() as u32;
    if band == 0 {
        0.0
    } else {
        rng.gen_range(0..band) as f32
    }
}

/// Put `body` entirely outside the edge it will enter from.
fn place_offscreen(body: &mut Rect, bounds: Bounds, direction: Direction, row: f32) {
    body.y = row;
    body.x = match direction {
        Direction::LeftToRight => -body.width,
        Direction::RightToLeft => bounds.width,
    };
}

/// True once `body` is completely past the edge it was flying towards.
fn has_exited(body: &Rect, bounds: Bounds, direction: Direction) -> bool {
    match direction {
        Direction::LeftToRight => body.x >= bounds.width,
        Direction::RightToLeft => body.right() <= 0.0,
    }
}

// ── Linear ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LinearMotion {
    speed: f32,
    direction: Direction,
}

impl LinearMotion {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            direction: Direction::LeftToRight,
        }
    }

    /// Respawn somewhere in the top third, on a random side.
    pub fn reset(&mut self, body: &mut Rect, bounds: Bounds, rng: &mut impl Rng) {
        let row = random_row(rng, bounds, 3.0);
        self.direction = random_direction(rng);
        place_offscreen(body, bounds, self.direction, row);
    }

    pub fn advance(&mut self, body: &mut Rect, bounds: Bounds, dt: f32, rng: &mut impl Rng) {
        body.x += self.direction.sign() * self.speed * dt;
        if has_exited(body, bounds, self.direction) {
            self.reset(body, bounds, rng);
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

// ── Oscillating ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightMode {
    Wavy,
    Straight,
}

#[derive(Clone, Debug)]
pub struct OscillatingMotion {
    speed: f32,
    amplitude: f32,
    frequency: f32,
    direction: Direction,
    /// Seconds spent in wavy mode since the last respawn.
    elapsed: f32,
    mode: FlightMode,
    /// Row the sine swings around.
    baseline: f32,
}

impl OscillatingMotion {
    pub fn new(speed: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            speed,
            amplitude,
            frequency,
            direction: Direction::LeftToRight,
            elapsed: 0.0,
            mode: FlightMode::Wavy,
            baseline: 0.0,
        }
    }

    /// Respawn in the top quarter and restart the sine phase.
    pub fn reset(&mut self, body: &mut Rect, bounds: Bounds, rng: &mut impl Rng) {
        let row = random_row(rng, bounds, 4.0);
        self.direction = random_direction(rng);
        place_offscreen(body, bounds, self.direction, row);
        self.baseline = row;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, body: &mut Rect, bounds: Bounds, dt: f32, rng: &mut impl Rng) {
        body.x += self.direction.sign() * self.speed * dt;
        if self.mode == FlightMode::Wavy {
            self.elapsed += dt;
            body.y = self.baseline + self.vertical_offset();
        }
        if has_exited(body, bounds, self.direction) {
            self.reset(body, bounds, rng);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            FlightMode::Wavy => FlightMode::Straight,
            FlightMode::Straight => FlightMode::Wavy,
        };
    }

    /// Distance from the baseline at the current phase.  Straight mode keeps
    /// the last wavy offset because the phase clock is frozen.
    pub fn vertical_offset(&self) -> f32 {
        self.amplitude * (self.frequency * self.elapsed).sin()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Motion {
    Linear(LinearMotion),
    Oscillating(OscillatingMotion),
}

impl Motion {
    pub fn reset(&mut self, body: &mut Rect, bounds: Bounds, rng: &mut impl Rng) {
        match self {
            Motion::Linear(m) => m.reset(body, bounds, rng),
            Motion::Oscillating(m) => m.reset(body, bounds, rng),
        }
    }

    pub fn advance(&mut self, body: &mut Rect, bounds: Bounds, dt: f32, rng: &mut impl Rng) {
        match self {
            Motion::Linear(m) => m.advance(body, bounds, dt, rng),
            Motion::Oscillating(m) => m.advance(body, bounds, dt, rng),
        }
    }

    /// No-op for linear flyers.
    pub fn toggle_mode(&mut self) {
        if let Motion::Oscillating(m) = self {
            m.toggle_mode();
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Motion::Linear(m) => m.direction(),
            Motion::Oscillating(m) => m.direction(),
        }
    }

    pub fn is_oscillating(&self) -> bool {
        matches!(self, Motion::Oscillating(_))
    }

    pub fn as_oscillating(&self) -> Option<&OscillatingMotion> {
        match self {
            Motion::Oscillating(m) => Some(m),
            Motion::Linear(_) => None,
        }
    }
}
