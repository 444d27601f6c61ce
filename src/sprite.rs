/// Frame-sheet animation.
///
/// A sheet is a `columns × rows` grid of equally sized cells.  Frame `i` lives
/// at row `i / columns`, column `i % columns`.

use crate::entities::AssetId;
use crate::error::GameError;

/// Size of a sheet in cells plus its frame grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetGeometry {
    pub width: u32,
    pub height: u32,
    pub columns: u32,
    pub rows: u32,
}

/// Sub-rectangle of a sheet, in sheet cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    /// Loops forever.  The last grid cell is never shown, which hides the
    /// seam between the final and first drawing.
    Cyclic,
    /// Plays every cell once; the owner decides when to restart.
    OneShot,
}

/// Result of one `advance` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Held,
    Advanced,
    /// Moved past the last frame and back to frame 0.
    Wrapped,
}

#[derive(Clone, Debug)]
pub struct AnimatedSprite {
    asset: AssetId,
    geometry: SheetGeometry,
    frame_width: u32,
    frame_height: u32,
    total_frames: u32,
    frame_duration: f32,
    current: u32,
    timer: f32,
    source: FrameRect,
}

impl AnimatedSprite {
    pub fn new(
        asset: AssetId,
        geometry: SheetGeometry,
        frame_duration: f32,
        playback: Playback,
    ) -> Result<Self, GameError> {
        let SheetGeometry {
            width,
            height,
            columns,
            rows,
        } = geometry;
        if columns == 0 || rows == 0 {
            return Err(GameError::config(format!(
                "{asset:?}: frame grid must be non-empty, got {columns}x{rows}"
            )));
        }
        let frame_width = width / columns;
        let frame_height = height / rows;
        if frame_width == 0 || frame_height == 0 {
            return Err(GameError::config(format!(
                "{asset:?}: {width}x{height} sheet is too small for a {columns}x{rows} grid"
            )));
        }
        let cells = columns * rows;
        let total_frames = match playback {
            Playback::Cyclic => cells - 1,
            Playback::OneShot => cells,
        };
        if total_frames == 0 {
            return Err(GameError::config(format!(
                "{asset:?}: a looping sheet needs at least two cells"
            )));
        }
        if !(frame_duration.is_finite() && frame_duration > 0.0) {
            return Err(GameError::config(format!(
                "{asset:?}: frame duration must be positive, got {frame_duration}"
            )));
        }

        Ok(Self {
            asset,
            geometry,
            frame_width,
            frame_height,
            total_frames,
            frame_duration,
            current: 0,
            timer: 0.0,
            source: FrameRect {
                x: 0,
                y: 0,
                width: frame_width,
                height: frame_height,
            },
        })
    }

    /// Accumulate `elapsed` seconds; once a full frame duration has passed,
    /// show the next frame and restart the timer.  At most one frame per call.
    pub fn advance(&mut self, elapsed: f32) -> Step {
        self.timer += elapsed;
        if self.timer < self.frame_duration {
            return Step::Held;
        }
        self.timer = 0.0;
        let next = (self.current + 1) % self.total_frames;
        self.set_frame(next);
        if next == 0 {
            Step::Wrapped
        } else {
            Step::Advanced
        }
    }

    /// Back to frame 0 with a fresh timer.
    pub fn restart(&mut self) {
        self.timer = 0.0;
        self.set_frame(0);
    }

    fn set_frame(&mut self, index: u32) {
        self.current = index;
        let columns = self.geometry.columns;
        self.source = FrameRect {
            x: (index % columns) * self.frame_width,
            y: (index / columns) * self.frame_height,
            width: self.frame_width,
            height: self.frame_height,
        };
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }

    pub fn frame(&self) -> u32 {
        self.current
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn source(&self) -> FrameRect {
        self.source
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }
}
