/// Audio cue sinks.  The core only raises cues; what they sound like is up to
/// the sink.

use std::io::Write;

use crate::entities::AudioCue;

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Swallows every cue (`--mute`).
#[derive(Debug, Default)]
pub struct Muted;

impl AudioSink for Muted {
    fn play(&mut self, cue: AudioCue) {
        tracing::trace!(?cue, "muted cue");
    }
}

/// Rings the terminal bell on each shot.  The reload cue is silent: two bells
/// in the same frame merge into one anyway.
#[derive(Debug)]
pub struct Bell<W: Write> {
    out: W,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for Bell<W> {
    fn play(&mut self, cue: AudioCue) {
        if cue == AudioCue::Fire {
            // A lost bell is not worth interrupting the frame for.
            let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        }
    }
}
