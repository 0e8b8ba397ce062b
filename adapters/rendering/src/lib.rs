#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Hunt the Wumpus adapters.
//!
//! The engine only speaks the [`Presentation`] port. This crate provides the
//! pieces every adapter needs behind that port: a frame buffer laid out like
//! the 8×8 LED matrix, the tone and animation score of every [`Cue`], and a
//! recording presentation used to observe the engine in tests.

use std::time::Duration;

use wumpus_core::{CellCoord, Cue, Presentation, SenseIndicators, Tone, GRID_SIZE, MAX_BRIGHTNESS};

/// Eight rows of eight pixels, one byte per row, bit `x` lighting column `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    rows: [u8; GRID_SIZE as usize],
}

impl FrameBuffer {
    /// Switches every pixel off.
    pub fn clear(&mut self) {
        self.rows = [0; GRID_SIZE as usize];
    }

    /// Sets a single pixel.
    pub fn plot(&mut self, cell: CellCoord, on: bool) {
        let row = &mut self.rows[usize::from(cell.y())];
        let mask = 1_u8 << cell.x();
        if on {
            *row |= mask;
        } else {
            *row &= !mask;
        }
    }

    /// Whether the pixel for `cell` is lit.
    #[must_use]
    pub fn is_lit(&self, cell: CellCoord) -> bool {
        self.rows[usize::from(cell.y())] & (1 << cell.x()) != 0
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn lit_count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Renders the frame as text, top row first, one line per row.
    #[must_use]
    pub fn to_ascii(&self, lit: char, dark: char) -> String {
        let mut text = String::with_capacity(usize::from(GRID_SIZE) * (usize::from(GRID_SIZE) + 1));
        for y in (0..GRID_SIZE).rev() {
            for x in 0..GRID_SIZE {
                text.push(if self.is_lit(CellCoord::new(x, y)) {
                    lit
                } else {
                    dark
                });
            }
            text.push('\n');
        }
        text
    }
}

/// Animation and tone content of a cue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CueScore {
    /// Number of animation frames shown.
    pub frames: u32,
    /// Time each frame stays on screen.
    pub frame_interval: Duration,
    /// Tones played after the animation.
    pub tones: Vec<Tone>,
}

impl CueScore {
    /// Score played for `cue`.
    #[must_use]
    pub fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::Intro => Self::new(7, 200, INTRO_MELODY.to_vec()),
            Cue::BatSqueak => Self::new(
                0,
                0,
                vec![
                    Tone::from_millis(600, 50, 50),
                    Tone::from_millis(500, 50, 50),
                    Tone::from_millis(400, 50, 50),
                ],
            ),
            // eight wing flaps followed by the nine-frame carry sequence
            Cue::BatCapture => Self::new(8 * 2 + 9, 100, Vec::new()),
            Cue::PitFall => Self::new(
                9,
                100,
                (200..=1_000)
                    .rev()
                    .step_by(100)
                    .map(|frequency| Tone::from_millis(frequency, 40, 0))
                    .collect(),
            ),
            Cue::ArrowFire => Self::new(6, 50, vec![Tone::from_millis(1_200, 30, 0)]),
            Cue::WumpusKill => Self::new(
                6,
                150,
                vec![Tone::from_millis(400, 100, 50), Tone::from_millis(200, 300, 0)],
            ),
            Cue::ArrowMiss => Self::new(8, 100, vec![Tone::from_millis(300, 200, 0)]),
            Cue::WumpusAttack => Self::new(
                12,
                250,
                (802..=2_000)
                    .rev()
                    .step_by(2)
                    .map(|frequency| Tone::from_millis(frequency, 10, 1))
                    .collect(),
            ),
            Cue::WinFanfare => Self::new(0, 0, WIN_FANFARE.to_vec()),
        }
    }

    fn new(frames: u32, frame_interval_ms: u64, tones: Vec<Tone>) -> Self {
        Self {
            frames,
            frame_interval: Duration::from_millis(frame_interval_ms),
            tones,
        }
    }

    /// Time the cue blocks the round loop for.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        let animation = self.frame_interval * self.frames;
        self.tones
            .iter()
            .fold(animation, |total, tone| total + tone.duration + tone.post_delay)
    }
}

/// Opening theme played while the cave is introduced.
const INTRO_MELODY: [Tone; 26] = [
    Tone::from_millis(147, 200, 100),
    Tone::from_millis(165, 200, 100),
    Tone::from_millis(175, 200, 100),
    Tone::from_millis(196, 200, 100),
    Tone::from_millis(220, 200, 100),
    Tone::from_millis(175, 200, 100),
    Tone::from_millis(220, 400, 100),
    Tone::from_millis(208, 200, 100),
    Tone::from_millis(175, 200, 100),
    Tone::from_millis(208, 400, 100),
    Tone::from_millis(196, 200, 100),
    Tone::from_millis(165, 200, 100),
    Tone::from_millis(196, 400, 100),
    Tone::from_millis(147, 200, 100),
    Tone::from_millis(165, 200, 100),
    Tone::from_millis(175, 200, 100),
    Tone::from_millis(196, 200, 100),
    Tone::from_millis(220, 200, 100),
    Tone::from_millis(175, 200, 100),
    Tone::from_millis(220, 200, 100),
    Tone::from_millis(294, 200, 100),
    Tone::from_millis(262, 200, 100),
    Tone::from_millis(220, 200, 100),
    Tone::from_millis(175, 200, 100),
    Tone::from_millis(220, 200, 100),
    Tone::from_millis(262, 400, 100),
];

const WIN_FANFARE: [Tone; 6] = [
    Tone::from_millis(523, 150, 50),
    Tone::from_millis(659, 150, 50),
    Tone::from_millis(784, 150, 50),
    Tone::from_millis(1_047, 300, 100),
    Tone::from_millis(784, 150, 50),
    Tone::from_millis(1_047, 600, 0),
];

/// One call received through the presentation port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationCall {
    /// `clear` was called.
    Clear,
    /// `plot` was called.
    Plot {
        /// Pixel addressed.
        cell: CellCoord,
        /// Requested state.
        on: bool,
    },
    /// `draw` was called.
    Draw,
    /// `play_cue` was called.
    Cue(Cue),
    /// `print` was called.
    Print(String),
    /// `set_brightness` was called.
    Brightness(u8),
    /// `set_sense_indicators` was called.
    Senses(SenseIndicators),
}

/// Presentation that records every call instead of driving hardware.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    calls: Vec<PresentationCall>,
    buffer: FrameBuffer,
    shown: FrameBuffer,
    indicators: SenseIndicators,
}

impl RecordingPresentation {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in the order it was received.
    #[must_use]
    pub fn calls(&self) -> &[PresentationCall] {
        &self.calls
    }

    /// Cues played so far.
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// Texts printed so far.
    #[must_use]
    pub fn printed(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Print(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Brightness levels requested so far.
    #[must_use]
    pub fn brightness_levels(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PresentationCall::Brightness(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Frame most recently pushed by `draw`.
    #[must_use]
    pub const fn shown_frame(&self) -> &FrameBuffer {
        &self.shown
    }

    /// Current state of the sense indicator outputs.
    #[must_use]
    pub const fn indicators(&self) -> SenseIndicators {
        self.indicators
    }
}

impl Presentation for RecordingPresentation {
    fn clear(&mut self) {
        self.buffer.clear();
        self.calls.push(PresentationCall::Clear);
    }

    fn plot(&mut self, cell: CellCoord, on: bool) {
        self.buffer.plot(cell, on);
        self.calls.push(PresentationCall::Plot { cell, on });
    }

    fn draw(&mut self) {
        self.shown = self.buffer;
        self.calls.push(PresentationCall::Draw);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.calls.push(PresentationCall::Cue(cue));
    }

    fn print(&mut self, text: &str) {
        self.calls.push(PresentationCall::Print(text.to_owned()));
    }

    fn set_brightness(&mut self, level: u8) {
        self.calls
            .push(PresentationCall::Brightness(level.min(MAX_BRIGHTNESS)));
    }

    fn set_sense_indicators(&mut self, indicators: SenseIndicators) {
        self.indicators = indicators;
        self.calls.push(PresentationCall::Senses(indicators));
    }
}
