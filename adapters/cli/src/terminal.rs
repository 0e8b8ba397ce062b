//! Presentation on a plain text terminal.

use std::{fmt, io::Write, thread};

use log::{debug, info, warn};
use wumpus_core::{CellCoord, Cue, Presentation, SenseIndicators};
use wumpus_rendering::{CueScore, FrameBuffer};

const LIT: char = '#';
const DARK: char = '.';

/// Draws the cave as an ASCII block and narrates cues through the log.
///
/// Frames are only written when they differ from the last one shown, so the
/// per-tick redraws of an idle player do not flood the terminal.
#[derive(Debug)]
pub(crate) struct TerminalPresentation<W> {
    out: W,
    buffer: FrameBuffer,
    indicators: SenseIndicators,
    shown: Option<(FrameBuffer, SenseIndicators)>,
    realtime: bool,
}

impl<W: Write> TerminalPresentation<W> {
    /// Creates a presentation writing to `out`; `realtime` sleeps through cues.
    pub(crate) fn new(out: W, realtime: bool) -> Self {
        Self {
            out,
            buffer: FrameBuffer::default(),
            indicators: SenseIndicators::OFF,
            shown: None,
            realtime,
        }
    }

    fn write(&mut self, text: fmt::Arguments<'_>) {
        let result = self
            .out
            .write_fmt(text)
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            warn!("terminal write failed: {error}");
        }
    }
}

fn lamp(on: bool) -> char {
    if on {
        '*'
    } else {
        ' '
    }
}

impl<W: Write> Presentation for TerminalPresentation<W> {
    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn plot(&mut self, cell: CellCoord, on: bool) {
        self.buffer.plot(cell, on);
    }

    fn draw(&mut self) {
        let frame = (self.buffer, self.indicators);
        if self.shown == Some(frame) {
            return;
        }
        self.shown = Some(frame);

        let block = self.buffer.to_ascii(LIT, DARK);
        let stink = lamp(self.indicators.wumpus_near);
        let draught = lamp(self.indicators.pit_near);
        self.write(format_args!(
            "{block}stink [{stink}]  draught [{draught}]\n\n"
        ));
    }

    fn play_cue(&mut self, cue: Cue) {
        let score = CueScore::for_cue(cue);
        let length = score.total_duration();
        info!(
            "cue {cue:?}: {} frames, {} tones, {length:?}",
            score.frames,
            score.tones.len()
        );
        if self.realtime {
            thread::sleep(length);
        }
    }

    fn print(&mut self, text: &str) {
        self.write(format_args!("{text}\n"));
        self.shown = None;
    }

    fn set_brightness(&mut self, level: u8) {
        debug!("brightness {level}");
    }

    fn set_sense_indicators(&mut self, indicators: SenseIndicators) {
        self.indicators = indicators;
    }
}
