//! Keyboard stand-in for the joystick and fire button.
//!
//! Each line typed on stdin is expanded into raw samples on a virtual clock:
//! `w`/`a`/`s`/`d` deflect the stick for one tick and recentre it, `f` lets
//! go of the button, holds it long enough to pass the debounce window and
//! releases it again, an empty line idles for one tick, and `q` stops the
//! input.

use std::{collections::VecDeque, io::BufRead, time::Duration};

use log::{trace, warn};
use wumpus_core::{InputPort, InputSample};

const CENTRE: u16 = InputSample::CENTRE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Reading {
    x: u16,
    y: u16,
    button: bool,
}

impl Reading {
    const IDLE: Self = Self::stick(CENTRE, CENTRE);
    const PRESSED: Self = Self {
        x: CENTRE,
        y: CENTRE,
        button: true,
    };

    const fn stick(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            button: false,
        }
    }
}

/// Input port fed by line-oriented keyboard input.
#[derive(Debug)]
pub(crate) struct KeyboardInput<R> {
    reader: R,
    pending: VecDeque<Reading>,
    clock: Duration,
    tick: Duration,
    hold_ticks: u32,
    stopped: bool,
}

impl<R: BufRead> KeyboardInput<R> {
    /// Creates an adapter that spaces samples `tick` apart and holds the
    /// button for at least `debounce`.
    pub(crate) fn new(reader: R, tick: Duration, debounce: Duration) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            clock: Duration::ZERO,
            tick,
            hold_ticks: hold_ticks(tick, debounce),
            stopped: false,
        }
    }

    fn read_line(&mut self) {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => self.stopped = true,
            Ok(_) => self.expand(&line),
            Err(error) => {
                warn!("keyboard input failed: {error}");
                self.stopped = true;
            }
        }
    }

    fn expand(&mut self, line: &str) {
        let keys = line.trim();
        if keys.is_empty() {
            self.pending.push_back(Reading::IDLE);
            return;
        }

        for key in keys.chars().map(|key| key.to_ascii_lowercase()) {
            let deflection = match key {
                'w' => Reading::stick(CENTRE, u16::MAX),
                'a' => Reading::stick(u16::MAX, CENTRE),
                's' => Reading::stick(CENTRE, 0),
                'd' => Reading::stick(0, CENTRE),
                'f' => {
                    self.pending.push_back(Reading::IDLE);
                    for _ in 0..self.hold_ticks {
                        self.pending.push_back(Reading::PRESSED);
                    }
                    self.pending.push_back(Reading::IDLE);
                    continue;
                }
                'q' => {
                    self.stopped = true;
                    return;
                }
                key if key.is_whitespace() => continue,
                key => {
                    warn!("ignoring unknown key {key:?}");
                    continue;
                }
            };
            self.pending.push_back(deflection);
            self.pending.push_back(Reading::IDLE);
        }
    }
}

impl<R: BufRead> InputPort for KeyboardInput<R> {
    fn sample(&mut self) -> Option<InputSample> {
        while self.pending.is_empty() {
            if self.stopped {
                return None;
            }
            self.read_line();
        }

        let reading = self.pending.pop_front()?;
        self.clock += self.tick;
        let sample = InputSample {
            x: reading.x,
            y: reading.y,
            button: reading.button,
            at: self.clock,
        };
        trace!("sample {sample:?}");
        Some(sample)
    }
}

/// Pressed samples needed so the last one lands at least `debounce` after
/// the first.
fn hold_ticks(tick: Duration, debounce: Duration) -> u32 {
    let spacing = tick.as_nanos().max(1);
    let gaps = debounce.as_nanos().div_ceil(spacing);
    u32::try_from(gaps).unwrap_or(u32::MAX).saturating_add(1)
}
