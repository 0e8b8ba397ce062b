#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input decoding system that turns raw joystick and button samples into commands.
//!
//! The stick is edge-triggered: a deflection produces one [`Command::Move`]
//! and nothing more until the stick has returned to the dead-zone. The fire
//! button is debounced and disarmed on release, so each physical press yields
//! at most one [`Command::Fire`].

use std::time::Duration;

use log::trace;
use serde::Deserialize;
use wumpus_core::{
    Command, Direction, InputSample, AXIS_LOWER_LIMIT, AXIS_UPPER_LIMIT, DEBOUNCE_INTERVAL,
};

/// Thresholds used when interpreting raw samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Readings below this value count as deflected.
    pub lower_limit: u16,
    /// Readings above this value count as deflected.
    pub upper_limit: u16,
    /// Minimum press duration before the button fires, in milliseconds.
    pub debounce_ms: u64,
}

impl Config {
    /// Minimum press duration before the button fires.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Reports whether a single axis reading lies inside the dead-zone.
    #[must_use]
    pub const fn is_centred(&self, raw: u16) -> bool {
        raw >= self.lower_limit && raw <= self.upper_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lower_limit: AXIS_LOWER_LIMIT,
            upper_limit: AXIS_UPPER_LIMIT,
            debounce_ms: DEBOUNCE_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ButtonLatch {
    #[default]
    Idle,
    Armed {
        since: Duration,
    },
    Spent,
}

/// Stateful decoder owned by the round controller.
#[derive(Debug)]
pub struct Decoder {
    config: Config,
    centred: bool,
    button: ButtonLatch,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Decoder {
    /// Creates a decoder with a centred stick and a released button.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            centred: true,
            button: ButtonLatch::Idle,
        }
    }

    /// Re-arms the stick and waits for the button to be released.
    ///
    /// A button still held from the previous round does not fire until it has
    /// been let go and pressed again.
    pub fn reset(&mut self) {
        self.centred = true;
        self.button = ButtonLatch::Spent;
    }

    /// Decodes at most one command from a raw sample.
    ///
    /// A fresh stick deflection takes priority. The button level is still
    /// tracked on that tick, but a press that would fire is held back until
    /// the next sample.
    pub fn poll(&mut self, sample: InputSample) -> Option<Command> {
        if self.classify_axis(sample.x, sample.y) {
            if let Some(direction) = self.decode_direction(sample.x, sample.y) {
                self.track_button(sample.button, sample.at);
                trace!("stick deflected {direction:?} at {:?}", sample.at);
                return Some(Command::Move { direction });
            }
        }

        if self.decode_button(sample.button, sample.at) {
            trace!("button fired at {:?}", sample.at);
            return Some(Command::Fire);
        }

        None
    }

    /// Reports whether the stick just left the dead-zone.
    ///
    /// Returns `true` only on the centred-to-deflected transition. Holding the
    /// stick deflected returns `false` until a centred reading re-arms it.
    pub fn classify_axis(&mut self, raw_x: u16, raw_y: u16) -> bool {
        let deflected = !(self.config.is_centred(raw_x) && self.config.is_centred(raw_y));
        if !deflected {
            self.centred = true;
            return false;
        }

        let fresh = self.centred;
        self.centred = false;
        fresh
    }

    /// Maps a raw reading to a direction.
    ///
    /// A single live axis decides on its own. When both axes are live the
    /// first matching of Right, Left, Down and Up wins, so diagonals resolve
    /// horizontally.
    #[must_use]
    pub fn decode_direction(&self, raw_x: u16, raw_y: u16) -> Option<Direction> {
        let lower = self.config.lower_limit;
        let upper = self.config.upper_limit;
        let x_live = !self.config.is_centred(raw_x);
        let y_live = !self.config.is_centred(raw_y);

        match (x_live, y_live) {
            (false, false) => None,
            (true, false) => Some(if raw_x < lower {
                Direction::Right
            } else {
                Direction::Left
            }),
            (false, true) => Some(if raw_y < lower {
                Direction::Down
            } else {
                Direction::Up
            }),
            (true, true) => {
                if raw_x < lower {
                    Some(Direction::Right)
                } else if raw_x > upper {
                    Some(Direction::Left)
                } else if raw_y < lower {
                    Some(Direction::Down)
                } else {
                    Some(Direction::Up)
                }
            }
        }
    }

    /// Debounces the fire button, returning `true` once per press.
    ///
    /// A press arms the latch; the button fires once it has stayed pressed for
    /// at least the debounce interval. Releasing the button disarms it.
    pub fn decode_button(&mut self, pressed: bool, now: Duration) -> bool {
        if !pressed {
            self.button = ButtonLatch::Idle;
            return false;
        }

        match self.button {
            ButtonLatch::Idle => {
                self.button = ButtonLatch::Armed { since: now };
                false
            }
            ButtonLatch::Armed { since } if now.saturating_sub(since) >= self.config.debounce() => {
                self.button = ButtonLatch::Spent;
                true
            }
            ButtonLatch::Armed { .. } | ButtonLatch::Spent => false,
        }
    }

    fn track_button(&mut self, pressed: bool, now: Duration) {
        match (pressed, self.button) {
            (false, _) => self.button = ButtonLatch::Idle,
            (true, ButtonLatch::Idle) => self.button = ButtonLatch::Armed { since: now },
            (true, ButtonLatch::Armed { .. } | ButtonLatch::Spent) => {}
        }
    }
}
