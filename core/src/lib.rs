#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hunt the Wumpus engine.
//!
//! This crate defines the vocabulary that connects adapters, the cave world,
//! and the pure systems. Adapters sample raw input and hand it to the input
//! system, which decodes [`Command`] values. The round controller applies those
//! commands against the cave and broadcasts [`Event`] values describing what
//! happened, while driving a [`Presentation`] port for everything the player
//! sees and hears.

use std::{fmt, ops::Range, time::Duration};

use glam::IVec2;
use thiserror::Error;

/// Number of cells along each edge of the square cave.
pub const GRID_SIZE: u8 = 8;

/// Total number of cells contained in the cave.
pub const CELL_COUNT: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// Lower bound of the joystick dead-zone measured in raw ADC counts.
pub const AXIS_LOWER_LIMIT: u16 = 10_000;

/// Upper bound of the joystick dead-zone measured in raw ADC counts.
pub const AXIS_UPPER_LIMIT: u16 = 50_000;

/// Minimum time the fire button must read pressed before an arrow is loosed.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(10);

/// Nominal pause between two polls of the round loop.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Period at which the player's cell blinks on the display.
pub const PLAYER_FLASH_PERIOD: Duration = Duration::from_millis(200);

/// Highest brightness level accepted by the display.
pub const MAX_BRIGHTNESS: u8 = 15;

/// Banner scrolled while a new round is introduced.
pub const TEXT_INTRO: &str = "HUNT THE WUMPUS";

/// Cardinal directions the player can move or shoot in.
///
/// Rows grow upward: `Up` increases `y`, `Down` decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit step associated with the direction.
    #[must_use]
    pub const fn unit_vector(self) -> IVec2 {
        match self {
            Self::Up => IVec2::Y,
            Self::Down => IVec2::NEG_Y,
            Self::Left => IVec2::NEG_X,
            Self::Right => IVec2::X,
        }
    }
}

/// Location of a single cave cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    x: u8,
    y: u8,
}

impl CellCoord {
    /// The four corners of the cave, bottom edge first.
    pub const CORNERS: [CellCoord; 4] = [
        CellCoord::new(0, 0),
        CellCoord::new(GRID_SIZE - 1, 0),
        CellCoord::new(0, GRID_SIZE - 1),
        CellCoord::new(GRID_SIZE - 1, GRID_SIZE - 1),
    ];

    /// Creates a coordinate inside the cave.
    ///
    /// # Panics
    ///
    /// Panics when either component lies outside `0..GRID_SIZE`.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!(x < GRID_SIZE && y < GRID_SIZE, "cell outside the cave");
        Self { x, y }
    }

    /// Creates a coordinate from signed components, rejecting anything off the grid.
    #[must_use]
    pub fn from_vector(position: IVec2) -> Option<Self> {
        let x = u8::try_from(position.x).ok()?;
        let y = u8::try_from(position.y).ok()?;
        (x < GRID_SIZE && y < GRID_SIZE).then_some(Self { x, y })
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Zero-based row index of the cell, counted from the bottom edge.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Signed vector form of the coordinate.
    #[must_use]
    pub fn to_vector(self) -> IVec2 {
        IVec2::new(i32::from(self.x), i32::from(self.y))
    }

    /// Dense row-major index of the cell.
    #[must_use]
    pub const fn index(self) -> usize {
        self.y as usize * GRID_SIZE as usize + self.x as usize
    }

    /// Neighbouring cell one step in `direction`, or `None` at the cave wall.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        Self::from_vector(self.to_vector() + direction.unit_vector())
    }

    /// Orthogonal neighbours that lie inside the cave.
    pub fn neighbours(self) -> impl Iterator<Item = CellCoord> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }

    /// Reports whether the cell lies on the bottom row.
    #[must_use]
    pub const fn on_bottom_edge(&self) -> bool {
        self.y == 0
    }

    /// Iterates over every cave cell in row-major order.
    pub fn all() -> impl Iterator<Item = CellCoord> {
        (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| CellCoord { x, y }))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Content of a single cave cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Hazard {
    /// Nothing dangerous lives here.
    #[default]
    Empty,
    /// A bottomless pit.
    Pit,
    /// A colony of bats that carries intruders away.
    Bat,
    /// The Wumpus itself.
    Wumpus,
}

/// Commands decoded from player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests a single step in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the arrow is shot in the player's facing direction.
    Fire,
}

/// Lifecycle stage of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The cave is being built and introduced.
    #[default]
    Generating,
    /// The player is exploring and may move or shoot.
    Exploring,
    /// A fatal or victorious event is being presented.
    Resolving,
    /// The round ended; a new one has to be started.
    Over,
}

/// Result of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The round has not been decided yet.
    #[default]
    Unset,
    /// The arrow found the Wumpus.
    Won,
    /// The player fell into a pit.
    LostPit,
    /// The Wumpus got the player.
    LostWumpus,
}

impl Outcome {
    /// Text scrolled on the display once the round is decided.
    #[must_use]
    pub const fn text(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Won => Some("You defeated the Wumpus!"),
            Self::LostPit => Some("You fell to your death"),
            Self::LostWumpus => Some("The Wumpus killed you!"),
        }
    }

    /// Reports whether the outcome counts as a loss.
    #[must_use]
    pub const fn is_loss(self) -> bool {
        matches!(self, Self::LostPit | Self::LostWumpus)
    }
}

/// Named presentation sequences played at specific state transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Theme and cave entrance shown before a round starts.
    Intro,
    /// Faint chirps heard next to a bat colony.
    BatSqueak,
    /// Bats grab the player and fly off.
    BatCapture,
    /// The player tumbles into a pit.
    PitFall,
    /// The arrow leaves the bow.
    ArrowFire,
    /// The arrow strikes the Wumpus.
    WumpusKill,
    /// The arrow flies past into the dark.
    ArrowMiss,
    /// The Wumpus attacks the player.
    WumpusAttack,
    /// Victory celebration.
    WinFanfare,
}

/// One square-wave tone emitted on the speaker output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tone {
    /// Pitch of the tone in hertz.
    pub frequency_hz: u32,
    /// Time the tone sounds for.
    pub duration: Duration,
    /// Silence inserted after the tone.
    pub post_delay: Duration,
}

impl Tone {
    /// Creates a tone from millisecond timings.
    #[must_use]
    pub const fn from_millis(frequency_hz: u32, duration_ms: u64, post_delay_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
            post_delay: Duration::from_millis(post_delay_ms),
        }
    }
}

/// State of the two sense indicator outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SenseIndicators {
    /// Green light: the Wumpus lurks next door.
    pub wumpus_near: bool,
    /// Red light: a draught rises from a neighbouring pit.
    pub pit_near: bool,
}

impl SenseIndicators {
    /// Both indicators switched off.
    pub const OFF: Self = Self {
        wumpus_near: false,
        pit_near: false,
    };
}

/// One poll of the raw hardware inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputSample {
    /// Raw X axis reading.
    pub x: u16,
    /// Raw Y axis reading.
    pub y: u16,
    /// Whether the fire button reads pressed.
    pub button: bool,
    /// Monotonic time since boot at which the sample was taken.
    pub at: Duration,
}

impl InputSample {
    /// Reading of a centred stick at the midpoint of a 16-bit ADC.
    pub const CENTRE: u16 = 0x8000;

    /// Sample with the stick centred and the button released.
    #[must_use]
    pub const fn idle(at: Duration) -> Self {
        Self {
            x: Self::CENTRE,
            y: Self::CENTRE,
            button: false,
            at,
        }
    }
}

/// Aggregate win/loss counters kept across rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scoreboard {
    /// Rounds the player won.
    pub won: u64,
    /// Rounds the player lost.
    pub lost: u64,
}

impl Scoreboard {
    /// Counts a finished round.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => self.won = self.won.saturating_add(1),
            Outcome::LostPit | Outcome::LostWumpus => self.lost = self.lost.saturating_add(1),
            Outcome::Unset => {}
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "won {} / lost {}", self.won, self.lost)
    }
}

/// Events broadcast by the round controller after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A freshly generated cave is ready.
    RoundStarted {
        /// Cell the player starts on.
        start: CellCoord,
        /// Initial facing of the player.
        facing: Direction,
    },
    /// The player stepped into a neighbouring cell.
    PlayerMoved {
        /// Cell the player left.
        from: CellCoord,
        /// Cell the player entered.
        to: CellCoord,
    },
    /// A step was absorbed by the cave wall.
    MoveBlocked {
        /// Cell the player remains on.
        at: CellCoord,
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// The sense indicators were refreshed for the player's cell.
    SensesUpdated {
        /// Cell whose senses were read.
        cell: CellCoord,
        /// Indicator state applied to the outputs.
        indicators: SenseIndicators,
    },
    /// Bats can be heard from the player's cell.
    BatsHeard {
        /// Cell the squeak was heard from.
        cell: CellCoord,
    },
    /// Bats carried the player to another cell.
    CarriedByBat {
        /// Bat cell the player was grabbed on.
        from: CellCoord,
        /// Empty cell the player was dropped on.
        to: CellCoord,
    },
    /// The player fell into a pit.
    FellIntoPit {
        /// Pit cell.
        cell: CellCoord,
    },
    /// The player walked into the Wumpus.
    MetWumpus {
        /// Wumpus cell.
        cell: CellCoord,
    },
    /// The arrow was shot.
    ArrowFired {
        /// Cell the arrow was shot from.
        from: CellCoord,
        /// Direction of flight.
        direction: Direction,
    },
    /// The arrow flew into the cave wall without effect.
    ArrowWasted {
        /// Cell the arrow was shot from.
        from: CellCoord,
        /// Direction of flight.
        direction: Direction,
    },
    /// The arrow killed the Wumpus.
    WumpusSlain {
        /// Cell the Wumpus occupied.
        cell: CellCoord,
    },
    /// The arrow hit nothing and woke the Wumpus.
    ArrowMissed {
        /// Cell the arrow landed in.
        target: CellCoord,
    },
    /// The round was decided.
    RoundOver {
        /// Final outcome of the round.
        outcome: Outcome,
    },
}

/// Source of uniformly distributed small integers.
pub trait RandomSource {
    /// Returns a value drawn uniformly from the half-open `range`.
    ///
    /// Callers never pass an empty range.
    fn range(&mut self, range: Range<u8>) -> u8;
}

/// Rendering and audio surface driven by the round controller.
///
/// Every method is synchronous. In particular [`Presentation::play_cue`] must
/// only return once the cue finished, because the engine relies on no input
/// being polled while a cue plays.
pub trait Presentation {
    /// Blanks the frame buffer without showing the result.
    fn clear(&mut self);

    /// Sets or clears a single pixel in the frame buffer.
    fn plot(&mut self, cell: CellCoord, on: bool);

    /// Pushes the frame buffer to the display.
    fn draw(&mut self);

    /// Plays a named animation and tone sequence to completion.
    fn play_cue(&mut self, cue: Cue);

    /// Scrolls a line of text across the display.
    fn print(&mut self, text: &str);

    /// Adjusts display brightness within `0..=MAX_BRIGHTNESS`.
    fn set_brightness(&mut self, level: u8);

    /// Drives the two sense indicator outputs.
    fn set_sense_indicators(&mut self, indicators: SenseIndicators);
}

/// Producer of raw input samples, one per tick.
pub trait InputPort {
    /// Reads the next sample, or `None` once the source is exhausted.
    fn sample(&mut self) -> Option<InputSample>;
}

/// Fatal failures raised while bringing up the hardware surfaces.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HardwareError {
    /// The display bus could not be configured.
    #[error("display bus unavailable: {reason}")]
    Bus {
        /// Description reported by the driver.
        reason: String,
    },
    /// A pin or analog channel could not be configured.
    #[error("pin {pin} could not be configured: {reason}")]
    Pin {
        /// Name of the offending pin.
        pin: &'static str,
        /// Description reported by the driver.
        reason: String,
    },
    /// The tick timer cannot run at the requested interval.
    #[error("tick timer cannot run every {interval:?}")]
    Timer {
        /// Requested time between two ticks.
        interval: Duration,
    },
    /// The joystick calibration leaves no usable dead-zone.
    #[error("joystick dead-zone {lower}..={upper} is empty")]
    Calibration {
        /// Configured lower limit.
        lower: u16,
        /// Configured upper limit.
        upper: u16,
    },
}
