#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative cave state for Hunt the Wumpus.
//!
//! A [`World`] is built once per round, either by [`World::generate`] or from
//! an explicit layout. Hazards never move after construction; only the
//! visited grid changes while the player explores. The three sense layers are
//! derived from the hazards in one pass and stay read-only.

mod grid;
mod rng;

use std::ops::Range;

use log::debug;
use thiserror::Error;
use wumpus_core::{
    CellCoord, Direction, Hazard, RandomSource, SenseIndicators, GRID_SIZE,
};

pub use grid::CellGrid;
pub use rng::CaveRng;

/// Number of bats or pits placed is drawn from this range.
const HAZARD_COUNT_RANGE: Range<u8> = 1..4;

/// Rejection sampling never needs anywhere near this many draws with at most
/// seven occupied cells out of sixty-four.
const MAX_REJECTION_DRAWS: u32 = 4_096;

/// Cell and facing the player starts a round with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Spawn {
    /// Start cell, always one of the cave corners for generated worlds.
    pub cell: CellCoord,
    /// Initial facing, pointing into the cave.
    pub facing: Direction,
}

impl Spawn {
    /// Derives the spawn for a corner: bottom corners face up, top corners face down.
    #[must_use]
    pub const fn at_corner(cell: CellCoord) -> Self {
        let facing = if cell.on_bottom_edge() {
            Direction::Up
        } else {
            Direction::Down
        };
        Self { cell, facing }
    }
}

/// Sense readings for a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Senses {
    /// The Wumpus is adjacent.
    pub stink: bool,
    /// A pit is adjacent.
    pub draught: bool,
    /// Bats are adjacent.
    pub sound: bool,
}

impl Senses {
    /// Indicator outputs that represent these senses.
    #[must_use]
    pub const fn indicators(self) -> SenseIndicators {
        SenseIndicators {
            wumpus_near: self.stink,
            pit_near: self.draught,
        }
    }
}

/// Boolean layers marking cells next to each hazard kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SenseLayers {
    stink: CellGrid<bool>,
    draught: CellGrid<bool>,
    sound: CellGrid<bool>,
}

impl SenseLayers {
    /// Derives all three layers from a hazard grid.
    ///
    /// Every hazard marks its orthogonal in-bounds neighbours in the matching
    /// layer. The result depends on nothing but `hazards`.
    #[must_use]
    pub fn derive(hazards: &CellGrid<Hazard>) -> Self {
        let mut layers = Self {
            stink: CellGrid::filled(false),
            draught: CellGrid::filled(false),
            sound: CellGrid::filled(false),
        };

        for (cell, hazard) in hazards.iter() {
            let layer = match hazard {
                Hazard::Empty => continue,
                Hazard::Wumpus => &mut layers.stink,
                Hazard::Pit => &mut layers.draught,
                Hazard::Bat => &mut layers.sound,
            };
            for neighbour in cell.neighbours() {
                layer.set(neighbour, true);
            }
        }

        layers
    }

    /// Senses perceived on `cell`.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Senses {
        Senses {
            stink: self.stink.get(cell),
            draught: self.draught.get(cell),
            sound: self.sound.get(cell),
        }
    }

    /// Cells next to the Wumpus.
    #[must_use]
    pub const fn stink(&self) -> &CellGrid<bool> {
        &self.stink
    }

    /// Cells next to a pit.
    #[must_use]
    pub const fn draught(&self) -> &CellGrid<bool> {
        &self.draught
    }

    /// Cells next to a bat colony.
    #[must_use]
    pub const fn sound(&self) -> &CellGrid<bool> {
        &self.sound
    }
}

/// Reasons an explicit cave layout may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A hazard was placed on the player's start cell.
    #[error("hazard {hazard:?} occupies the spawn cell {cell}")]
    SpawnOccupied {
        /// Spawn cell.
        cell: CellCoord,
        /// Hazard found there.
        hazard: Hazard,
    },
    /// Two hazards were assigned to the same cell.
    #[error("cell {cell} was assigned more than one hazard")]
    DuplicateCell {
        /// Contested cell.
        cell: CellCoord,
    },
}

/// Represents the cave explored during a single round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    hazards: CellGrid<Hazard>,
    visited: CellGrid<bool>,
    senses: SenseLayers,
    spawn: Spawn,
}

impl World {
    /// Generates a fresh cave with a random start corner and hazard layout.
    ///
    /// Bats are placed first, then pits, then the single Wumpus, each on a
    /// distinct empty cell other than the start cell.
    pub fn generate(rng: &mut impl RandomSource) -> Self {
        let corner_count = CellCoord::CORNERS.len() as u8;
        let corner = CellCoord::CORNERS[usize::from(rng.range(0..corner_count))];
        let spawn = Spawn::at_corner(corner);

        let mut hazards = CellGrid::filled(Hazard::Empty);
        let bats = rng.range(HAZARD_COUNT_RANGE);
        place_hazards(&mut hazards, rng, spawn.cell, Hazard::Bat, bats);
        let pits = rng.range(HAZARD_COUNT_RANGE);
        place_hazards(&mut hazards, rng, spawn.cell, Hazard::Pit, pits);
        place_hazards(&mut hazards, rng, spawn.cell, Hazard::Wumpus, 1);

        debug!(
            "generated cave: start {} facing {:?}, {bats} bats, {pits} pits",
            spawn.cell, spawn.facing
        );

        Self::from_parts(hazards, spawn)
    }

    /// Builds a cave from an explicit hazard list.
    ///
    /// Cells not mentioned stay empty. No hazard may sit on the spawn cell and
    /// no cell may be listed twice.
    pub fn from_layout(spawn: Spawn, layout: &[(CellCoord, Hazard)]) -> Result<Self, LayoutError> {
        let mut hazards = CellGrid::filled(Hazard::Empty);
        let mut assigned = CellGrid::filled(false);

        for &(cell, hazard) in layout {
            if assigned.get(cell) {
                return Err(LayoutError::DuplicateCell { cell });
            }
            assigned.set(cell, true);

            if hazard == Hazard::Empty {
                continue;
            }
            if cell == spawn.cell {
                return Err(LayoutError::SpawnOccupied { cell, hazard });
            }
            hazards.set(cell, hazard);
        }

        Ok(Self::from_parts(hazards, spawn))
    }

    /// Builds a cave without any hazards.
    #[must_use]
    pub fn empty(spawn: Spawn) -> Self {
        Self::from_parts(CellGrid::filled(Hazard::Empty), spawn)
    }

    fn from_parts(hazards: CellGrid<Hazard>, spawn: Spawn) -> Self {
        let senses = SenseLayers::derive(&hazards);
        Self {
            hazards,
            visited: CellGrid::filled(false),
            senses,
            spawn,
        }
    }

    /// Records that the player has stood on `cell`.
    pub fn mark_visited(&mut self, cell: CellCoord) {
        self.visited.set(cell, true);
    }

    /// Picks a uniformly random empty cell to drop a bat victim on.
    pub fn relocation_target(&self, rng: &mut impl RandomSource) -> CellCoord {
        sample_cell(rng, |cell| self.hazards.get(cell) == Hazard::Empty)
    }
}

/// Query functions that provide read-only access to the cave.
pub mod query {
    use wumpus_core::{CellCoord, Hazard};

    use super::{CellGrid, SenseLayers, Senses, Spawn, World};

    /// Hazard occupying `cell`.
    #[must_use]
    pub fn hazard_at(world: &World, cell: CellCoord) -> Hazard {
        world.hazards.get(cell)
    }

    /// Senses perceived on `cell`.
    #[must_use]
    pub fn senses_at(world: &World, cell: CellCoord) -> Senses {
        world.senses.at(cell)
    }

    /// Whether the player has already stood on `cell`.
    #[must_use]
    pub fn is_visited(world: &World, cell: CellCoord) -> bool {
        world.visited.get(cell)
    }

    /// Full visited grid, used for rendering.
    #[must_use]
    pub fn visited(world: &World) -> &CellGrid<bool> {
        &world.visited
    }

    /// Full hazard grid.
    #[must_use]
    pub fn hazards(world: &World) -> &CellGrid<Hazard> {
        &world.hazards
    }

    /// Derived sense layers.
    #[must_use]
    pub fn sense_layers(world: &World) -> &SenseLayers {
        &world.senses
    }

    /// Start cell and facing chosen for the round.
    #[must_use]
    pub fn spawn(world: &World) -> Spawn {
        world.spawn
    }
}

fn place_hazards(
    hazards: &mut CellGrid<Hazard>,
    rng: &mut impl RandomSource,
    start: CellCoord,
    hazard: Hazard,
    count: u8,
) {
    for _ in 0..count {
        let cell = sample_cell(rng, |cell| {
            cell != start && hazards.get(cell) == Hazard::Empty
        });
        hazards.set(cell, hazard);
    }
}

fn sample_cell(
    rng: &mut impl RandomSource,
    mut accept: impl FnMut(CellCoord) -> bool,
) -> CellCoord {
    let mut draws = 0_u32;
    loop {
        let x = rng.range(0..GRID_SIZE);
        let y = rng.range(0..GRID_SIZE);
        let cell = CellCoord::new(x, y);
        if accept(cell) {
            return cell;
        }

        draws += 1;
        debug_assert!(
            draws < MAX_REJECTION_DRAWS,
            "rejection sampling found no free cell"
        );
    }
}
