use wumpus_core::{CellCoord, CELL_COUNT};

/// Dense per-cell storage covering the whole cave.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellGrid<T> {
    cells: [T; CELL_COUNT],
}

impl<T: Copy> CellGrid<T> {
    /// Creates a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(value: T) -> Self {
        Self {
            cells: [value; CELL_COUNT],
        }
    }

    /// Value stored for `cell`.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> T {
        self.cells[cell.index()]
    }

    pub(crate) fn set(&mut self, cell: CellCoord, value: T) {
        self.cells[cell.index()] = value;
    }

    /// Iterates over every cell together with its value in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, T)> + '_ {
        CellCoord::all().zip(self.cells.iter().copied())
    }
}

impl<T: Copy + PartialEq> CellGrid<T> {
    /// Number of cells holding `value`.
    #[must_use]
    pub fn count(&self, value: T) -> usize {
        self.cells.iter().filter(|cell| **cell == value).count()
    }
}
