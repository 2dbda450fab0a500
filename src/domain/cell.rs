/// Cell represents the fundamental unit of the automaton grid.
/// Each cell carries an 8-bit intensity: 0 is dead, any nonzero value is
/// alive. Intensity never feeds into the automaton rule; it only controls
/// how bright the presentation layer draws the cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Cell(u8);

impl Cell {
    /// Canonical dead cell.
    pub const DEAD: Cell = Cell(0);

    /// Canonical alive cell (full intensity).
    pub const ALIVE: Cell = Cell(255);

    /// Create a cell with an explicit intensity.
    pub const fn with_intensity(intensity: u8) -> Self {
        Cell(intensity)
    }

    /// Raw intensity value.
    pub const fn intensity(self) -> u8 {
        self.0
    }

    /// Check if the cell is currently alive.
    pub const fn is_alive(self) -> bool {
        self.0 != 0
    }

    /// Flip between dead and the canonical alive intensity.
    pub const fn toggled(self) -> Self {
        if self.is_alive() { Cell::DEAD } else { Cell::ALIVE }
    }
}
