use super::{Cell, rules::Rule};
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;

/// Smallest accepted grid edge.
pub const GRID_MIN_SIZE: usize = 10;
/// Largest accepted grid edge.
pub const GRID_MAX_SIZE: usize = 2000;

/// Errors surfaced by grid construction and resizing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid dimensions {width}x{height}, each axis must be {min}..={max}",
        min = GRID_MIN_SIZE, max = GRID_MAX_SIZE)]
    InvalidDimensions { width: usize, height: usize },
}

/// Grid manages the 2D cellular automaton state.
///
/// Cells are stored densely in row-major order with row 0 as the bottom row
/// of the logical coordinate space (`index = y * width + x`). Hosts convert
/// device coordinates (including the screen-down Y flip) before calling in;
/// the grid itself never sees pixels.
///
/// Coordinate writes outside the grid are silently ignored and reads return
/// a dead cell, so painting tools can run past the edge without faulting.
#[derive(Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with all cells initially dead.
    /// Dimensions outside `GRID_MIN_SIZE..=GRID_MAX_SIZE` are rejected here,
    /// regardless of any validation the host performed.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::validate(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::DEAD; width * height],
        })
    }

    fn validate(width: usize, height: usize) -> Result<(), GridError> {
        let in_range = |n: usize| (GRID_MIN_SIZE..=GRID_MAX_SIZE).contains(&n);
        if in_range(width) && in_range(height) {
            Ok(())
        } else {
            Err(GridError::InvalidDimensions { width, height })
        }
    }

    /// Get grid dimensions
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Convert 2D coordinates to 1D index
    const fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Index for signed coordinates; None when off the grid.
    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height)
            .then(|| self.index(x as usize, y as usize))
    }

    /// Get cell at position. Out-of-range coordinates read as dead.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.checked_index(x, y)
            .map(|idx| self.cells[idx])
            .unwrap_or(Cell::DEAD)
    }

    /// Set cell at position. Out-of-range coordinates are a no-op.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(idx) = self.checked_index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Flip a single cell between dead and alive. Out-of-range is a no-op.
    pub fn toggle(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.checked_index(x, y) {
            self.cells[idx] = self.cells[idx].toggled();
        }
    }

    /// Clear all cells to dead state without touching dimensions.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::DEAD);
    }

    /// Set each cell alive with probability `density`, independently.
    /// The generator is passed in so callers control determinism.
    pub fn randomize(&mut self, rng: &mut impl Rng, density: f64) {
        let density = density.clamp(0.0, 1.0);
        self.cells.iter_mut().for_each(|cell| {
            *cell = if rng.random_bool(density) {
                Cell::ALIVE
            } else {
                Cell::DEAD
            };
        });
    }

    /// Replace backing storage with new dimensions, keeping live cells in
    /// the overlapping region at identical coordinates. Cells outside the
    /// overlap are dropped; new cells start dead. A failed resize leaves
    /// the grid exactly as it was.
    pub fn resize(&mut self, new_width: usize, new_height: usize) -> Result<(), GridError> {
        Self::validate(new_width, new_height)?;

        let mut cells = vec![Cell::DEAD; new_width * new_height];
        for y in 0..self.height.min(new_height) {
            for x in 0..self.width.min(new_width) {
                cells[y * new_width + x] = self.cells[self.index(x, y)];
            }
        }

        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
        Ok(())
    }

    /// Rasterize a line of live cells between two grid coordinates using
    /// Bresenham's algorithm. Both endpoints are included, and drawing from
    /// A to B lights the same cells as drawing from B to A. Segments that
    /// leave the grid are clipped cell by cell.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        // Canonical endpoint order keeps the raster symmetric in A and B
        let ((x0, y0), (x1, y1)) = if (x1, y1) < (x0, y0) {
            ((x1, y1), (x0, y0))
        } else {
            ((x0, y0), (x1, y1))
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x, y, Cell::ALIVE);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Set every cell within Euclidean distance `radius` of the center
    /// alive. Radius 0 behaves as a single-cell set; the part of the disc
    /// hanging off the grid is ignored.
    pub fn add_cells_in_area(&mut self, center_x: i32, center_y: i32, radius: i32) {
        let radius = radius.max(0);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set(center_x + dx, center_y + dy, Cell::ALIVE);
                }
            }
        }
    }

    /// Count live neighbors using toroidal wrapping (grid wraps like a torus)
    fn count_live_neighbors(&self, x: usize, y: usize) -> u8 {
        let w = self.width as i32;
        let h = self.height as i32;

        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter(|&(dx, dy)| {
                // Toroidal wrapping
                let nx = ((x as i32 + dx) % w + w) % w;
                let ny = ((y as i32 + dy) % h + h) % h;
                self.cells[ny as usize * self.width + nx as usize].is_alive()
            })
            .count() as u8
    }

    /// Pure functional evolution - returns the next generation (serial).
    /// Reads only this grid and writes only the fresh buffer, so callers
    /// never observe a half-stepped generation.
    pub fn evolve(&self, rule: &dyn Rule) -> Self {
        let cells = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| {
                let current = self.cells[self.index(x, y)];
                let neighbors = self.count_live_neighbors(x, y);
                rule.evolve(current, neighbors)
            })
            .collect();

        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Parallel evolution using rayon for large grids
    /// Much faster for grids > 100x100
    pub fn evolve_parallel(&self, rule: &dyn Rule) -> Self {
        let cells: Vec<Cell> = (0..self.height)
            .into_par_iter()
            .flat_map(|y| (0..self.width).into_par_iter().map(move |x| (x, y)))
            .map(|(x, y)| {
                let current = self.cells[self.index(x, y)];
                let neighbors = self.count_live_neighbors(x, y);
                rule.evolve(current, neighbors)
            })
            .collect();

        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Count total alive cells
    pub fn count_alive(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Iterate over all cells with their positions
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| (x, y, self.cells[self.index(x, y)]))
    }

    /// Coordinates of every live cell, in storage order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.iter_cells()
            .filter(|&(_, _, cell)| cell.is_alive())
            .map(|(x, y, _)| (x, y))
    }

    /// Raw cell storage in scan order (row 0 first). This is the only
    /// window into the internal layout; the presentation adapter reads it.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
