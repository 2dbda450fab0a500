use crate::domain::{Cell, Grid, GridError, Pattern, PatternKind, Rule, default_rule};
use crate::presentation::FrameBuffer;
use rand::{SeedableRng, rngs::SmallRng};

/// Cell count at which stepping switches to the rayon path.
/// The parallel evolution pays off for grids past roughly 100x100.
const PARALLEL_THRESHOLD: usize = 100 * 100;

/// Fraction of cells `randomize` brings to life.
const RANDOM_FILL_DENSITY: f64 = 0.5;

/// Grids at least this wide and tall get the spread-out glider placement.
const SCALED_PLACEMENT_MIN: usize = 200;

/// Engine orchestrates the simulation for a host.
///
/// It owns exactly one grid, the active rule, and the random source, and is
/// driven synchronously: every call runs to completion with no partially
/// visible state. The engine keeps no generation counter; hosts that show
/// one count their own `step` calls.
pub struct Engine {
    grid: Grid,
    rule: Box<dyn Rule>,
    rng: SmallRng,
}

impl Engine {
    /// Create an engine with an all-dead grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Ok(Self::with_parts(Grid::new(width, height)?, SmallRng::from_os_rng()))
    }

    /// Create an engine whose random source is seeded, so `randomize`
    /// output is reproducible. Used by tests and replayable hosts.
    pub fn from_seed(width: usize, height: usize, seed: u64) -> Result<Self, GridError> {
        Ok(Self::with_parts(
            Grid::new(width, height)?,
            SmallRng::seed_from_u64(seed),
        ))
    }

    fn with_parts(grid: Grid, rng: SmallRng) -> Self {
        Self { grid, rule: default_rule(), rng }
    }

    /// Swap in a different automaton rule.
    pub fn set_rule(&mut self, rule: Box<dyn Rule>) {
        self.rule = rule;
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// Read access to the grid, for hosts that inspect state directly.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Advance the simulation by one generation. Total: cannot fail.
    pub fn step(&mut self) {
        let (w, h) = self.grid.dimensions();
        self.grid = if w * h >= PARALLEL_THRESHOLD {
            self.grid.evolve_parallel(self.rule.as_ref())
        } else {
            self.grid.evolve(self.rule.as_ref())
        };
    }

    /// Snapshot the grid for rendering.
    pub fn render(&self) -> FrameBuffer {
        FrameBuffer::from_grid(&self.grid)
    }

    /// Change grid dimensions, preserving the overlapping region.
    /// On failure the previous grid is untouched. Any frame buffer obtained
    /// earlier keeps its old dimensions; hosts re-render after resizing.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GridError> {
        self.grid.resize(width, height)
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Repopulate the grid at random, each cell independently alive with
    /// probability one half.
    pub fn randomize(&mut self) {
        self.grid.randomize(&mut self.rng, RANDOM_FILL_DENSITY);
    }

    pub fn toggle_cell(&mut self, x: i32, y: i32) {
        self.grid.toggle(x, y);
    }

    pub fn set_cell(&mut self, x: i32, y: i32, intensity: u8) {
        self.grid.set(x, y, Cell::with_intensity(intensity));
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.grid.draw_line(x0, y0, x1, y1);
    }

    pub fn add_cells_in_area(&mut self, x: i32, y: i32, radius: i32) {
        self.grid.add_cells_in_area(x, y, radius);
    }

    /// Clear the grid and stamp a library pattern roughly centered.
    /// Patterns larger than the grid are clipped silently; placement is
    /// deterministic for a given grid size.
    pub fn load_pattern(&mut self, kind: PatternKind) {
        self.grid.clear();
        let pattern = kind.pattern();
        let (w, h) = self.grid.dimensions();
        for (x, y) in anchors(kind, &pattern, w, h) {
            pattern.place_on(&mut self.grid, x, y);
        }
    }
}

/// Anchor positions that roughly center `pattern` on a w x h grid.
/// Large grids spread four gliders around the center so the pattern stays
/// visible at scale; everything else gets the single centered anchor.
fn anchors(kind: PatternKind, pattern: &Pattern, w: usize, h: usize) -> Vec<(i32, i32)> {
    let cx = (w.saturating_sub(pattern.width) / 2) as i32;
    let cy = (h.saturating_sub(pattern.height) / 2) as i32;

    if kind == PatternKind::Glider && w.min(h) >= SCALED_PLACEMENT_MIN {
        [(-30, -30), (30, -30), (-30, 30), (30, 30)]
            .iter()
            .map(|&(ox, oy)| (cx + ox, cy + oy))
            .collect()
    } else {
        vec![(cx, cy)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn live_set(engine: &Engine) -> BTreeSet<(usize, usize)> {
        engine.grid().live_cells().collect()
    }

    #[test]
    fn test_new_validates_dimensions() {
        assert!(Engine::new(10, 10).is_ok());
        assert_eq!(
            Engine::new(9, 10).err(),
            Some(GridError::InvalidDimensions { width: 9, height: 10 })
        );
        assert!(Engine::new(10, 2001).is_err());
    }

    #[test]
    fn test_render_valid_immediately_after_construction() {
        let engine = Engine::new(10, 10).unwrap();
        let frame = engine.render();
        assert_eq!(frame.dimensions(), (10, 10));
        assert!(frame.as_bytes().iter().step_by(4).all(|&r| r == 0));
    }

    #[test]
    fn test_blinker_round_trip() {
        let mut engine = Engine::new(10, 10).unwrap();
        engine.load_pattern(PatternKind::Blinker);
        let loaded = live_set(&engine);
        assert_eq!(loaded.len(), 3);

        engine.step();
        assert_ne!(live_set(&engine), loaded);
        engine.step();
        assert_eq!(live_set(&engine), loaded);
    }

    #[test]
    fn test_load_pattern_replaces_previous_state() {
        let mut engine = Engine::from_seed(20, 20, 5).unwrap();
        engine.randomize();
        engine.load_pattern(PatternKind::Beacon);
        assert_eq!(engine.grid().count_alive(), 6);
    }

    #[test]
    fn test_load_is_deterministic_for_a_grid_size() {
        let mut a = Engine::new(50, 50).unwrap();
        let mut b = Engine::new(50, 50).unwrap();
        a.load_pattern(PatternKind::Pulsar);
        b.load_pattern(PatternKind::Pulsar);
        assert_eq!(live_set(&a), live_set(&b));
        assert_eq!(a.grid().count_alive(), 48);
    }

    #[test]
    fn test_glider_gun_on_small_grid_clips_without_error() {
        let mut engine = Engine::new(10, 10).unwrap();
        engine.load_pattern(PatternKind::GliderGun);
        // Clipped but valid; stepping still works
        assert!(engine.grid().count_alive() < 36);
        engine.step();
        assert_eq!(engine.dimensions(), (10, 10));
    }

    #[test]
    fn test_glider_gun_centered_on_large_grid() {
        let mut engine = Engine::new(100, 100).unwrap();
        engine.load_pattern(PatternKind::GliderGun);
        assert_eq!(engine.grid().count_alive(), 36);
        // Gun is 36x9, so the anchor lands at (32, 45)
        assert!(engine.grid().get(32, 49).is_alive());
    }

    #[test]
    fn test_large_grid_glider_load_spreads_four_copies() {
        let mut engine = Engine::new(200, 200).unwrap();
        engine.load_pattern(PatternKind::Glider);
        assert_eq!(engine.grid().count_alive(), 4 * 5);

        let mut small = Engine::new(199, 199).unwrap();
        small.load_pattern(PatternKind::Glider);
        assert_eq!(small.grid().count_alive(), 5);
    }

    #[test]
    fn test_seeded_randomize_is_reproducible() {
        let mut a = Engine::from_seed(30, 30, 42).unwrap();
        let mut b = Engine::from_seed(30, 30, 42).unwrap();
        a.randomize();
        b.randomize();
        assert_eq!(live_set(&a), live_set(&b));
        assert!(a.grid().count_alive() > 0);
    }

    #[test]
    fn test_resize_failure_keeps_prior_grid() {
        let mut engine = Engine::new(15, 15).unwrap();
        engine.set_cell(7, 7, 255);

        assert!(engine.resize(5, 5).is_err());
        assert_eq!(engine.dimensions(), (15, 15));
        assert!(engine.grid().get(7, 7).is_alive());
    }

    #[test]
    fn test_resize_changes_render_dimensions() {
        let mut engine = Engine::new(15, 15).unwrap();
        engine.resize(30, 12).unwrap();
        let frame = engine.render();
        assert_eq!(frame.dimensions(), (30, 12));
        assert_eq!(frame.as_bytes().len(), 30 * 12 * 4);
    }

    #[test]
    fn test_mutation_primitives_reach_the_grid() {
        let mut engine = Engine::new(20, 20).unwrap();

        engine.set_cell(1, 1, 128);
        assert_eq!(engine.grid().get(1, 1).intensity(), 128);

        engine.toggle_cell(1, 1);
        assert!(!engine.grid().get(1, 1).is_alive());

        engine.draw_line(0, 0, 4, 0);
        assert_eq!(engine.grid().count_alive(), 5);

        engine.clear();
        engine.add_cells_in_area(10, 10, 1);
        assert_eq!(engine.grid().count_alive(), 5);
    }

    #[test]
    fn test_out_of_range_commands_are_harmless() {
        let mut engine = Engine::new(10, 10).unwrap();
        engine.set_cell(3, 3, 255);

        engine.set_cell(-1, 50, 255);
        engine.toggle_cell(99, 99);
        engine.add_cells_in_area(-20, -20, 3);
        engine.draw_line(-5, -5, -1, -1);

        assert_eq!(engine.grid().count_alive(), 1);
        assert!(engine.grid().get(3, 3).is_alive());
    }

    #[test]
    fn test_step_dead_grid_total() {
        let mut engine = Engine::new(10, 10).unwrap();
        engine.step();
        assert_eq!(engine.grid().count_alive(), 0);
    }
}
