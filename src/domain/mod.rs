mod cell;
mod grid;
mod patterns;
mod rules;

pub use cell::Cell;
pub use grid::{GRID_MAX_SIZE, GRID_MIN_SIZE, Grid, GridError};
pub use patterns::{Pattern, PatternKind, presets};
pub use rules::{ConwayRule, Rule, default_rule};
