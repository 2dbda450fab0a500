// Domain layer - Core simulation logic
pub mod domain;

// Application layer - Engine facade driven by the host
pub mod application;

// Presentation layer - render-ready snapshots for the host
pub mod presentation;

// Re-exports for convenience
pub use application::Engine;
pub use domain::{
    Cell, ConwayRule, GRID_MAX_SIZE, GRID_MIN_SIZE, Grid, GridError, Pattern, PatternKind, Rule,
    default_rule, presets,
};
pub use presentation::FrameBuffer;
