//! Dice Tray - an animated polyhedral dice widget
//!
//! Core modules:
//! - `scene`: Deterministic layout/animation engine (grid layout, roll clock, tray model)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted widget preferences

pub mod renderer;
pub mod scene;
pub mod settings;

pub use scene::{DiceScene, DiceStyle, DieInstruction, FaceCount};
pub use settings::Settings;

/// Widget timing and layout constants
pub mod consts {
    /// Gap between grid cells and the container edges (layout units)
    pub const GRID_PADDING: f32 = 16.0;
    /// Reference die size for headless hosts (layout units)
    pub const DIE_BASE_SIZE: f32 = 50.0;

    /// Dead time between the roll request and visible motion (ms)
    pub const ROLL_START_DELAY_MS: f32 = 180.0;
    /// Tumbling time (ms)
    pub const ROLL_DURATION_MS: f32 = 2055.0;
    /// Dead time after motion stops, before results reveal (ms)
    pub const ROLL_END_DELAY_MS: f32 = 1475.0;
    /// Full request-to-reveal span (ms)
    pub const ROLL_TOTAL_MS: f32 = ROLL_START_DELAY_MS + ROLL_DURATION_MS + ROLL_END_DELAY_MS;

    /// Full spins per axis unit over one roll
    pub const FULL_ROTATIONS: f32 = 15.0;
    /// Reposition and scale transition length (ms)
    pub const REFLOW_MS: f32 = 1000.0;
    /// Below this rendered scale a die is not worth drawing (layout units)
    pub const MIN_VISIBLE_SCALE: f32 = 0.5;
}
