//! Deterministic widget engine
//!
//! Everything observable here is a pure function of the inputs the host
//! feeds in: frame deltas (never wall clock reads), reported container
//! sizes, button presses, and the roller seed. Iteration order is tray
//! insertion order throughout. No module below this one knows about the
//! DOM, the GPU, or storage.

pub mod anim;
pub mod ease;
pub mod layout;
pub mod roll;
pub mod state;
pub mod tray;

pub use anim::{RollClock, RollPhase, Transition};
pub use layout::{LayoutFrame, compute_layout};
pub use roll::{Aggregation, DieRoller, PcgRoller, RollOutcome, aggregate};
pub use state::{DiceScene, DiceStyle, DieInstruction, SceneEvent};
pub use tray::{Die, FaceCount, Tray};
