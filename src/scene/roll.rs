//! Roll evaluation: seeded randomness and result aggregation
//!
//! The scene never touches a global RNG. Everything random flows through a
//! `DieRoller`, so tests can script exact faces and a replay with the same
//! seed produces the same rolls.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::tray::FaceCount;

/// Source of die results
pub trait DieRoller {
    /// Uniform result in `1..=faces.sides()`
    fn roll(&mut self, faces: FaceCount) -> u32;
}

/// Default roller backed by a small seeded PCG generator
pub struct PcgRoller {
    rng: Pcg32,
}

impl PcgRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl DieRoller for PcgRoller {
    fn roll(&mut self, faces: FaceCount) -> u32 {
        self.rng.random_range(1..=faces.sides())
    }
}

/// How a set of results reduces to one total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    #[default]
    Sum,
    KeepHighest,
    KeepLowest,
}

/// One completed roll of the whole tray
#[derive(Debug, Clone, PartialEq)]
pub struct RollOutcome {
    /// Per-die results in tray order
    pub results: Vec<u32>,
    pub total: u32,
    pub aggregation: Aggregation,
}

/// Reduce per-die results to a single total. Empty input totals zero.
pub fn aggregate(results: &[u32], aggregation: Aggregation) -> u32 {
    match aggregation {
        Aggregation::Sum => results.iter().sum(),
        Aggregation::KeepHighest => results.iter().copied().max().unwrap_or(0),
        Aggregation::KeepLowest => results.iter().copied().min().unwrap_or(0),
    }
}
