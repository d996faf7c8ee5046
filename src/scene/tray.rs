//! Dice collection: the ordered multiset of dice on the tray
//!
//! Insertion order is preserved and ids are monotonic, never reused.
//! Removal is two-step: `request_remove` marks the most recently added
//! matching die, and the animation layer calls `confirm_removed` once the
//! exit has been shown, so data never disappears mid-frame.

use std::f32::consts::PI;

use glam::Vec3;

use super::roll::DieRoller;

/// Supported polyhedral dice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceCount {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl FaceCount {
    /// All supported dice, ascending by side count
    pub const ALL: [FaceCount; 6] = [
        FaceCount::D4,
        FaceCount::D6,
        FaceCount::D8,
        FaceCount::D10,
        FaceCount::D12,
        FaceCount::D20,
    ];

    /// Number of distinct outcomes
    #[inline]
    pub fn sides(self) -> u32 {
        match self {
            FaceCount::D4 => 4,
            FaceCount::D6 => 6,
            FaceCount::D8 => 8,
            FaceCount::D10 => 10,
            FaceCount::D12 => 12,
            FaceCount::D20 => 20,
        }
    }

    /// Boundary conversion from a raw side count. Unknown values are
    /// rejected here so downstream code only ever sees supported dice.
    pub fn from_sides(sides: u32) -> Option<FaceCount> {
        match sides {
            4 => Some(FaceCount::D4),
            6 => Some(FaceCount::D6),
            8 => Some(FaceCount::D8),
            10 => Some(FaceCount::D10),
            12 => Some(FaceCount::D12),
            20 => Some(FaceCount::D20),
            _ => None,
        }
    }

    /// Static visual asset identifier for this die
    pub fn asset_id(self) -> &'static str {
        match self {
            FaceCount::D4 => "d4",
            FaceCount::D6 => "d6",
            FaceCount::D8 => "d8",
            FaceCount::D10 => "d10",
            FaceCount::D12 => "d12",
            FaceCount::D20 => "d20",
        }
    }

    /// Orientation (radians) the die settles into between rolls
    pub fn rest_rotation(self) -> Vec3 {
        match self {
            FaceCount::D4 => Vec3::new(0.8 * PI, 0.25 * PI, 0.0),
            FaceCount::D6 => Vec3::ZERO,
            FaceCount::D8 => Vec3::new(0.2 * PI, 0.25 * PI, 0.0),
            FaceCount::D10 => Vec3::new(0.65 * PI, 0.0, 0.3 * PI),
            FaceCount::D12 => Vec3::new(0.175 * PI, 0.5 * PI, 0.0),
            FaceCount::D20 => Vec3::new(0.125 * PI, 0.5 * PI, 0.0),
        }
    }
}

/// One die on the tray
#[derive(Debug, Clone)]
pub struct Die {
    pub id: u32,
    pub faces: FaceCount,
    /// Marked by `request_remove`; the die stays until its exit is confirmed
    pub pending_removal: bool,
    /// Last rolled result, if any
    pub result: Option<u32>,
}

/// Ordered dice collection, append-on-add
#[derive(Debug, Clone, Default)]
pub struct Tray {
    dice: Vec<Die>,
    next_id: u32,
}

impl Tray {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_die_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a new die; returns its id
    pub fn add(&mut self, faces: FaceCount) -> u32 {
        let id = self.next_die_id();
        self.dice.push(Die {
            id,
            faces,
            pending_removal: false,
            result: None,
        });
        id
    }

    /// Mark the most recently added live die with this face count for
    /// removal. Returns the marked id, or None (silent no-op) when nothing
    /// matches. Repeated clicks peel dice off in reverse add order.
    pub fn request_remove(&mut self, faces: FaceCount) -> Option<u32> {
        let die = self
            .dice
            .iter_mut()
            .rev()
            .find(|d| d.faces == faces && !d.pending_removal)?;
        die.pending_removal = true;
        Some(die.id)
    }

    /// Delete a die whose removal animation has completed. Unknown ids are
    /// ignored.
    pub fn confirm_removed(&mut self, id: u32) {
        self.dice.retain(|d| d.id != id);
    }

    /// Live, non-removal-pending dice with this face count
    pub fn count(&self, faces: FaceCount) -> usize {
        self.dice
            .iter()
            .filter(|d| d.faces == faces && !d.pending_removal)
            .count()
    }

    /// All dice still present, including removal-pending ones
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Dice that take part in layout and rolls
    pub fn live_count(&self) -> usize {
        self.dice.iter().filter(|d| !d.pending_removal).count()
    }

    /// All dice in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.dice.iter()
    }

    /// Roll every live die, recording and returning results in tray order.
    /// Stale results from earlier rolls are cleared first so a shrinking
    /// die never carries a label into the new roll.
    pub fn roll_all<R: DieRoller + ?Sized>(&mut self, roller: &mut R) -> Vec<u32> {
        for die in &mut self.dice {
            die.result = None;
        }
        let mut results = Vec::with_capacity(self.dice.len());
        for die in self.dice.iter_mut().filter(|d| !d.pending_removal) {
            let result = roller.roll(die.faces);
            die.result = Some(result);
            results.push(result);
        }
        results
    }
}
