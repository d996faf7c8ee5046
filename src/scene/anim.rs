//! Roll clock and reflow transitions
//!
//! All timing here is driven by host-supplied frame deltas, never by wall
//! clock reads, so a scene stepped with the same deltas replays the same
//! animation. The roll clock runs the fixed delay / spin / settle-delay
//! schedule; `Transition` handles the slower glide dice make when the grid
//! reflows around them.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::ease::{self, ease_out_cubic, roll_ease};
use crate::consts;

/// Where the roll clock currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollPhase {
    /// No roll in flight
    #[default]
    Idle,
    /// Triggered, waiting out the start delay
    Pending,
    /// Dice are spinning
    Active,
    /// Spin finished, results are showing
    Settled,
}

/// Fixed-schedule clock for one roll of the whole tray
#[derive(Debug, Clone)]
pub struct RollClock {
    phase: RollPhase,
    elapsed_ms: f32,
    /// Latched once the finished signal has been delivered for this roll
    finished_fired: bool,
}

impl Default for RollClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RollClock {
    pub fn new() -> Self {
        Self {
            phase: RollPhase::Idle,
            elapsed_ms: 0.0,
            // Nothing is owed before the first trigger
            finished_fired: true,
        }
    }

    /// Start a new roll. Any undelivered finish from a previous roll is
    /// voided; the new roll owes its own.
    pub fn trigger(&mut self) {
        self.phase = RollPhase::Pending;
        self.elapsed_ms = 0.0;
        self.finished_fired = false;
    }

    /// Advance by a frame delta. Returns true exactly once per roll, on the
    /// tick that crosses the end of the schedule. Oversized deltas (tab
    /// resumed after a long pause) settle in a single call.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if !self.is_rolling() {
            return false;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= consts::ROLL_TOTAL_MS {
            return self.settle();
        }
        if self.elapsed_ms >= consts::ROLL_START_DELAY_MS {
            self.phase = RollPhase::Active;
        }
        false
    }

    /// Cut the roll short, e.g. when the page is backgrounded. Returns true
    /// if this delivered the roll's finish.
    pub fn force_settle(&mut self) -> bool {
        if self.is_rolling() { self.settle() } else { false }
    }

    fn settle(&mut self) -> bool {
        self.phase = RollPhase::Settled;
        let owed = !self.finished_fired;
        self.finished_fired = true;
        owed
    }

    #[inline]
    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    /// True while a triggered roll has not yet settled
    #[inline]
    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, RollPhase::Pending | RollPhase::Active)
    }

    /// Eased progress through the spin window, 0 outside it
    pub fn spin_progress(&self) -> f32 {
        if self.phase != RollPhase::Active {
            return 0.0;
        }
        let t = (self.elapsed_ms - consts::ROLL_START_DELAY_MS) / consts::ROLL_DURATION_MS;
        roll_ease(t.clamp(0.0, 1.0))
    }

    /// Orientation for a die with the given rest pose. Holds rest before the
    /// spin starts, whirls through full turns while active, and snaps back to
    /// the exact rest pose once settled.
    pub fn rotation(&self, rest: Vec3) -> Vec3 {
        if self.phase != RollPhase::Active {
            return rest;
        }
        let turns = consts::FULL_ROTATIONS * (self.spin_progress() + 1.0);
        rest + Vec3::new(turns * TAU, turns * PI, turns * PI)
    }
}

/// Values a `Transition` knows how to blend
pub trait Interpolate: Copy + PartialEq {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        ease::lerp(a, b, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// Eased glide toward a target that can be redirected mid-flight
#[derive(Debug, Clone)]
pub struct Transition<T: Interpolate> {
    start: T,
    target: T,
    elapsed_ms: f32,
}

impl<T: Interpolate> Transition<T> {
    /// Already at the value, nothing animating
    pub fn settled(value: T) -> Self {
        Self {
            start: value,
            target: value,
            elapsed_ms: consts::REFLOW_MS,
        }
    }

    /// Start gliding from `from` toward `to`
    pub fn running(from: T, to: T) -> Self {
        Self {
            start: from,
            target: to,
            elapsed_ms: 0.0,
        }
    }

    /// Redirect toward a new target. The glide restarts from the currently
    /// rendered value, so a die never jumps when the grid changes under it.
    pub fn retarget(&mut self, to: T) {
        if self.target == to {
            return;
        }
        self.start = self.value();
        self.target = to;
        self.elapsed_ms = 0.0;
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(consts::REFLOW_MS);
    }

    /// Current blended value
    pub fn value(&self) -> T {
        if self.is_settled() {
            return self.target;
        }
        let t = ease_out_cubic(self.elapsed_ms / consts::REFLOW_MS);
        T::interpolate(self.start, self.target, t)
    }

    #[inline]
    pub fn target(&self) -> T {
        self.target
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.elapsed_ms >= consts::REFLOW_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::tray::FaceCount;

    #[test]
    fn test_phase_schedule() {
        let mut clock = RollClock::new();
        assert_eq!(clock.phase(), RollPhase::Idle);

        clock.trigger();
        assert_eq!(clock.phase(), RollPhase::Pending);

        // Still pending one tick before the start delay elapses
        assert!(!clock.advance(179.0));
        assert_eq!(clock.phase(), RollPhase::Pending);

        assert!(!clock.advance(1.0));
        assert_eq!(clock.phase(), RollPhase::Active);

        // Last active tick of the schedule
        assert!(!clock.advance(3529.0));
        assert_eq!(clock.phase(), RollPhase::Active);

        assert!(clock.advance(1.0));
        assert_eq!(clock.phase(), RollPhase::Settled);
    }

    #[test]
    fn test_finished_fires_exactly_once() {
        let mut clock = RollClock::new();
        clock.trigger();
        assert!(clock.advance(10_000.0));
        assert!(!clock.advance(16.0));
        assert!(!clock.advance(10_000.0));
        assert!(!clock.force_settle());
    }

    #[test]
    fn test_huge_delta_settles_in_one_tick() {
        let mut clock = RollClock::new();
        clock.trigger();
        // A minute-long gap, e.g. a throttled background tab
        assert!(clock.advance(60_000.0));
        assert_eq!(clock.phase(), RollPhase::Settled);
    }

    #[test]
    fn test_force_settle_delivers_owed_finish() {
        let mut clock = RollClock::new();
        assert!(!clock.force_settle());

        clock.trigger();
        clock.advance(500.0);
        assert!(clock.force_settle());
        assert_eq!(clock.phase(), RollPhase::Settled);
        assert!(!clock.force_settle());
    }

    #[test]
    fn test_retrigger_owes_a_fresh_finish() {
        let mut clock = RollClock::new();
        clock.trigger();
        assert!(clock.advance(5_000.0));

        clock.trigger();
        assert_eq!(clock.phase(), RollPhase::Pending);
        assert!(clock.advance(5_000.0));
    }

    #[test]
    fn test_spin_progress_outside_active_window() {
        let mut clock = RollClock::new();
        assert_eq!(clock.spin_progress(), 0.0);
        clock.trigger();
        clock.advance(100.0);
        assert_eq!(clock.phase(), RollPhase::Pending);
        assert_eq!(clock.spin_progress(), 0.0);
        clock.advance(10_000.0);
        assert_eq!(clock.spin_progress(), 0.0);
    }

    #[test]
    fn test_rotation_holds_rest_then_snaps_back() {
        let rest = FaceCount::D10.rest_rotation();
        let mut clock = RollClock::new();
        assert_eq!(clock.rotation(rest), rest);

        clock.trigger();
        clock.advance(100.0);
        assert_eq!(clock.rotation(rest), rest);

        clock.advance(1_000.0);
        assert_eq!(clock.phase(), RollPhase::Active);
        let spinning = clock.rotation(rest);
        assert!((spinning - rest).length() > PI);

        clock.advance(10_000.0);
        assert_eq!(clock.rotation(rest), rest);
    }

    #[test]
    fn test_transition_reaches_target() {
        let mut t = Transition::running(0.0_f32, 10.0);
        assert_eq!(t.value(), 0.0);
        t.advance(consts::REFLOW_MS);
        assert!(t.is_settled());
        assert_eq!(t.value(), 10.0);
    }

    #[test]
    fn test_transition_midpoint_eases_out() {
        let mut t = Transition::running(0.0_f32, 10.0);
        t.advance(500.0);
        // ease_out_cubic(0.5) = 0.875, already most of the way there
        assert!((t.value() - 8.75).abs() < 0.001);
    }

    #[test]
    fn test_retarget_captures_rendered_value() {
        let mut t = Transition::running(Vec2::ZERO, Vec2::new(100.0, 0.0));
        t.advance(500.0);
        let mid = t.value();
        assert!((mid.x - 87.5).abs() < 0.001);

        t.retarget(Vec2::new(0.0, 50.0));
        // New glide starts exactly where the old one was rendered
        assert!((t.value() - mid).length() < 0.001);
        t.advance(consts::REFLOW_MS);
        assert_eq!(t.value(), Vec2::new(0.0, 50.0));
    }

    #[test]
    fn test_retarget_same_target_keeps_progress() {
        let mut t = Transition::running(0.0_f32, 10.0);
        t.advance(500.0);
        let before = t.value();
        t.retarget(10.0);
        assert_eq!(t.value(), before);
        t.advance(500.0);
        assert!(t.is_settled());
    }

    #[test]
    fn test_settled_constructor_is_done() {
        let t = Transition::settled(5.0_f32);
        assert!(t.is_settled());
        assert_eq!(t.value(), 5.0);
        assert_eq!(t.target(), 5.0);
    }
}
