//! Easing curves for the roll, reposition, and scale timers
//!
//! All functions map linear progress in [0, 1] to eased progress in [0, 1].

/// Fraction of the roll that runs at constant speed before braking
const BRAKE_POINT: f32 = 0.9;

/// Roll spin ease: linear through the first 90% of the roll, then a
/// quadratic ease-out blends the last 10% into the landing pose.
pub fn roll_ease(t: f32) -> f32 {
    if t < BRAKE_POINT {
        return t;
    }
    let remaining = (t - BRAKE_POINT) / (1.0 - BRAKE_POINT);
    let braked = 1.0 - (1.0 - remaining) * (1.0 - remaining);
    BRAKE_POINT + braked * (1.0 - BRAKE_POINT)
}

/// Ease-out cubic, used by the reposition and scale timers
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
