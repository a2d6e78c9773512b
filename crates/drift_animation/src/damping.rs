//! Interpolation and damping helpers
//!
//! Frame-step numeric primitives used by scroll settling and carousel snapping.

use drift_core::Vec2;

/// Linear interpolation with `t` clamped to `[0, 1]`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Component-wise [`lerp`]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let remaining = target - current;
    if remaining.abs() <= max_delta {
        target
    } else {
        current + remaining.signum() * max_delta
    }
}

/// Critically damped spring toward `target`
///
/// `smooth_time` is roughly the time to reach the target. `velocity` is read
/// and written back so consecutive frames continue the same motion. The
/// result never overshoots the target. A non-positive `dt` leaves the value
/// and velocity untouched.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    // Pade approximation of exp(-omega * dt)
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let requested_target = target;
    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Snap when the step crossed the target
    if (requested_target - current > 0.0) == (output > requested_target) {
        output = requested_target;
        *velocity = 0.0;
    }

    output
}
