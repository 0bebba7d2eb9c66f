use crate::objects::Body;

/// Moves the body along the axis at constant `velocity` for `dt` seconds (explicit Euler).
/// Bodies carry no forces between collisions, so this is exact.
pub fn integrate(body: &mut Body, velocity: f64, dt: f64) {
    // Update position (x = x + v*dt)
    body.position += velocity * dt;
}

/// Bounds a frame's elapsed wall time to `[0, max_dt]`.
///
/// Long gaps (a backgrounded tab, a debugger pause) would otherwise let the
/// bodies jump through each other in one step. NaN and negative elapsed times
/// become zero so positions never run backwards.
pub fn clamp_frame_dt(elapsed_seconds: f64, max_dt: f64) -> f64 {
    if elapsed_seconds.is_nan() || elapsed_seconds <= 0.0 {
        return 0.0;
    }
    elapsed_seconds.min(max_dt)
}
