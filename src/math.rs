use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Car-local basis derived from yaw. Recomputed on every call, never cached.
///
/// `forward` is `(-sin yaw, 0, -cos yaw)`; the engine pushes along `-forward`,
/// so "forward speed" is `-velocity · forward`.
pub fn directions_from_yaw(yaw: f32) -> (Vec3, Vec3) {
    let (sin, cos) = yaw.sin_cos();
    let forward = Vec3::new(-sin, 0.0, -cos);
    let right = Vec3::new(-cos, 0.0, sin);
    (forward, right)
}

/// Wrap an angle into (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Interpolate along the shortest arc from `from` toward `to`.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + normalize_angle(to - from) * t
}
