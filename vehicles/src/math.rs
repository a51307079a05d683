// Physics math is Bevy's glam-backed types re-exported from bevy_math, so the
// client can hand poses straight to `Transform` without conversion.
pub use bevy_math::{Quat as Quatf, Vec3 as Vec3f};
pub(crate) use bevy_math::Mat3;

// Chassis-local basis: +Z forward, +Y up, +X along the axle. A positive yaw
// turns +Z toward +X, which is the driver's left.
pub(crate) const BODY_FWD: Vec3f = Vec3f::new(0.0, 0.0, 1.0);
pub(crate) const BODY_UP: Vec3f = Vec3f::new(0.0, 1.0, 0.0);
pub(crate) const BODY_AXLE: Vec3f = Vec3f::new(1.0, 0.0, 0.0);

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Zero out NaN/inf so a bad sample can never poison persistent state.
#[inline]
pub(crate) fn finite_or_zero(v: Vec3f) -> Vec3f {
    if v.is_finite() {
        v
    } else {
        Vec3f::ZERO
    }
}
