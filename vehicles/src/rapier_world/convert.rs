//! glam <-> nalgebra at the rapier boundary.

use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::{Point, Real, Vector};

use crate::math::{Quatf, Vec3f};

#[inline]
pub(super) fn vector(v: Vec3f) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
pub(super) fn point(v: Vec3f) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
pub(super) fn vec3(v: &Vector<Real>) -> Vec3f {
    Vec3f::new(v.x, v.y, v.z)
}

pub(super) fn rotation(q: Quatf) -> UnitQuaternion<Real> {
    if !q.is_finite() || q.length_squared() == 0.0 {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub(super) fn quat(q: &UnitQuaternion<Real>) -> Quatf {
    // nalgebra stores [i, j, k, w].
    let c = q.coords;
    Quatf::from_xyzw(c.x, c.y, c.z, c.w)
}

pub(super) fn isometry(translation: Vec3f, rot: Quatf) -> Isometry3<Real> {
    Isometry3::from_parts(Translation3::from(vector(translation)), rotation(rot))
}
