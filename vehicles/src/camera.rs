//! Follow cameras. Both are pure functions of a chassis pose snapshot and
//! their own filter state; the renderer owns nothing but the result.

use crate::math::{Mat3, Quatf, Vec3f, BODY_UP};
use crate::physics::BodyPose;
use crate::specs::{ChaseCameraSpec, FixedLerpCameraSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPose {
    pub position: Vec3f,
    /// Point the camera looks at.
    pub target: Vec3f,
}

impl CameraPose {
    /// Look-at rotation with +Y up; the camera looks down its local -Z.
    /// Identity when the target coincides with the position.
    pub fn rotation(&self) -> Quatf {
        let back = self.position - self.target;
        if back.length_squared() <= 1e-12 || !back.is_finite() {
            return Quatf::IDENTITY;
        }
        let back = back.normalize();
        let mut right = BODY_UP.cross(back);
        if right.length_squared() <= 1e-12 {
            // Looking straight up or down; any horizontal right axis works.
            right = Vec3f::X;
        }
        let right = right.normalize();
        let up = back.cross(right);
        Quatf::from_mat3(&Mat3::from_cols(right, up, back))
    }
}

/// Chase camera for the raycast vehicle: trails the chassis along its
/// heading and approaches the goal exponentially, independent of frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    pub spec: ChaseCameraSpec,
    pub position: Vec3f,
}

impl ChaseCamera {
    pub fn new(spec: ChaseCameraSpec, position: Vec3f) -> Self {
        Self { spec, position }
    }

    /// Where the camera wants to be for this pose.
    pub fn goal(&self, pose: BodyPose) -> Vec3f {
        pose.translation - pose.forward() * self.spec.back_offset
            + Vec3f::new(0.0, self.spec.height, 0.0)
    }

    /// Fraction of the remaining distance covered in `dt` seconds.
    pub fn blend(&self, dt: f32) -> f32 {
        if dt > 0.0 {
            1.0 - (-dt * self.spec.rate).exp()
        } else {
            0.0
        }
    }

    pub fn update(&mut self, pose: BodyPose, dt: f32) -> CameraPose {
        let goal = self.goal(pose);
        self.position = self.position.lerp(goal, self.blend(dt));
        CameraPose {
            position: self.position,
            target: pose.translation + Vec3f::new(0.0, self.spec.look_height, 0.0),
        }
    }
}

/// Camera for the impulse car: world-space offset, fixed blend per frame.
/// The blend does not use `dt`, so the follow speed depends on frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLerpCamera {
    pub spec: FixedLerpCameraSpec,
    pub position: Vec3f,
}

impl FixedLerpCamera {
    pub fn new(spec: FixedLerpCameraSpec, position: Vec3f) -> Self {
        Self { spec, position }
    }

    pub fn goal(&self, pose: BodyPose) -> Vec3f {
        pose.translation + self.spec.offset
    }

    pub fn update(&mut self, pose: BodyPose) -> CameraPose {
        let goal = self.goal(pose);
        self.position = self.position.lerp(goal, self.spec.factor);
        CameraPose {
            position: self.position,
            target: pose.translation,
        }
    }
}
