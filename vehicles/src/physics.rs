//! Boundary to the physics engine.
//!
//! The dynamics core never integrates bodies itself. It reads poses and
//! velocities, applies impulses, and drives the engine's raycast vehicle
//! controller through these traits. [`crate::RapierWorld`] implements them on
//! a `rapier3d` pipeline.

use serde::{Deserialize, Serialize};

use crate::math::{Quatf, Vec3f};
use crate::specs::WheelTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerHandle(pub u32);

/// Position and orientation of a body (body -> world).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub translation: Vec3f,
    pub rotation: Quatf,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self {
            translation: Vec3f::ZERO,
            rotation: Quatf::IDENTITY,
        }
    }
}

impl BodyPose {
    pub fn new(translation: Vec3f, rotation: Quatf) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Chassis forward (+Z in body space) in world space.
    pub fn forward(&self) -> Vec3f {
        self.rotation * crate::math::BODY_FWD
    }

    pub fn transform_point(&self, local: Vec3f) -> Vec3f {
        self.translation + self.rotation * local
    }
}

/// Body-space axis indices handed to the vehicle controller (0 = X, 1 = Y,
/// 2 = Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerAxes {
    pub up: usize,
    pub forward: usize,
}

impl Default for ControllerAxes {
    fn default() -> Self {
        Self { up: 1, forward: 2 }
    }
}

/// One wheel as attached to a vehicle controller, in chassis space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDesc {
    pub chassis_connection: Vec3f,
    pub suspension_direction: Vec3f,
    pub axle: Vec3f,
    pub suspension_rest_length: f32,
    pub radius: f32,
}

/// Rigid body access. Getters return `None` for unknown or removed handles.
pub trait RigidBodyApi {
    fn translation(&self, body: BodyHandle) -> Option<Vec3f>;
    fn rotation(&self, body: BodyHandle) -> Option<Quatf>;
    fn linvel(&self, body: BodyHandle) -> Option<Vec3f>;
    fn angvel(&self, body: BodyHandle) -> Option<Vec3f>;
    fn wake_up(&mut self, body: BodyHandle);
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3f, wake: bool);
    fn apply_torque_impulse(&mut self, body: BodyHandle, torque_impulse: Vec3f, wake: bool);

    fn pose(&self, body: BodyHandle) -> Option<BodyPose> {
        Some(BodyPose::new(self.translation(body)?, self.rotation(body)?))
    }
}

/// The engine's raycast vehicle controller, addressed by handle.
pub trait VehicleControllerApi: RigidBodyApi {
    fn create_vehicle_controller(&mut self, chassis: BodyHandle, axes: ControllerAxes)
        -> Option<ControllerHandle>;
    fn add_wheel(&mut self, controller: ControllerHandle, wheel: WheelDesc);
    /// Stiffness, compression, relaxation, max force, friction slip, side
    /// friction and max travel in one call.
    fn set_wheel_tuning(
        &mut self,
        controller: ControllerHandle,
        wheel: usize,
        tuning: &WheelTuning,
        rest_length: f32,
    );
    fn set_wheel_engine_force(&mut self, controller: ControllerHandle, wheel: usize, force: f32);
    fn set_wheel_brake(&mut self, controller: ControllerHandle, wheel: usize, brake: f32);
    fn set_wheel_steering(&mut self, controller: ControllerHandle, wheel: usize, angle: f32);
    fn update_vehicle(&mut self, controller: ControllerHandle, dt: f32);
    /// Signed forward speed of the chassis, positive when moving forward.
    fn current_vehicle_speed(&self, controller: ControllerHandle) -> Option<f32>;
    /// Returns false when the handle was already released.
    fn remove_vehicle_controller(&mut self, controller: ControllerHandle) -> bool;
}
