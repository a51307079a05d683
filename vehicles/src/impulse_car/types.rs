use crate::math::Vec3f;

/// Control values blended toward their per-tick targets. Owned by the car
/// and carried across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothedControlState {
    pub engine_force: f32,
    pub brake_force: f32,
    pub steer_value: f32,
    /// Accumulated spin angle per wheel (FL, FR, RL, RR), in radians. Only
    /// used to orient wheel meshes.
    pub wheel_rotations: [f32; 4],
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlTargets {
    pub force: f32,
    pub brake: f32,
    pub steer: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImpulseStepDebug {
    pub dt: f32,
    pub targets: ControlTargets,
    pub smoothed: SmoothedControlState,
    pub forward: Vec3f,
    // Impulses handed to the body this tick (zero when below threshold)
    pub engine_impulse: Vec3f,
    pub brake_impulse: Vec3f,
    pub brake_torque_impulse: Vec3f,
    pub steer_torque_impulse: Vec3f,
    /// Horizontal speed used for wheel spin.
    pub planar_speed: f32,
    pub wheel_rate: f32,
}
