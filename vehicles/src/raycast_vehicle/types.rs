use crate::input::DriverAxes;

/// Per-wheel controller inputs for one tick, indexed FL, FR, RL, RR.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveCommand {
    pub axes: DriverAxes,
    /// Forward speed the command was computed against.
    pub speed: f32,
    /// Drive force before distribution (rear wheels receive it).
    pub engine_force: f32,
    /// Brake force applied to every wheel.
    pub braking_force: f32,
    /// Steer limit at `speed` (rad).
    pub steer_angle_range: f32,
    /// Angle applied to both front wheels (rad, positive = left).
    pub steer_angle: f32,
    pub wheel_engine_force: [f32; 4],
    pub wheel_brake: [f32; 4],
    pub wheel_steering: [f32; 4],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RaycastStepDebug {
    pub dt: f32,
    pub command: DriveCommand,
    /// Whether any control was active and the chassis was woken.
    pub woke_chassis: bool,
    /// Forward speed read back after the controller step.
    pub speed_after: f32,
}
