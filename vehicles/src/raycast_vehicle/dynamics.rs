use crate::input::VehicleInputState;
use crate::math::lerp;
use crate::specs::RaycastVehicleSpec;
use crate::{FRONT_WHEELS, REAR_WHEELS};

use super::types::DriveCommand;

/// Steering limit at the given forward speed: `max_steer_low_speed` at rest,
/// falling linearly to `max_steer_high_speed` at `steer_speed_falloff` and
/// held there above it. Symmetric in the sign of `speed`.
pub fn steer_angle_range(spec: &RaycastVehicleSpec, speed: f32) -> f32 {
    let t = if speed.is_finite() {
        (speed.abs() / spec.steer_speed_falloff).clamp(0.0, 1.0)
    } else {
        1.0
    };
    lerp(spec.max_steer_low_speed, spec.max_steer_high_speed, t)
}

/// Map an input snapshot and the current forward speed to wheel forces.
///
/// Rear-wheel drive; every wheel brakes; both front wheels steer by the same
/// angle. The top speed is capped by cutting drive force, not by limiting
/// velocity.
pub fn compute_drive_command(
    spec: &RaycastVehicleSpec,
    input: VehicleInputState,
    speed: f32,
) -> DriveCommand {
    let axes = input.axes();
    let throttle = axes.throttle;

    let mut engine_force = throttle * spec.max_engine_force;
    if throttle > 0.0 && speed > spec.max_forward_speed {
        engine_force = 0.0;
    }
    if throttle < 0.0 && speed < -spec.max_reverse_speed {
        engine_force = 0.0;
    }

    let natural = if throttle == 0.0 {
        spec.natural_brake_force
    } else {
        0.0
    };
    let braking_force = axes.brake * spec.max_brake_force + natural;

    let range = steer_angle_range(spec, speed);
    let steer_angle = range * axes.steer.clamp(-1.0, 1.0);

    let mut cmd = DriveCommand {
        axes,
        speed,
        engine_force,
        braking_force,
        steer_angle_range: range,
        steer_angle,
        wheel_brake: [braking_force; 4],
        ..Default::default()
    };
    for i in REAR_WHEELS {
        cmd.wheel_engine_force[i] = engine_force;
    }
    for i in FRONT_WHEELS {
        cmd.wheel_engine_force[i] = 0.0;
        cmd.wheel_steering[i] = steer_angle;
    }
    cmd
}
