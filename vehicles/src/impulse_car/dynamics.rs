use tracing::debug;

use crate::input::VehicleInputState;
use crate::math::{finite_or_zero, lerp, Vec3f, BODY_FWD};
use crate::physics::{BodyHandle, RigidBodyApi};
use crate::specs::{ImpulseCarSpec, SpecError};

use super::types::{ControlTargets, ImpulseStepDebug, SmoothedControlState};

/// Targets for this tick. Forward wins over backward and left over right
/// when both are held; the brake flag is not part of this car's controls.
pub fn control_targets(spec: &ImpulseCarSpec, input: VehicleInputState) -> ControlTargets {
    let force = if input.forward {
        spec.max_force
    } else if input.backward {
        -spec.max_force
    } else {
        0.0
    };

    let brake = if input.backward && !input.forward {
        spec.max_brake_force
    } else if !input.forward && !input.backward {
        spec.max_brake_force * spec.idle_brake_ratio
    } else {
        0.0
    };

    let steer = if input.left {
        spec.max_steer_value
    } else if input.right {
        -spec.max_steer_value
    } else {
        0.0
    };

    ControlTargets { force, brake, steer }
}

/// Blend the smoothed controls one tick toward `targets`. The factors are
/// not clamped: a factor of 1 snaps, above 1 overshoots.
pub fn smooth_controls(spec: &ImpulseCarSpec, state: &mut SmoothedControlState, targets: ControlTargets) {
    let f = spec.force_lerp_factor();
    let s = spec.steer_lerp_factor();
    state.engine_force = lerp(state.engine_force, targets.force, f);
    state.brake_force = lerp(state.brake_force, targets.brake, f);
    state.steer_value = lerp(state.steer_value, targets.steer, s);
}

/// Chassis pushed around by impulses: drive along its forward axis, brake
/// against its velocity, steer by yawing the whole body.
#[derive(Debug, Clone)]
pub struct ImpulseCar {
    spec: ImpulseCarSpec,
    chassis: BodyHandle,
    state: SmoothedControlState,
}

impl ImpulseCar {
    pub fn new(chassis: BodyHandle, spec: ImpulseCarSpec) -> Result<Self, SpecError> {
        spec.validate()?;
        if spec.force_smoothing_saturated() {
            debug!(
                factor = spec.force_lerp_factor(),
                "engine/brake smoothing factor >= 1; controls reach their target in one tick"
            );
        }
        Ok(Self {
            spec,
            chassis,
            state: SmoothedControlState::default(),
        })
    }

    pub fn spec(&self) -> &ImpulseCarSpec {
        &self.spec
    }

    pub fn chassis(&self) -> BodyHandle {
        self.chassis
    }

    pub fn state(&self) -> &SmoothedControlState {
        &self.state
    }

    /// One tick. Returns `None` and leaves all state untouched when the
    /// chassis is not in the world yet.
    pub fn update<P>(&mut self, physics: &mut P, input: VehicleInputState, dt: f32) -> Option<ImpulseStepDebug>
    where
        P: RigidBodyApi + ?Sized,
    {
        let rotation = physics.rotation(self.chassis)?;
        let spec = &self.spec;
        let body = self.chassis;
        let mut dbg = ImpulseStepDebug {
            dt,
            ..Default::default()
        };

        let targets = control_targets(spec, input);
        smooth_controls(spec, &mut self.state, targets);
        dbg.targets = targets;

        let forward = finite_or_zero(rotation * BODY_FWD);
        dbg.forward = forward;

        let engine = self.state.engine_force;
        if engine.abs() > spec.engine_threshold {
            let impulse = forward * engine;
            physics.apply_impulse(body, impulse, true);
            dbg.engine_impulse = impulse;
        }

        let brake = self.state.brake_force;
        if brake > spec.brake_threshold {
            let linvel = physics.linvel(body).unwrap_or(Vec3f::ZERO);
            let impulse = -linvel * brake * spec.brake_linear_gain;
            physics.apply_impulse(body, impulse, true);
            dbg.brake_impulse = impulse;

            let angvel = physics.angvel(body).unwrap_or(Vec3f::ZERO);
            let torque = -angvel * brake * spec.brake_angular_gain;
            physics.apply_torque_impulse(body, torque, true);
            dbg.brake_torque_impulse = torque;
        }

        let steer = self.state.steer_value;
        if steer.abs() > spec.steer_threshold {
            let torque = Vec3f::new(0.0, steer * spec.steer_torque_gain, 0.0);
            physics.apply_torque_impulse(body, torque, true);
            dbg.steer_torque_impulse = torque;
        }

        // Cosmetic spin from the velocity after this tick's impulses.
        let linvel = physics.linvel(body).unwrap_or(Vec3f::ZERO);
        let planar_speed = (linvel.x * linvel.x + linvel.z * linvel.z).sqrt();
        let rate = planar_speed / spec.wheel_radius;
        let rear_sign = if engine > 0.0 { 1.0 } else { -1.0 };
        for (i, rot) in self.state.wheel_rotations.iter_mut().enumerate() {
            let sign = if i >= 2 { rear_sign } else { 1.0 };
            *rot += rate * dt * sign;
        }
        dbg.planar_speed = planar_speed;
        dbg.wheel_rate = rate;
        dbg.smoothed = self.state;
        Some(dbg)
    }
}
