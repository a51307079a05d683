use thiserror::Error;
use tracing::{debug, warn};

use crate::impulse_car::{wheel_transform, WheelTransform};
use crate::input::VehicleInputState;
use crate::physics::{
    BodyHandle, BodyPose, ControllerAxes, ControllerHandle, VehicleControllerApi, WheelDesc,
};
use crate::math::{Vec3f, BODY_AXLE};
use crate::specs::{RaycastVehicleSpec, SpecError};

use super::dynamics::compute_drive_command;
use super::types::{DriveCommand, RaycastStepDebug};

#[derive(Debug, Error, PartialEq)]
pub enum VehicleError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("chassis body {0:?} is not present in the physics world")]
    MissingChassis(BodyHandle),
}

/// A chassis body with a raycast vehicle controller registered on it.
///
/// The controller handle is owned here and released by [`Self::destroy`].
/// Dropping a vehicle that still holds its controller leaks the engine-side
/// controller and is reported as a warning.
#[derive(Debug)]
pub struct RaycastVehicle {
    spec: RaycastVehicleSpec,
    chassis: BodyHandle,
    controller: Option<ControllerHandle>,
    last_command: DriveCommand,
}

impl RaycastVehicle {
    /// Register a controller on `chassis` (up = Y, forward = Z) and attach the
    /// four wheels from the spec's placement.
    pub fn create<P>(
        physics: &mut P,
        chassis: BodyHandle,
        spec: RaycastVehicleSpec,
    ) -> Result<Self, VehicleError>
    where
        P: VehicleControllerApi + ?Sized,
    {
        spec.validate()?;
        let controller = physics
            .create_vehicle_controller(chassis, ControllerAxes::default())
            .ok_or(VehicleError::MissingChassis(chassis))?;

        let placement = spec.placement;
        for (index, position) in placement.positions.iter().enumerate() {
            physics.add_wheel(
                controller,
                WheelDesc {
                    chassis_connection: *position,
                    suspension_direction: Vec3f::new(0.0, -1.0, 0.0),
                    axle: BODY_AXLE,
                    suspension_rest_length: placement.suspension_rest_length,
                    radius: placement.wheel_radius,
                },
            );
            physics.set_wheel_tuning(
                controller,
                index,
                &spec.wheel_tuning,
                placement.suspension_rest_length,
            );
        }
        debug!(?chassis, ?controller, "raycast vehicle created");

        Ok(Self {
            spec,
            chassis,
            controller: Some(controller),
            last_command: DriveCommand::default(),
        })
    }

    pub fn spec(&self) -> &RaycastVehicleSpec {
        &self.spec
    }

    pub fn chassis(&self) -> BodyHandle {
        self.chassis
    }

    pub fn controller(&self) -> Option<ControllerHandle> {
        self.controller
    }

    pub fn last_command(&self) -> &DriveCommand {
        &self.last_command
    }

    /// One tick. See [`Self::update_dbg`].
    pub fn update<P>(&mut self, physics: &mut P, input: VehicleInputState, dt: f32) -> Option<DriveCommand>
    where
        P: VehicleControllerApi + ?Sized,
    {
        self.update_dbg(physics, input, dt, None)
    }

    /// Map `input` to wheel forces, hand them to the controller and step it
    /// by `dt`. Returns `None` without touching the world when the
    /// controller was released or the chassis cannot be read yet.
    pub fn update_dbg<P>(
        &mut self,
        physics: &mut P,
        input: VehicleInputState,
        dt: f32,
        mut dbg: Option<&mut RaycastStepDebug>,
    ) -> Option<DriveCommand>
    where
        P: VehicleControllerApi + ?Sized,
    {
        let controller = self.controller?;
        physics.pose(self.chassis)?;

        // Resting bodies may be asleep and ignore controller forces.
        let woke = input.axes().any_active();
        if woke {
            physics.wake_up(self.chassis);
        }

        let speed = physics.current_vehicle_speed(controller)?;
        let cmd = compute_drive_command(&self.spec, input, speed);
        for wheel in 0..4 {
            physics.set_wheel_engine_force(controller, wheel, cmd.wheel_engine_force[wheel]);
            physics.set_wheel_brake(controller, wheel, cmd.wheel_brake[wheel]);
            physics.set_wheel_steering(controller, wheel, cmd.wheel_steering[wheel]);
        }
        physics.update_vehicle(controller, dt);
        self.last_command = cmd;

        if let Some(d) = dbg.as_mut() {
            d.dt = dt;
            d.command = cmd;
            d.woke_chassis = woke;
            d.speed_after = physics.current_vehicle_speed(controller).unwrap_or(speed);
        }
        Some(cmd)
    }

    pub fn chassis_pose<P>(&self, physics: &P) -> Option<BodyPose>
    where
        P: VehicleControllerApi + ?Sized,
    {
        physics.pose(self.chassis)
    }

    /// Hub transforms for rendering, steered by the last command. Raycast
    /// wheels are drawn without spin.
    pub fn wheel_transforms<P>(&self, physics: &P) -> Option<[WheelTransform; 4]>
    where
        P: VehicleControllerApi + ?Sized,
    {
        let pose = physics.pose(self.chassis)?;
        let positions = self.spec.placement.positions;
        Some(std::array::from_fn(|i| {
            wheel_transform(pose, positions[i], self.last_command.wheel_steering[i], 0.0)
        }))
    }

    /// Give up ownership of the controller handle without releasing it, for
    /// callers that release it through another path (e.g. an ECS hook).
    pub fn take_controller(&mut self) -> Option<ControllerHandle> {
        self.controller.take()
    }

    /// Remove the controller from the physics world. Only the first call has
    /// an effect; returns whether a controller was released.
    pub fn destroy<P>(&mut self, physics: &mut P) -> bool
    where
        P: VehicleControllerApi + ?Sized,
    {
        let Some(controller) = self.controller.take() else {
            return false;
        };
        let removed = physics.remove_vehicle_controller(controller);
        debug!(?controller, removed, "raycast vehicle destroyed");
        removed
    }
}

impl Drop for RaycastVehicle {
    fn drop(&mut self) {
        if let Some(controller) = self.controller {
            warn!(?controller, chassis = ?self.chassis, "raycast vehicle dropped without destroy; controller leaked");
        }
    }
}
