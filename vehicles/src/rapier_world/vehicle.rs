use rapier3d::control::{DynamicRayCastVehicleController, Wheel};
use rapier3d::prelude::*;
use tracing::debug;

use crate::math::Vec3f;
use crate::physics::{BodyHandle, ControllerAxes, ControllerHandle, VehicleControllerApi, WheelDesc};
use crate::specs::WheelTuning;

use super::{convert, resolve, RapierWorld};

/// Read-only snapshot of one controller wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelState {
    pub chassis_connection: Vec3f,
    pub radius: f32,
    pub suspension_rest_length: f32,
    pub max_suspension_travel: f32,
    pub suspension_stiffness: f32,
    pub suspension_compression: f32,
    pub suspension_relaxation: f32,
    pub max_suspension_force: f32,
    pub friction_slip: f32,
    pub side_friction_stiffness: f32,
    pub engine_force: f32,
    pub brake: f32,
    pub steering: f32,
    /// Accumulated spin about the axle, radians.
    pub rotation: f32,
    pub in_contact: bool,
    pub suspension_length: f32,
    /// Force the spring pushed with on the last update, newtons.
    pub suspension_force: f32,
}

impl From<&Wheel> for WheelState {
    fn from(w: &Wheel) -> Self {
        let ray = w.raycast_info();
        Self {
            chassis_connection: convert::vec3(&w.chassis_connection_point_cs.coords),
            radius: w.radius,
            suspension_rest_length: w.suspension_rest_length,
            max_suspension_travel: w.max_suspension_travel,
            suspension_stiffness: w.suspension_stiffness,
            suspension_compression: w.damping_compression,
            suspension_relaxation: w.damping_relaxation,
            max_suspension_force: w.max_suspension_force,
            friction_slip: w.friction_slip,
            side_friction_stiffness: w.side_friction_stiffness,
            engine_force: w.engine_force,
            brake: w.brake,
            steering: w.steering,
            rotation: w.rotation,
            in_contact: ray.is_in_contact,
            suspension_length: ray.suspension_length,
            suspension_force: w.wheel_suspension_force,
        }
    }
}

pub(super) struct Controller {
    chassis: BodyHandle,
    inner: DynamicRayCastVehicleController,
}

fn axis(index: usize) -> Vec3f {
    match index {
        0 => Vec3f::X,
        1 => Vec3f::Y,
        _ => Vec3f::Z,
    }
}

impl RapierWorld {
    pub fn wheel_state(&self, controller: ControllerHandle, wheel: usize) -> Option<WheelState> {
        self.controller(controller)?.inner.wheels().get(wheel).map(WheelState::from)
    }

    fn controller(&self, handle: ControllerHandle) -> Option<&Controller> {
        self.controllers.get(handle.0 as usize)?.as_ref()
    }

    fn wheel_mut(&mut self, handle: ControllerHandle, wheel: usize) -> Option<&mut Wheel> {
        self.controllers
            .get_mut(handle.0 as usize)?
            .as_mut()?
            .inner
            .wheels_mut()
            .get_mut(wheel)
    }
}

impl VehicleControllerApi for RapierWorld {
    fn create_vehicle_controller(
        &mut self,
        chassis: BodyHandle,
        axes: ControllerAxes,
    ) -> Option<ControllerHandle> {
        let rb = resolve(&self.handles, chassis)?;
        self.bodies.get(rb)?;
        let mut inner = DynamicRayCastVehicleController::new(rb);
        inner.index_up_axis = axes.up;
        inner.index_forward_axis = axes.forward;

        let handle = ControllerHandle(self.controllers.len() as u32);
        self.controllers.push(Some(Controller { chassis, inner }));
        debug!(?handle, ?chassis, "vehicle controller created");
        Some(handle)
    }

    fn add_wheel(&mut self, controller: ControllerHandle, wheel: WheelDesc) {
        let Some(Some(c)) = self.controllers.get_mut(controller.0 as usize) else {
            return;
        };
        // Rapier rolls a wheel along `up x axle`. Orient the axle so that
        // direction is the controller's forward axis.
        let up = axis(c.inner.index_up_axis);
        let forward = axis(c.inner.index_forward_axis);
        let axle = if up.cross(wheel.axle).dot(forward) < 0.0 {
            -wheel.axle
        } else {
            wheel.axle
        };
        c.inner.add_wheel(
            convert::point(wheel.chassis_connection),
            convert::vector(wheel.suspension_direction),
            convert::vector(axle),
            wheel.suspension_rest_length,
            wheel.radius,
            &rapier3d::control::WheelTuning::default(),
        );
    }

    fn set_wheel_tuning(
        &mut self,
        controller: ControllerHandle,
        wheel: usize,
        tuning: &WheelTuning,
        rest_length: f32,
    ) {
        if let Some(w) = self.wheel_mut(controller, wheel) {
            w.suspension_stiffness = tuning.suspension_stiffness;
            w.damping_compression = tuning.suspension_compression;
            w.damping_relaxation = tuning.suspension_relaxation;
            w.max_suspension_force = tuning.max_suspension_force;
            w.friction_slip = tuning.friction_slip;
            w.side_friction_stiffness = tuning.side_friction_stiffness;
            w.max_suspension_travel = tuning.max_suspension_travel(rest_length);
        }
    }

    fn set_wheel_engine_force(&mut self, controller: ControllerHandle, wheel: usize, force: f32) {
        if let Some(w) = self.wheel_mut(controller, wheel) {
            w.engine_force = force;
        }
    }

    fn set_wheel_brake(&mut self, controller: ControllerHandle, wheel: usize, brake: f32) {
        if let Some(w) = self.wheel_mut(controller, wheel) {
            w.brake = brake;
        }
    }

    fn set_wheel_steering(&mut self, controller: ControllerHandle, wheel: usize, angle: f32) {
        if let Some(w) = self.wheel_mut(controller, wheel) {
            w.steering = angle;
        }
    }

    /// Cast the suspension rays and push the chassis. The chassis' own
    /// collider is excluded from the casts.
    fn update_vehicle(&mut self, controller: ControllerHandle, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let Some(Some(c)) = self.controllers.get_mut(controller.0 as usize) else {
            return;
        };
        let Some(rb) = resolve(&self.handles, c.chassis).filter(|h| self.bodies.get(*h).is_some()) else {
            return;
        };
        c.inner.update_vehicle(
            dt,
            &mut self.bodies,
            &self.colliders,
            &self.query_pipeline,
            QueryFilter::default().exclude_rigid_body(rb),
        );
    }

    // Evaluated on the chassis' current velocity so the value is fresh right
    // after a teleport or a step, not cached from the last update.
    fn current_vehicle_speed(&self, controller: ControllerHandle) -> Option<f32> {
        let c = self.controller(controller)?;
        let rb = self.bodies.get(resolve(&self.handles, c.chassis)?)?;
        let forward = rb.rotation() * Vector::ith(c.inner.index_forward_axis, 1.0);
        let linvel = rb.linvel();
        let speed = linvel.norm();
        Some(if forward.dot(linvel) < 0.0 { -speed } else { speed })
    }

    fn remove_vehicle_controller(&mut self, controller: ControllerHandle) -> bool {
        let removed = self
            .controllers
            .get_mut(controller.0 as usize)
            .and_then(Option::take)
            .is_some();
        if removed {
            debug!(?controller, "vehicle controller removed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RigidBodyApi;
    use crate::rapier_world::BodyDesc;
    use crate::specs::presets::compact_racer;

    const DT: f32 = 1.0 / 60.0;

    fn racer_world() -> (RapierWorld, BodyHandle, ControllerHandle) {
        let spec = compact_racer();
        let mut world = RapierWorld::new();
        let chassis = world.add_body(BodyDesc::from_chassis(&spec.chassis));
        let c = world
            .create_vehicle_controller(chassis, ControllerAxes::default())
            .unwrap();
        for (i, p) in spec.placement.positions.iter().enumerate() {
            world.add_wheel(
                c,
                WheelDesc {
                    chassis_connection: *p,
                    suspension_direction: Vec3f::NEG_Y,
                    axle: Vec3f::X,
                    suspension_rest_length: spec.placement.suspension_rest_length,
                    radius: spec.placement.wheel_radius,
                },
            );
            world.set_wheel_tuning(c, i, &spec.wheel_tuning, spec.placement.suspension_rest_length);
        }
        (world, chassis, c)
    }

    fn settle(world: &mut RapierWorld, c: ControllerHandle, ticks: usize) {
        for _ in 0..ticks {
            world.update_vehicle(c, DT);
            world.step(DT);
        }
    }

    #[test]
    fn controller_needs_a_live_chassis() {
        let (mut world, chassis, _) = racer_world();
        world.remove_body(chassis);
        assert!(world
            .create_vehicle_controller(chassis, ControllerAxes::default())
            .is_none());
    }

    #[test]
    fn rear_drive_accelerates_forward() {
        let (mut world, chassis, c) = racer_world();
        settle(&mut world, c, 30);
        for wheel in [2, 3] {
            world.set_wheel_engine_force(c, wheel, 2200.0);
        }
        settle(&mut world, c, 60);
        let v = world.linvel(chassis).unwrap();
        assert!(v.z > 0.5, "positive engine force should push +Z, got {v:?}");
        let speed = world.current_vehicle_speed(c).unwrap();
        assert!(speed > 0.5 && (speed - v.length()).abs() < 1e-4);
    }

    #[test]
    fn wheels_find_the_ground_and_push_back() {
        let (mut world, _, c) = racer_world();
        settle(&mut world, c, 60);
        for i in 0..4 {
            let w = world.wheel_state(c, i).unwrap();
            assert!(w.in_contact, "wheel {i} lost the ground");
            assert!(w.suspension_force > 0.0, "wheel {i} spring idle");
        }
    }

    #[test]
    fn brakes_stop_without_reversing() {
        let (mut world, chassis, c) = racer_world();
        settle(&mut world, c, 30);
        world.set_velocity(chassis, Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO);
        for wheel in 0..4 {
            world.set_wheel_brake(c, wheel, 1800.0);
        }
        settle(&mut world, c, 60);
        let v = world.linvel(chassis).unwrap();
        assert!(v.z.abs() < 0.05, "still rolling: {v:?}");
    }

    #[test]
    fn tuning_sets_travel_from_rest_length() {
        let (world, _, c) = racer_world();
        let w = world.wheel_state(c, 0).unwrap();
        assert!((w.max_suspension_travel - 0.0034 * 1.6).abs() < 1e-7);
        assert_eq!(w.suspension_stiffness, 38.0);
        assert_eq!(w.suspension_compression, 6.5);
        assert_eq!(w.suspension_relaxation, 8.5);
        assert_eq!(w.chassis_connection, compact_racer().placement.positions[0]);
    }

    #[test]
    fn speed_sign_follows_the_chassis_heading() {
        let (mut world, chassis, c) = racer_world();
        world.set_velocity(chassis, Vec3f::new(0.0, 0.0, -2.0), Vec3f::ZERO);
        assert!((world.current_vehicle_speed(c).unwrap() + 2.0).abs() < 1e-5);
        world.set_velocity(chassis, Vec3f::new(3.0, 0.0, 4.0), Vec3f::ZERO);
        assert!((world.current_vehicle_speed(c).unwrap() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn removing_twice_reports_false() {
        let (mut world, _, c) = racer_world();
        assert!(world.remove_vehicle_controller(c));
        assert!(!world.remove_vehicle_controller(c));
        assert_eq!(world.controller_count(), 0);
        assert!(world.wheel_state(c, 0).is_none());
    }

    #[test]
    fn stale_chassis_skips_the_update() {
        let (mut world, chassis, c) = racer_world();
        world.remove_body(chassis);
        world.update_vehicle(c, DT);
        assert!(world.current_vehicle_speed(c).is_none());
        assert_eq!(world.controller_count(), 1);
    }
}
