use bevy::prelude::*;
use tracing::{debug, error, info, trace};
use vehicles::{
    wheel_visual_transforms, BodyDesc, ChaseCamera, FixedLerpCamera, RaycastStepDebug,
    RaycastVehicle, RigidBodyApi, Vec3f, VehicleControllerApi, VehicleInputState,
};

use crate::components::{
    CameraRig, Chassis, ChaseCam, FixedCam, FollowTarget, ImpulseCar, RaycastCar, WheelVisuals,
};
use crate::config::{Config, Variant};
use crate::resources::{DriverInput, InputScript, PhysicsWorld, RunLimits, SimClock, SimTelemetry};

/// Where the chase camera starts before it first catches up.
pub const CHASE_CAMERA_START: Vec3f = Vec3f::new(0.0, 0.35, 0.75);
pub const FIXED_CAMERA_START: Vec3f = Vec3f::new(0.0, 5.0, 10.0);

/// Spawn the configured vehicle and its follow camera.
pub fn spawn_vehicle(
    mut commands: Commands,
    mut physics: ResMut<PhysicsWorld>,
    cfg: Res<Config>,
    mut exit: EventWriter<AppExit>,
) {
    match cfg.variant {
        Variant::Raycast => {
            let spec = cfg.raycast.clone();
            let body = physics.add_body(BodyDesc::from_chassis(&spec.chassis));
            let vehicle = match RaycastVehicle::create(&mut physics.0, body, spec) {
                Ok(v) => v,
                Err(err) => {
                    error!(%err, "Failed to create raycast vehicle");
                    physics.remove_body(body);
                    exit.write(AppExit::error());
                    return;
                }
            };
            let car = commands
                .spawn((
                    Name::new("raycast vehicle"),
                    Chassis(body),
                    RaycastCar(vehicle),
                    WheelVisuals::default(),
                ))
                .id();
            commands.spawn((
                Name::new("chase camera"),
                ChaseCam(ChaseCamera::new(cfg.chase_camera, CHASE_CAMERA_START)),
                CameraRig::default(),
                FollowTarget(car),
            ));
            info!(?car, ?body, "Spawned raycast vehicle");
        }
        Variant::Impulse => {
            let spec = cfg.impulse.clone();
            // The collider hugs the wheels so the car rolls on them. Spawn
            // resting on the road.
            let mut desc = BodyDesc::from_chassis(&spec.chassis)
                .enclosing_wheels(&spec.wheel_positions, spec.wheel_radius);
            desc.translation.y = physics.ground_height() + spec.ride_height();
            let body = physics.add_body(desc);
            let car = match vehicles::ImpulseCar::new(body, spec) {
                Ok(c) => c,
                Err(err) => {
                    error!(%err, "Failed to create impulse car");
                    physics.remove_body(body);
                    exit.write(AppExit::error());
                    return;
                }
            };
            let car = commands
                .spawn((
                    Name::new("impulse car"),
                    Chassis(body),
                    ImpulseCar(car),
                    WheelVisuals::default(),
                ))
                .id();
            commands.spawn((
                Name::new("fixed camera"),
                FixedCam(FixedLerpCamera::new(cfg.fixed_camera, FIXED_CAMERA_START)),
                CameraRig::default(),
                FollowTarget(car),
            ));
            info!(?car, ?body, "Spawned impulse car");
        }
    }
}

pub fn advance_script(
    mut script: ResMut<InputScript>,
    mut input: ResMut<DriverInput>,
    clock: Res<SimClock>,
    mut exit: EventWriter<AppExit>,
    mut reported: Local<bool>,
) {
    match script.next_input() {
        Some(next) => input.0 = next,
        None => {
            input.0 = VehicleInputState::IDLE;
            if !*reported {
                *reported = true;
                info!(tick = clock.tick, "Input script finished");
            }
            exit.write(AppExit::Success);
        }
    }
}

pub fn drive_raycast_cars(
    mut physics: ResMut<PhysicsWorld>,
    input: Res<DriverInput>,
    clock: Res<SimClock>,
    mut telemetry: ResMut<SimTelemetry>,
    mut cars: Query<&mut RaycastCar>,
) {
    for mut car in &mut cars {
        let mut dbg = RaycastStepDebug::default();
        if car
            .0
            .update_dbg(&mut physics.0, input.0, clock.dt, Some(&mut dbg))
            .is_some()
        {
            telemetry.raycast = Some(dbg);
        } else {
            telemetry.skipped_ticks += 1;
            trace!(chassis = ?car.0.chassis(), "Raycast vehicle tick skipped");
        }
    }
}

pub fn drive_impulse_cars(
    mut physics: ResMut<PhysicsWorld>,
    input: Res<DriverInput>,
    clock: Res<SimClock>,
    mut telemetry: ResMut<SimTelemetry>,
    mut cars: Query<&mut ImpulseCar>,
) {
    for mut car in &mut cars {
        match car.update(&mut physics.0, input.0, clock.dt) {
            Some(dbg) => telemetry.impulse = Some(dbg),
            None => {
                telemetry.skipped_ticks += 1;
                trace!(chassis = ?car.chassis(), "Impulse car tick skipped");
            }
        }
    }
}

pub fn step_world(mut physics: ResMut<PhysicsWorld>, mut clock: ResMut<SimClock>) {
    physics.step(clock.dt);
    clock.tick += 1;
}

pub fn follow_chase_cams(
    physics: Res<PhysicsWorld>,
    clock: Res<SimClock>,
    targets: Query<&Chassis>,
    mut cams: Query<(&mut ChaseCam, &mut CameraRig, &FollowTarget)>,
) {
    for (mut cam, mut rig, target) in &mut cams {
        let Some(pose) = targets.get(target.0).ok().and_then(|c| physics.pose(c.0)) else {
            continue;
        };
        rig.0 = cam.update(pose, clock.dt);
    }
}

/// Fixed-offset cameras blend by a constant factor per tick, whatever `dt` is.
pub fn follow_fixed_cams(
    physics: Res<PhysicsWorld>,
    targets: Query<&Chassis>,
    mut cams: Query<(&mut FixedCam, &mut CameraRig, &FollowTarget)>,
) {
    for (mut cam, mut rig, target) in &mut cams {
        let Some(pose) = targets.get(target.0).ok().and_then(|c| physics.pose(c.0)) else {
            continue;
        };
        rig.0 = cam.update(pose);
    }
}

pub fn update_wheel_visuals(
    physics: Res<PhysicsWorld>,
    mut raycast: Query<(&RaycastCar, &mut WheelVisuals)>,
    mut impulse: Query<(&ImpulseCar, &mut WheelVisuals), Without<RaycastCar>>,
) {
    for (car, mut visuals) in &mut raycast {
        if let Some(wheels) = car.0.wheel_transforms(&physics.0) {
            visuals.0 = wheels;
        }
    }
    for (car, mut visuals) in &mut impulse {
        if let Some(pose) = physics.pose(car.chassis()) {
            visuals.0 = wheel_visual_transforms(pose, car.spec(), car.state());
        }
    }
}

pub fn record_telemetry(
    physics: Res<PhysicsWorld>,
    clock: Res<SimClock>,
    limits: Res<RunLimits>,
    mut telemetry: ResMut<SimTelemetry>,
    cars: Query<(&Chassis, Option<&RaycastCar>)>,
) {
    telemetry.tick = clock.tick;
    let Some((chassis, raycast)) = cars.iter().next() else {
        return;
    };
    let Some(pose) = physics.pose(chassis.0) else {
        return;
    };
    let controller = raycast.and_then(|car| car.0.controller());
    telemetry.position = pose.translation;
    telemetry.speed = match controller {
        Some(c) => physics.current_vehicle_speed(c).unwrap_or(0.0),
        None => physics
            .linvel(chassis.0)
            .map(|v| Vec3f::new(v.x, 0.0, v.z).length())
            .unwrap_or(0.0),
    };

    if limits.log_every_ticks > 0 && clock.tick % limits.log_every_ticks == 0 {
        let heading = pose.forward();
        info!(
            tick = clock.tick,
            speed = telemetry.speed,
            x = pose.translation.x,
            z = pose.translation.z,
            heading = heading.x.atan2(heading.z),
            skipped = telemetry.skipped_ticks,
            "Vehicle telemetry"
        );
    }
}

pub fn enforce_run_limits(
    clock: Res<SimClock>,
    limits: Res<RunLimits>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(max) = limits.max_ticks else {
        return;
    };
    if clock.tick >= max {
        debug!(tick = clock.tick, max, "Tick limit reached");
        exit.write(AppExit::Success);
    }
}

/// Despawn every vehicle once an exit is requested, so the removal hooks
/// release controllers and bodies before the world is dropped.
pub fn release_vehicles_on_exit(
    mut commands: Commands,
    mut exits: EventReader<AppExit>,
    cars: Query<Entity, With<Chassis>>,
) {
    let Some(exit) = exits.read().last() else {
        return;
    };
    for car in &cars {
        commands.entity(car).despawn();
    }
    debug!(?exit, cars = cars.iter().len(), "Vehicles released for exit");
}
