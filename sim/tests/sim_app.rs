use bevy::app::AppExit;
use bevy::prelude::*;
use sim::{
    build_sim_app, CameraRig, Chassis, Config, ImpulseCar, PhysicsWorld, RaycastCar,
    ScriptSegment, SimClock, SimTelemetry, Variant, WheelVisuals,
};
use vehicles::{RigidBodyApi, VehicleInputState};

fn run_until_exit(app: &mut App, cap: usize) -> Option<(usize, AppExit)> {
    for i in 0..cap {
        app.update();
        if let Some(exit) = app.should_exit() {
            return Some((i + 1, exit));
        }
    }
    None
}

fn scripted(variant: Variant, segments: &[(u64, u8)]) -> Config {
    Config {
        variant,
        log_every_ticks: 0,
        script: segments
            .iter()
            .map(|&(ticks, bits)| ScriptSegment::new(ticks, VehicleInputState::from_bits(bits)))
            .collect(),
        ..Config::default()
    }
}

fn vehicle_entity<T: Component>(app: &mut App) -> Entity {
    let world = app.world_mut();
    let mut q = world.query_filtered::<Entity, With<T>>();
    q.iter(world).next().expect("vehicle spawned")
}

#[test]
fn script_end_exits_successfully() {
    let mut app = build_sim_app(scripted(Variant::Raycast, &[(20, 0b00001), (10, 0b10000)]));
    let (updates, exit) = run_until_exit(&mut app, 100).expect("script should end the run");
    assert_eq!(exit, AppExit::Success);
    assert_eq!(updates, 31, "exit is requested on the tick after the last segment");
    assert_eq!(app.world().resource::<SimClock>().tick, 31);
}

#[test]
fn clean_exit_releases_every_vehicle() {
    for variant in [Variant::Raycast, Variant::Impulse] {
        let mut app = build_sim_app(scripted(variant, &[(10, 0b00001)]));
        let (_, exit) = run_until_exit(&mut app, 100).expect("script should end the run");
        assert_eq!(exit, AppExit::Success);

        let physics = app.world().resource::<PhysicsWorld>();
        assert_eq!(physics.controller_count(), 0, "{variant:?} controller outlived the run");
        assert_eq!(physics.body_count(), 0, "{variant:?} body outlived the run");
        let world = app.world_mut();
        assert_eq!(world.query::<&Chassis>().iter(world).count(), 0);
        assert_eq!(world.query::<&RaycastCar>().iter(world).count(), 0);
    }
}

#[test]
fn tick_limit_exit_also_releases_the_controller() {
    let cfg = Config {
        max_ticks: Some(8),
        log_every_ticks: 0,
        ..Config::default()
    };
    let mut app = build_sim_app(cfg);
    run_until_exit(&mut app, 100).expect("tick limit should end the run");
    assert_eq!(app.world().resource::<PhysicsWorld>().controller_count(), 0);
}

#[test]
fn max_ticks_stops_an_unscripted_run() {
    let cfg = Config {
        max_ticks: Some(12),
        log_every_ticks: 0,
        ..Config::default()
    };
    let mut app = build_sim_app(cfg);
    let (updates, exit) = run_until_exit(&mut app, 100).expect("tick limit should end the run");
    assert_eq!(exit, AppExit::Success);
    assert_eq!(updates, 12);
}

#[test]
fn raycast_script_moves_the_car_forward() {
    let mut app = build_sim_app(scripted(Variant::Raycast, &[(60, 0b00001)]));
    for _ in 0..60 {
        app.update();
    }
    let telemetry = app.world().resource::<SimTelemetry>().clone();
    assert!(telemetry.speed > 0.5, "speed {}", telemetry.speed);
    assert!(telemetry.position.z > 0.0);
    assert_eq!(telemetry.skipped_ticks, 0);
    let dbg = telemetry.raycast.expect("raycast telemetry");
    assert_eq!(dbg.command.engine_force, 2200.0);
    assert!(telemetry.impulse.is_none());

    let car = vehicle_entity::<RaycastCar>(&mut app);
    let wheels = app.world().get::<WheelVisuals>(car).unwrap();
    // Rear hubs trail the front ones along +Z.
    assert!(wheels.0[0].translation.z > wheels.0[2].translation.z);
}

#[test]
fn impulse_script_moves_the_car_and_its_camera() {
    let mut app = build_sim_app(scripted(Variant::Impulse, &[(90, 0b00001)]));
    for _ in 0..90 {
        app.update();
    }
    let telemetry = app.world().resource::<SimTelemetry>().clone();
    assert!(telemetry.speed > 1.0, "speed {}", telemetry.speed);
    assert!(telemetry.impulse.is_some());
    assert!(telemetry.raycast.is_none());

    let world = app.world_mut();
    let mut rigs = world.query::<&CameraRig>();
    let rig = rigs.iter(world).next().expect("camera spawned").0;
    assert!((rig.target - telemetry.position).length() < 1e-5);
    assert!(rig.position.y > telemetry.position.y);
}

#[test]
fn despawning_a_raycast_car_releases_its_controller_and_body() {
    let mut app = build_sim_app(scripted(Variant::Raycast, &[(100, 0b00001)]));
    for _ in 0..5 {
        app.update();
    }
    {
        let physics = app.world().resource::<PhysicsWorld>();
        assert_eq!(physics.controller_count(), 1);
        assert_eq!(physics.body_count(), 1);
    }

    let car = vehicle_entity::<RaycastCar>(&mut app);
    let chassis = app.world().get::<Chassis>(car).unwrap().0;
    assert!(app.world_mut().despawn(car));

    let physics = app.world().resource::<PhysicsWorld>();
    assert_eq!(physics.controller_count(), 0);
    assert_eq!(physics.body_count(), 0);
    assert!(physics.pose(chassis).is_none());

    // The remaining systems keep running without a vehicle.
    for _ in 0..5 {
        app.update();
    }
}

#[test]
fn removing_only_the_car_component_keeps_the_body() {
    let mut app = build_sim_app(scripted(Variant::Raycast, &[(100, 0b00001)]));
    app.update();
    let car = vehicle_entity::<RaycastCar>(&mut app);
    app.world_mut().entity_mut(car).remove::<RaycastCar>();

    let physics = app.world().resource::<PhysicsWorld>();
    assert_eq!(physics.controller_count(), 0);
    assert_eq!(physics.body_count(), 1);
    app.update();
}

#[test]
fn impulse_car_despawn_removes_body() {
    let mut app = build_sim_app(scripted(Variant::Impulse, &[(100, 0b00001)]));
    app.update();
    let car = vehicle_entity::<ImpulseCar>(&mut app);
    app.world_mut().despawn(car);
    assert_eq!(app.world().resource::<PhysicsWorld>().body_count(), 0);
    app.update();
    assert_eq!(app.world().resource::<SimTelemetry>().skipped_ticks, 0);
}
