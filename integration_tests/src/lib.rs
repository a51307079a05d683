#[cfg(test)]
mod integration {
    use std::time::Duration;

    use anyhow::Result;
    use bevy_app::{App, AppExit};
    use bevy_ecs::prelude::*;
    use bevy_input::keyboard::KeyCode;
    use bevy_input::ButtonInput;
    use bevy_time::TimeUpdateStrategy;
    use client::input::TouchPad;
    use client::{build_minimal_client_app, Args as ClientArgs};
    use sim::{
        build_sim_app, CameraRig, ChaseCam, Config, DriverInput, FixedCam, PhysicsWorld,
        RaycastCar, ScriptSegment, SimTelemetry, Variant,
    };
    use vehicles::{RigidBodyApi, VehicleInputState};

    const FORWARD: u8 = 0b00001;
    const BACKWARD: u8 = 0b00010;
    const LEFT: u8 = 0b00100;
    const BRAKE: u8 = 0b10000;
    const IDLE: u8 = 0;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn script(variant: Variant, segments: &[(u64, u8)]) -> Config {
        Config {
            variant,
            log_every_ticks: 0,
            script: segments
                .iter()
                .map(|&(ticks, bits)| {
                    ScriptSegment::new(ticks, VehicleInputState::from_bits(bits))
                })
                .collect(),
            ..Config::default()
        }
    }

    /// Run the app to completion, calling `on_tick` after every tick.
    fn run_script(app: &mut App, cap: usize, mut on_tick: impl FnMut(&mut App)) -> Result<usize> {
        for tick in 1..=cap {
            app.update();
            on_tick(app);
            if let Some(exit) = app.should_exit() {
                anyhow::ensure!(exit == AppExit::Success, "sim exited with {exit:?}");
                return Ok(tick);
            }
        }
        anyhow::bail!("script did not finish within {cap} ticks")
    }

    fn speed(app: &App) -> f32 {
        app.world().resource::<SimTelemetry>().speed
    }

    #[test]
    fn accelerate_then_brake_to_a_stop() -> Result<()> {
        init_tracing();
        let cfg = script(Variant::Raycast, &[(300, FORWARD), (300, BRAKE)]);
        let mut app = build_sim_app(cfg);

        let mut top = 0.0f32;
        let mut lowest = 0.0f32;
        let mut samples = Vec::new();
        run_script(&mut app, 1000, |app| {
            let v = speed(app);
            top = top.max(v);
            lowest = lowest.min(v);
            samples.push(v);
        })?;

        assert!(top > 1.0, "top speed {top:.3} too low after five seconds");
        assert!(lowest > -1e-2, "brakes pushed the car backwards: {lowest:.4}");
        let after_braking = samples[599];
        assert!(after_braking.abs() < 0.05, "still rolling at {after_braking:.4}");
        Ok(())
    }

    #[test]
    fn configured_speed_caps_hold() -> Result<()> {
        let mut cfg = script(Variant::Raycast, &[(240, FORWARD), (120, BRAKE), (360, BACKWARD)]);
        cfg.raycast.max_forward_speed = 3.0;
        cfg.raycast.max_reverse_speed = 2.0;
        let mut app = build_sim_app(cfg);

        let mut top = 0.0f32;
        let mut lowest = 0.0f32;
        run_script(&mut app, 1000, |app| {
            let v = speed(app);
            top = top.max(v);
            lowest = lowest.min(v);
        })?;

        // One tick of drive past the cap is the most the car can gain.
        assert!(top > 2.5 && top < 3.15, "forward cap: top {top:.3}");
        assert!(lowest < -1.5 && lowest > -2.1, "reverse cap: lowest {lowest:.3}");
        Ok(())
    }

    #[test]
    fn chase_camera_settles_behind_a_parked_car() -> Result<()> {
        let cfg = script(
            Variant::Raycast,
            &[(120, FORWARD | LEFT), (240, BRAKE), (300, IDLE)],
        );
        let mut app = build_sim_app(cfg);
        // The car is released on exit, so keep the last tick it was alive.
        let mut last = None;
        run_script(&mut app, 1000, |app| {
            let world = app.world_mut();
            let mut cams = world.query::<(&ChaseCam, &CameraRig)>();
            let Some((cam, rig)) = cams.iter(world).next().map(|(c, r)| (*c, *r)) else {
                return;
            };
            let mut cars = world.query::<&sim::Chassis>();
            let Some(chassis) = cars.iter(world).next().map(|c| c.0) else {
                return;
            };
            if let Some(pose) = world.resource::<PhysicsWorld>().pose(chassis) {
                last = Some((cam, rig, pose));
            }
        })?;
        let (cam, rig, pose) = last.expect("car was never observed");

        let goal = cam.goal(pose);
        assert!(
            (rig.position - goal).length() < 1e-3,
            "camera {:?} not at goal {:?}",
            rig.position,
            goal
        );
        let behind = (rig.position - pose.translation).dot(pose.forward());
        assert!(behind < 0.0, "camera is not behind the car");
        Ok(())
    }

    #[test]
    fn impulse_car_turns_left_and_fixed_camera_trails() -> Result<()> {
        let cfg = script(Variant::Impulse, &[(150, FORWARD | LEFT)]);
        let mut app = build_sim_app(cfg);
        run_script(&mut app, 400, |_| {})?;

        let telemetry = app.world().resource::<SimTelemetry>().clone();
        assert!(telemetry.position.x > 0.1, "no left drift: {:?}", telemetry.position);
        assert!(telemetry.position.z > 1.0);

        let world = app.world_mut();
        let mut q = world.query::<(&FixedCam, &CameraRig)>();
        let (cam, rig) = q.iter(world).next().expect("fixed camera");
        assert_eq!(rig.target, telemetry.position);
        assert!(rig.position.y > telemetry.position.y + 1.0);
        // A fixed 5% blend per tick cannot keep up with a moving car.
        let lag = (rig.position - cam.goal(pose_at(telemetry.position))).length();
        assert!(lag > 0.5, "camera lag {lag:.3}");
        Ok(())
    }

    fn pose_at(translation: vehicles::Vec3f) -> vehicles::BodyPose {
        vehicles::BodyPose::new(translation, vehicles::Quatf::IDENTITY)
    }

    #[test]
    fn despawning_mid_run_releases_the_controller() -> Result<()> {
        let cfg = script(Variant::Raycast, &[(60, FORWARD), (60, IDLE)]);
        let mut app = build_sim_app(cfg);
        let mut despawned = false;
        let ticks = run_script(&mut app, 500, |app| {
            if despawned || app.world().resource::<SimTelemetry>().tick < 30 {
                return;
            }
            let world = app.world_mut();
            let mut q = world.query_filtered::<Entity, With<RaycastCar>>();
            let car = q.iter(world).next().expect("car");
            assert!(world.despawn(car));
            despawned = true;
        })?;

        assert!(despawned);
        assert_eq!(ticks, 121);
        let physics = app.world().resource::<PhysicsWorld>();
        assert_eq!(physics.controller_count(), 0);
        assert_eq!(physics.body_count(), 0);
        Ok(())
    }

    fn minimal_client(variant: Variant) -> App {
        let args = ClientArgs {
            variant,
            config: None,
            headless: true,
            model: None,
        };
        let mut app = build_minimal_client_app(args, Config::default());
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            1.0 / 60.0,
        )));
        app
    }

    #[test]
    fn client_keyboard_drives_the_car() {
        let mut app = minimal_client(Variant::Raycast);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        for _ in 0..120 {
            app.update();
        }
        let input = *app.world().resource::<DriverInput>();
        assert!(input.forward && !input.brake);
        let v = speed(&app);
        assert!(v > 1.0, "keyboard throttle gave only {v:.3} m/s");
    }

    #[test]
    fn client_touch_reverse_also_brakes() {
        let mut app = minimal_client(Variant::Impulse);
        app.update();
        app.world_mut().resource_mut::<TouchPad>().0.backward = true;
        app.update();
        let input = *app.world().resource::<DriverInput>();
        assert!(input.backward && input.brake);
        assert!(!input.forward);
    }
}
