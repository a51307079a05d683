use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

pub mod args;
pub mod components;
pub mod config;
pub mod resources;
pub mod systems;

pub use args::Args;
pub use components::{
    CameraRig, Chassis, ChaseCam, FixedCam, FollowTarget, ImpulseCar, RaycastCar, WheelVisuals,
};
pub use config::{load_config, parse_config, Config, ScriptSegment, Variant};
pub use resources::{DriverInput, InputScript, PhysicsWorld, RunLimits, SimClock, SimTelemetry};

/// Everything that advances the simulation by one tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimSet;

/// Vehicle, physics world, camera and telemetry systems. Input providers
/// write [`DriverInput`] before [`SimSet`]; renderers read the components
/// after it.
pub struct VehicleSimPlugin {
    pub config: Config,
}

impl VehicleSimPlugin {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Plugin for VehicleSimPlugin {
    fn build(&self, app: &mut App) {
        let cfg = &self.config;
        app.insert_resource(cfg.clone())
            .insert_resource(SimClock::new(cfg.tick_dt()))
            .insert_resource(RunLimits {
                max_ticks: cfg.max_ticks,
                log_every_ticks: cfg.log_every_ticks,
            })
            .init_resource::<PhysicsWorld>()
            .init_resource::<DriverInput>()
            .init_resource::<SimTelemetry>()
            .add_systems(Startup, systems::spawn_vehicle)
            .add_systems(
                Update,
                (
                    systems::advance_script.run_if(resource_exists::<InputScript>),
                    (systems::drive_raycast_cars, systems::drive_impulse_cars),
                    systems::step_world,
                    (
                        systems::follow_chase_cams,
                        systems::follow_fixed_cams,
                        systems::update_wheel_visuals,
                    ),
                    systems::record_telemetry,
                    systems::enforce_run_limits,
                )
                    .chain()
                    .in_set(SimSet),
            )
            .add_systems(Last, systems::release_vehicles_on_exit);

        // No script means the driver input comes from elsewhere.
        if !cfg.script.is_empty() {
            app.insert_resource(InputScript::new(cfg.script.clone()));
        }
    }
}

/// Headless app ticking at `cfg.tick_hz`.
pub fn build_sim_app(cfg: Config) -> App {
    let wait = Duration::from_secs_f64(1.0 / f64::from(cfg.tick_hz.max(1)));
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(wait)))
        .add_plugins(VehicleSimPlugin::new(cfg));
    app
}
