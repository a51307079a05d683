use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use sim::{Config, SimClock, SimSet, VehicleSimPlugin};

pub mod args;
#[cfg(feature = "windowing")]
pub mod debug_vis;
#[cfg(feature = "windowing")]
pub mod hud_controls;
pub mod input;
pub mod scene;

pub use args::Args;
#[cfg(feature = "windowing")]
use debug_vis::DebugVisPlugin;
#[cfg(feature = "windowing")]
use hud_controls::HudControlsPlugin;
use input::{InputSet, TouchPad};
use scene::ScenePlugin;

#[cfg(feature = "windowing")]
use bevy_egui::EguiPlugin;
#[cfg(feature = "windowing")]
use bevy_inspector_egui::quick::WorldInspectorPlugin;

#[derive(Clone, Copy)]
struct ClientAppConfig {
    include_rendering: bool,
    include_ui: bool,
    include_scene: bool,
}

impl ClientAppConfig {
    fn full(args: &Args) -> Self {
        Self {
            include_rendering: !args.headless,
            include_ui: !args.headless,
            include_scene: !args.headless,
        }
    }

    const MINIMAL: Self = Self {
        include_rendering: false,
        include_ui: false,
        include_scene: false,
    };
}

/// The window drives the vehicle interactively: the script and tick limit
/// of a sim config do not apply.
fn interactive_config(args: &Args, mut cfg: Config) -> Config {
    cfg.variant = args.variant;
    cfg.script.clear();
    cfg.max_ticks = None;
    cfg
}

pub fn build_client_app(args: Args, cfg: Config) -> App {
    let config = ClientAppConfig::full(&args);
    build_client_app_with_config(args, cfg, config)
}

pub fn build_minimal_client_app(args: Args, cfg: Config) -> App {
    build_client_app_with_config(args, cfg, ClientAppConfig::MINIMAL)
}

/// Advance the sim by the frame time instead of a fixed tick.
fn use_frame_delta(time: Res<Time>, mut clock: ResMut<SimClock>) {
    clock.dt = time.delta_secs();
}

fn build_client_app_with_config(args: Args, cfg: Config, config: ClientAppConfig) -> App {
    let mut app = App::new();

    if config.include_rendering {
        app.add_plugins(DefaultPlugins.set(AssetPlugin {
            file_path: "assets".into(),
            ..Default::default()
        }));
        #[cfg(feature = "windowing")]
        if config.include_ui {
            app.add_plugins(EguiPlugin::default());
            app.add_plugins(WorldInspectorPlugin::default());
            app.add_plugins(HudControlsPlugin);
            app.add_plugins(DebugVisPlugin);
        }
    } else {
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();
    }

    app.add_plugins(VehicleSimPlugin::new(interactive_config(&args, cfg)))
        .insert_resource(args)
        .init_resource::<TouchPad>()
        .configure_sets(Update, (InputSet, SimSet).chain())
        .add_systems(
            Update,
            (use_frame_delta, input::read_driver_input).in_set(InputSet),
        );

    if config.include_scene {
        app.add_plugins(ScenePlugin);
    }

    app
}
