use bevy::prelude::*;
use sim::SimSet;

pub mod camera;
pub mod setup;
pub mod vehicle;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup::setup_scene).add_systems(
            Update,
            (
                vehicle::attach_vehicle_meshes,
                (
                    vehicle::sync_chassis_transforms,
                    vehicle::sync_wheel_transforms,
                    camera::sync_game_camera,
                ),
            )
                .chain()
                .after(SimSet),
        );
    }
}
