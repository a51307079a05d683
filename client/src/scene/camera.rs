use bevy::prelude::*;
use sim::CameraRig;

/// The window's camera, placed from the sim's camera rig every frame.
#[derive(Component)]
pub struct GameCamera;

/// Copy the follow camera's placement onto the render camera.
pub fn sync_game_camera(
    rigs: Query<&CameraRig>,
    mut q_cam: Query<&mut Transform, With<GameCamera>>,
) {
    let Some(rig) = rigs.iter().next() else {
        return;
    };
    let Ok(mut cam_t) = q_cam.single_mut() else {
        return;
    };
    // The rig stays zeroed until the first tick with a readable chassis.
    if rig.position == rig.target {
        return;
    }
    cam_t.translation = rig.position;
    cam_t.rotation = rig.rotation();
}
