use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::math::primitives::Plane3d;
use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;
use sim::{
    systems::{CHASE_CAMERA_START, FIXED_CAMERA_START},
    Config, Variant,
};

use super::camera::GameCamera;

/// Camera lens per variant: the raycast racer is a few centimetres long.
fn projection_for(variant: Variant) -> PerspectiveProjection {
    match variant {
        Variant::Raycast => PerspectiveProjection {
            fov: 55f32.to_radians(),
            near: 0.002,
            far: 100.0,
            ..Default::default()
        },
        Variant::Impulse => PerspectiveProjection {
            fov: 50f32.to_radians(),
            ..Default::default()
        },
    }
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<Config>,
) {
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..Default::default()
        },
        Transform::from_xyz(8.0, 12.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        GlobalTransform::default(),
        Name::new("Sun Light"),
    ));

    let ground = meshes.add(Plane3d::default().mesh().size(400.0, 400.0));
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.32, 0.3),
        perceptual_roughness: 0.95,
        ..Default::default()
    });
    commands.spawn((
        Mesh3d(ground),
        MeshMaterial3d(ground_material),
        Transform::default(),
        GlobalTransform::default(),
        Name::new("Ground"),
    ));

    let start = match cfg.variant {
        Variant::Raycast => CHASE_CAMERA_START,
        Variant::Impulse => FIXED_CAMERA_START,
    };
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(projection_for(cfg.variant)),
        Tonemapping::TonyMcMapface,
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
        GlobalTransform::default(),
        GameCamera,
        Name::new("Follow Camera"),
    ));
}
