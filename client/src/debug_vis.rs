use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;
use bevy_inspector_egui::InspectorOptions;
use sim::{CameraRig, Chassis, Config, PhysicsWorld, SimSet, Variant, WheelVisuals};
use vehicles::RigidBodyApi;

#[derive(Resource, Debug, Clone, Reflect, InspectorOptions)]
#[reflect(Resource)]
pub struct DebugVis {
    pub wireframe_global: bool,
    pub heading_arrow: bool,
    /// Axle and spin markers at each wheel hub.
    pub wheel_markers: bool,
    pub camera_target: bool,
}

impl Default for DebugVis {
    fn default() -> Self {
        Self {
            wireframe_global: false,
            heading_arrow: true,
            wheel_markers: true,
            camera_target: false,
        }
    }
}

pub struct DebugVisPlugin;

impl Plugin for DebugVisPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugVis>()
            .register_type::<DebugVis>()
            .add_plugins(WireframePlugin::default())
            .add_plugins(ResourceInspectorPlugin::<DebugVis>::default())
            .add_systems(Update, apply_wireframe_flag)
            .add_systems(Update, draw_vehicle_gizmos.after(SimSet));
    }
}

fn apply_wireframe_flag(vis: Res<DebugVis>, mut cfg: ResMut<WireframeConfig>) {
    if vis.is_changed() {
        cfg.global = vis.wireframe_global;
    }
}

/// Marker size follows the vehicle: the raycast racer is tiny.
fn marker_length(cfg: &Config) -> f32 {
    match cfg.variant {
        Variant::Raycast => cfg.raycast.chassis.half_extents.z,
        Variant::Impulse => cfg.impulse.chassis.half_extents.z,
    }
}

fn draw_vehicle_gizmos(
    mut gizmos: Gizmos,
    vis: Res<DebugVis>,
    cfg: Res<Config>,
    physics: Res<PhysicsWorld>,
    q_vehicles: Query<(&Chassis, &WheelVisuals)>,
    q_rigs: Query<&CameraRig>,
) {
    let len = marker_length(&cfg);
    for (chassis, wheels) in &q_vehicles {
        let Some(pose) = physics.pose(chassis.0) else {
            continue;
        };
        if vis.heading_arrow {
            let tip = pose.translation + pose.forward() * len * 2.0;
            gizmos.arrow(pose.translation, tip, Color::srgb(1.0, 0.9, 0.1));
        }
        if vis.wheel_markers {
            for w in wheels.0.iter() {
                let axle = w.rotation * Vec3::X * len * 0.3;
                let spoke = w.rotation * Vec3::Y * len * 0.25;
                gizmos.line(w.translation - axle, w.translation + axle, Color::srgb(0.2, 0.8, 1.0));
                gizmos.line(w.translation, w.translation + spoke, Color::srgb(1.0, 0.3, 0.3));
            }
        }
    }
    if vis.camera_target {
        for rig in &q_rigs {
            gizmos.line(rig.position, rig.target, Color::srgb(0.6, 0.6, 0.6));
        }
    }
}
