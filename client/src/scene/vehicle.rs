use bevy::math::primitives::{Cuboid, Cylinder};
use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use sim::{Chassis, Config, ImpulseCar, PhysicsWorld, RaycastCar, Variant, WheelVisuals};
use tracing::{debug, info, warn};
use vehicles::{select_wheel_nodes, RigidBodyApi, Vec3f, WheelNode, WheelSelection};

use crate::args::Args;

/// A wheel mesh drawn at one slot (FL, FR, RL, RR) of a vehicle's
/// [`WheelVisuals`].
#[derive(Component, Debug, Clone, Copy)]
pub struct WheelMesh {
    pub vehicle: Entity,
    pub slot: usize,
}

/// Scene instance of a vehicle's glTF model.
#[derive(Component, Debug, Clone, Copy)]
pub struct VehicleModel {
    pub vehicle: Entity,
}

struct VehicleShape {
    half_extents: Vec3f,
    wheel_radius: f32,
    wheel_width: f32,
    hubs: [Vec3f; 4],
}

impl VehicleShape {
    fn from_config(cfg: &Config) -> Self {
        match cfg.variant {
            Variant::Raycast => {
                let spec = &cfg.raycast;
                let p = spec.placement;
                Self {
                    half_extents: spec.chassis.half_extents,
                    wheel_radius: p.wheel_radius,
                    wheel_width: p.wheel_radius * 0.8,
                    hubs: p.positions,
                }
            }
            Variant::Impulse => {
                let spec = &cfg.impulse;
                Self {
                    half_extents: spec.chassis.half_extents,
                    wheel_radius: spec.wheel_radius,
                    wheel_width: spec.wheel_radius * 0.6,
                    hubs: spec.wheel_positions,
                }
            }
        }
    }
}

/// Give newly spawned vehicles their visuals: the configured glTF model,
/// or a box body with four cylinder wheels.
#[allow(clippy::type_complexity)]
pub fn attach_vehicle_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    assets: Res<AssetServer>,
    cfg: Res<Config>,
    args: Res<Args>,
    q_new: Query<Entity, (With<Chassis>, Or<(Added<RaycastCar>, Added<ImpulseCar>)>)>,
) {
    for entity in &q_new {
        commands
            .entity(entity)
            .insert((Transform::default(), Visibility::default()));

        if let Some(path) = &args.model {
            let scene = assets.load(GltfAssetLabel::Scene(0).from_asset(path.clone()));
            commands
                .spawn((
                    Name::new("vehicle model"),
                    SceneRoot(scene),
                    VehicleModel { vehicle: entity },
                    ChildOf(entity),
                ))
                .observe(pick_model_wheels);
            info!(?entity, model = %path, "Loading vehicle model");
            continue;
        }

        let shape = VehicleShape::from_config(&cfg);
        spawn_primitive_visuals(&mut commands, &mut meshes, &mut materials, entity, &shape);
    }
}

fn spawn_primitive_visuals(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    vehicle: Entity,
    shape: &VehicleShape,
) {
    let half = shape.half_extents;
    let body_mesh = meshes.add(Mesh::from(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0)));
    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.1, 0.1),
        perceptual_roughness: 0.4,
        metallic: 0.3,
        ..Default::default()
    });
    commands
        .entity(vehicle)
        .insert((Mesh3d(body_mesh), MeshMaterial3d(body_material)));

    // Cylinders stand along Y; lay them on their side along the axle.
    let wheel_mesh = meshes.add(
        Mesh::from(Cylinder::new(shape.wheel_radius, shape.wheel_width))
            .rotated_by(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
    );
    let wheel_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.08, 0.08),
        perceptual_roughness: 0.9,
        ..Default::default()
    });
    for (slot, hub) in shape.hubs.iter().enumerate() {
        commands.spawn((
            Name::new(format!("wheel {slot}")),
            Mesh3d(wheel_mesh.clone()),
            MeshMaterial3d(wheel_material.clone()),
            Transform::from_translation(*hub),
            WheelMesh { vehicle, slot },
        ));
    }
    debug!(?vehicle, "Primitive vehicle visuals attached");
}

/// Once the model's scene is spawned, find its wheel nodes and hand them to
/// [`sync_wheel_transforms`]. Chosen nodes are detached from the model so
/// their transforms are world transforms.
fn pick_model_wheels(
    trigger: Trigger<SceneInstanceReady>,
    mut commands: Commands,
    models: Query<&VehicleModel>,
    children: Query<&Children>,
    names: Query<&Name>,
    meshes: Query<(), With<Mesh3d>>,
) {
    let root = trigger.target();
    let Ok(model) = models.get(root) else {
        return;
    };

    let (entities, labels, selection) = model_wheels(root, &children, &names, &meshes);
    if selection.fallback {
        let picked: Vec<&str> = selection.nodes.iter().map(|i| labels[*i].as_str()).collect();
        warn!(vehicle = ?model.vehicle, ?picked, "Wheel meshes not found by name, using the first meshes");
    }
    for (slot, index) in selection.nodes.iter().enumerate() {
        commands
            .entity(entities[*index])
            .remove::<ChildOf>()
            .insert(WheelMesh {
                vehicle: model.vehicle,
                slot,
            });
    }
    debug!(vehicle = ?model.vehicle, wheels = selection.nodes.len(), "Model wheels picked");
}

/// Descendants of `root`, their names, and the ones chosen as wheels.
fn model_wheels(
    root: Entity,
    children: &Query<&Children>,
    names: &Query<&Name>,
    meshes: &Query<(), With<Mesh3d>>,
) -> (Vec<Entity>, Vec<String>, WheelSelection) {
    let entities: Vec<Entity> = children.iter_descendants(root).collect();
    let labels: Vec<String> = entities
        .iter()
        .map(|e| names.get(*e).map(|n| n.as_str().to_owned()).unwrap_or_default())
        .collect();
    // glTF nodes carry the name; their primitives are mesh children.
    let has_mesh = |e: Entity| {
        meshes.contains(e)
            || children.get(e).is_ok_and(|c| {
                let kids: &[Entity] = c;
                kids.iter().any(|child| meshes.contains(*child))
            })
    };
    let nodes: Vec<WheelNode<'_>> = entities
        .iter()
        .zip(&labels)
        .map(|(e, name)| WheelNode {
            name,
            is_mesh: has_mesh(*e),
        })
        .collect();
    let selection = select_wheel_nodes(&nodes);
    (entities, labels, selection)
}

pub fn sync_chassis_transforms(
    physics: Res<PhysicsWorld>,
    mut q: Query<(&Chassis, &mut Transform)>,
) {
    for (chassis, mut t) in &mut q {
        if let Some(pose) = physics.pose(chassis.0) {
            t.translation = pose.translation;
            t.rotation = pose.rotation;
        }
    }
}

pub fn sync_wheel_transforms(
    q_vehicles: Query<&WheelVisuals>,
    mut q_wheels: Query<(&WheelMesh, &mut Transform)>,
) {
    for (wheel, mut t) in &mut q_wheels {
        let Ok(visuals) = q_vehicles.get(wheel.vehicle) else {
            continue;
        };
        let w = visuals.0[wheel.slot];
        t.translation = w.translation;
        t.rotation = w.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn node(world: &mut World, parent: Entity, name: &str) -> Entity {
        let node = world.spawn((Name::new(name.to_owned()), ChildOf(parent))).id();
        world.spawn((Mesh3d(Handle::default()), ChildOf(node)));
        node
    }

    fn pick(world: &mut World, root: Entity) -> (Vec<Entity>, bool) {
        world
            .run_system_once(
                move |children: Query<&Children>, names: Query<&Name>, meshes: Query<(), With<Mesh3d>>| {
                    let (entities, _, sel) = model_wheels(root, &children, &names, &meshes);
                    (sel.nodes.iter().map(|i| entities[*i]).collect(), sel.fallback)
                },
            )
            .expect("system runs")
    }

    #[test]
    fn model_wheels_are_found_by_node_name() {
        let mut world = World::new();
        let root = world.spawn(Name::new("racer.glb")).id();
        node(&mut world, root, "Body");
        let rr = node(&mut world, root, "Wheel_RR");
        let fl = node(&mut world, root, "wheel_fl");
        let fr = node(&mut world, root, "Wheel_FR");
        let rl = node(&mut world, root, "wheel_rl");

        let (picked, fallback) = pick(&mut world, root);
        assert!(!fallback);
        assert_eq!(picked, vec![fl, fr, rl, rr]);
    }

    #[test]
    fn unnamed_model_falls_back_to_mesh_nodes() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let body = node(&mut world, root, "Body");
        let a = node(&mut world, root, "Cylinder.001");

        let (picked, fallback) = pick(&mut world, root);
        assert!(fallback);
        // Primitive children are meshes too; named nodes come first.
        assert_eq!(picked.first(), Some(&body));
        assert!(picked.contains(&a));
        assert!(picked.len() <= 4);
    }
}
