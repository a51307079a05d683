use bevy::ecs::component::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;
use tracing::debug;
use vehicles::{
    BodyHandle, CameraPose, ChaseCamera, FixedLerpCamera, RaycastVehicle, VehicleControllerApi,
    WheelTransform,
};

use crate::resources::PhysicsWorld;

/// Rigid body backing this entity. The body is removed from the physics
/// world together with the component.
#[derive(Component, Debug, Clone, Copy, Deref)]
#[component(on_remove = remove_chassis_body)]
pub struct Chassis(pub BodyHandle);

/// Variant A vehicle. Removing the component releases its controller.
#[derive(Component, Debug)]
#[component(on_remove = release_raycast_controller)]
pub struct RaycastCar(pub RaycastVehicle);

/// Variant B vehicle.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct ImpulseCar(pub vehicles::ImpulseCar);

#[derive(Component, Debug, Clone, Copy, Deref, DerefMut)]
pub struct ChaseCam(pub ChaseCamera);

#[derive(Component, Debug, Clone, Copy, Deref, DerefMut)]
pub struct FixedCam(pub FixedLerpCamera);

/// Entity a camera follows.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowTarget(pub Entity);

/// Latest camera placement, read by the renderer.
#[derive(Component, Debug, Clone, Copy, Default, Deref)]
pub struct CameraRig(pub CameraPose);

/// World transforms of the four wheel meshes (FL, FR, RL, RR).
#[derive(Component, Debug, Clone, Copy, Default, Deref)]
pub struct WheelVisuals(pub [WheelTransform; 4]);

fn remove_chassis_body(mut world: DeferredWorld, ctx: HookContext) {
    let Some(handle) = world.get::<Chassis>(ctx.entity).map(|c| c.0) else {
        return;
    };
    if let Some(mut physics) = world.get_resource_mut::<PhysicsWorld>() {
        let removed = physics.remove_body(handle);
        debug!(entity = ?ctx.entity, ?handle, removed, "chassis body removed");
    }
}

fn release_raycast_controller(mut world: DeferredWorld, ctx: HookContext) {
    let Some(controller) = world
        .get_mut::<RaycastCar>(ctx.entity)
        .and_then(|mut car| car.0.take_controller())
    else {
        return;
    };
    if let Some(mut physics) = world.get_resource_mut::<PhysicsWorld>() {
        let removed = physics.remove_vehicle_controller(controller);
        debug!(entity = ?ctx.entity, ?controller, removed, "raycast controller released");
    }
}
