//! [`RigidBodyApi`] and [`VehicleControllerApi`] on top of a `rapier3d`
//! pipeline.
//!
//! The world holds a ground slab, one box collider per chassis body and
//! rapier's raycast vehicle controllers. Bodies and controllers are handed
//! out as stable slot indices so removed handles read as absent instead of
//! aliasing a later insert.

mod body;
mod convert;
mod vehicle;

pub use body::BodyDesc;
pub use vehicle::WheelState;

use rapier3d::prelude::*;
use tracing::{debug, trace};

use crate::math::{finite_or_zero, Quatf, Vec3f};
use crate::physics::{BodyHandle, RigidBodyApi};

use vehicle::Controller;

const GRAVITY: Real = -9.81;
const GROUND_HALF_SIZE: Real = 500.0;
const GROUND_HALF_THICKNESS: Real = 0.5;
/// Road surface. Chassis colliders combine with it by minimum.
const GROUND_FRICTION: Real = 1.3;

pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    handles: Vec<Option<RigidBodyHandle>>,
    controllers: Vec<Option<Controller>>,
    ground: Option<ColliderHandle>,
    ground_height: f32,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RapierWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapierWorld")
            .field("bodies", &self.body_count())
            .field("controllers", &self.controller_count())
            .field("ground_height", &self.ground.map(|_| self.ground_height))
            .finish()
    }
}

impl RapierWorld {
    /// Earth gravity over a flat ground slab whose top face is at y = 0.
    pub fn new() -> Self {
        let mut world = Self::free_space();
        world.gravity = Vector::new(0.0, GRAVITY, 0.0);
        let slab = ColliderBuilder::cuboid(GROUND_HALF_SIZE, GROUND_HALF_THICKNESS, GROUND_HALF_SIZE)
            .translation(Vector::new(0.0, -GROUND_HALF_THICKNESS, 0.0))
            .friction(GROUND_FRICTION)
            .build();
        world.ground = Some(world.colliders.insert(slab));
        world
    }

    /// No gravity and no ground. Bodies only move under applied impulses.
    pub fn free_space() -> Self {
        Self {
            gravity: Vector::zeros(),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            handles: Vec::new(),
            controllers: Vec::new(),
            ground: None,
            ground_height: 0.0,
        }
    }

    /// Move the ground's top face to `height`.
    pub fn with_ground_height(mut self, height: f32) -> Self {
        if let Some(ground) = self.ground.and_then(|h| self.colliders.get_mut(h)) {
            ground.set_translation(Vector::new(0.0, height - GROUND_HALF_THICKNESS, 0.0));
            self.ground_height = height;
        }
        self
    }

    pub fn ground_height(&self) -> f32 {
        self.ground_height
    }

    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .position(convert::isometry(desc.translation, desc.rotation))
            .linear_damping(desc.linear_damping.max(0.0))
            .angular_damping(desc.angular_damping.max(0.0))
            .can_sleep(desc.can_sleep)
            .build();
        let rb = self.bodies.insert(body);

        let h = desc.half_extents;
        let collider = ColliderBuilder::cuboid(h.x, h.y, h.z)
            .translation(convert::vector(desc.collider_offset))
            .mass(desc.mass)
            .friction(desc.friction.max(0.0))
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .build();
        self.colliders.insert_with_parent(collider, rb, &mut self.bodies);

        let handle = BodyHandle(self.handles.len() as u32);
        self.handles.push(Some(rb));
        trace!(?handle, mass = desc.mass, "body added");
        handle
    }

    /// Remove a body and its collider. Controllers still attached to it go
    /// stale and skip their updates.
    pub fn remove_body(&mut self, body: BodyHandle) -> bool {
        let Some(rb) = self.handles.get_mut(body.0 as usize).and_then(Option::take) else {
            return false;
        };
        let removed = self.bodies.remove(
            rb,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        debug!(?body, "body removed");
        removed.is_some()
    }

    pub fn body_count(&self) -> usize {
        self.handles.iter().flatten().count()
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.iter().flatten().count()
    }

    pub fn is_sleeping(&self, body: BodyHandle) -> Option<bool> {
        self.body(body).map(RigidBody::is_sleeping)
    }

    /// Put a body to sleep now instead of waiting for it to settle.
    pub fn sleep(&mut self, body: BodyHandle) {
        if let Some(rb) = self.body_mut(body) {
            rb.sleep();
        }
    }

    /// Overwrite a body's velocities (test setup and teleports).
    pub fn set_velocity(&mut self, body: BodyHandle, linvel: Vec3f, angvel: Vec3f) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(convert::vector(finite_or_zero(linvel)), true);
            rb.set_angvel(convert::vector(finite_or_zero(angvel)), true);
        }
    }

    /// Advance the pipeline by `dt`. Non-positive or non-finite steps are
    /// ignored.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn body(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(resolve(&self.handles, body)?)
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(resolve(&self.handles, body)?)
    }
}

fn resolve(handles: &[Option<RigidBodyHandle>], body: BodyHandle) -> Option<RigidBodyHandle> {
    handles.get(body.0 as usize).copied().flatten()
}

impl RigidBodyApi for RapierWorld {
    fn translation(&self, body: BodyHandle) -> Option<Vec3f> {
        self.body(body).map(|rb| convert::vec3(rb.translation()))
    }

    fn rotation(&self, body: BodyHandle) -> Option<Quatf> {
        self.body(body).map(|rb| convert::quat(rb.rotation()))
    }

    fn linvel(&self, body: BodyHandle) -> Option<Vec3f> {
        self.body(body).map(|rb| convert::vec3(rb.linvel()))
    }

    fn angvel(&self, body: BodyHandle) -> Option<Vec3f> {
        self.body(body).map(|rb| convert::vec3(rb.angvel()))
    }

    fn wake_up(&mut self, body: BodyHandle) {
        if let Some(rb) = self.body_mut(body) {
            rb.wake_up(true);
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3f, wake: bool) {
        if let Some(rb) = self.body_mut(body) {
            rb.apply_impulse(convert::vector(finite_or_zero(impulse)), wake);
        }
    }

    fn apply_torque_impulse(&mut self, body: BodyHandle, torque_impulse: Vec3f, wake: bool) {
        if let Some(rb) = self.body_mut(body) {
            rb.apply_torque_impulse(convert::vector(finite_or_zero(torque_impulse)), wake);
        }
    }
}
