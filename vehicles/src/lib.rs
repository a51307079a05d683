//! Vehicle dynamics shared by the headless runner and the client.
//!
//! This crate intentionally avoids any ECS types. It maps driver input to
//! forces for two car designs (a raycast vehicle driven through a physics
//! engine's vehicle controller, and a simpler impulse-driven chassis), keeps
//! the follow cameras, and talks to the physics engine only through the
//! traits in [`physics`].

mod math;
pub use math::{Quatf, Vec3f};

mod input;
pub use input::{merge_touch, DriverAxes, VehicleInputState};

pub mod specs;
pub use specs::{
    presets, ChassisSpec, ChaseCameraSpec, FixedLerpCameraSpec, ImpulseCarSpec, RaycastVehicleSpec,
    SpecError, WheelPlacement, WheelTuning,
};

pub mod physics;
pub use physics::{
    BodyHandle, BodyPose, ControllerAxes, ControllerHandle, RigidBodyApi, VehicleControllerApi,
    WheelDesc,
};

pub mod raycast_vehicle;
pub use raycast_vehicle::{
    compute_drive_command, steer_angle_range, DriveCommand, RaycastStepDebug, RaycastVehicle,
    VehicleError,
};

pub mod impulse_car;
pub use impulse_car::{
    control_targets, select_wheel_nodes, smooth_controls, wheel_transform, wheel_visual_transforms,
    ControlTargets, ImpulseCar, ImpulseStepDebug, SmoothedControlState, WheelNode, WheelSelection,
    WheelTransform,
};

pub mod camera;
pub use camera::{CameraPose, ChaseCamera, FixedLerpCamera};

pub mod rapier_world;
pub use rapier_world::{BodyDesc, RapierWorld, WheelState};

/// Wheel slots in placement order.
pub const WHEEL_FRONT_LEFT: usize = 0;
pub const WHEEL_FRONT_RIGHT: usize = 1;
pub const WHEEL_REAR_LEFT: usize = 2;
pub const WHEEL_REAR_RIGHT: usize = 3;
pub const FRONT_WHEELS: [usize; 2] = [WHEEL_FRONT_LEFT, WHEEL_FRONT_RIGHT];
pub const REAR_WHEELS: [usize; 2] = [WHEEL_REAR_LEFT, WHEEL_REAR_RIGHT];
