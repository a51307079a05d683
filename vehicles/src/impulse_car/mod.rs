mod types;
mod dynamics;
mod wheels;

pub use types::{ControlTargets, ImpulseStepDebug, SmoothedControlState};
pub use dynamics::{control_targets, smooth_controls, ImpulseCar};
pub use wheels::{
    select_wheel_nodes, wheel_transform, wheel_visual_transforms, WheelNode, WheelSelection,
    WheelTransform,
};
