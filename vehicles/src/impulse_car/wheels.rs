use crate::math::{Quatf, Vec3f};
use crate::physics::BodyPose;
use crate::specs::ImpulseCarSpec;

use super::types::SmoothedControlState;

/// World transform of one wheel mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelTransform {
    pub translation: Vec3f,
    pub rotation: Quatf,
}

/// Place a wheel hub given in chassis space: chassis rotation, then steer
/// about the chassis up axis, then spin about the axle.
pub fn wheel_transform(pose: BodyPose, local: Vec3f, steer: f32, spin: f32) -> WheelTransform {
    WheelTransform {
        translation: pose.transform_point(local),
        rotation: pose.rotation * Quatf::from_rotation_y(steer) * Quatf::from_rotation_x(spin),
    }
}

/// Transforms for the four wheel meshes. Only the front pair shows the
/// steer value.
pub fn wheel_visual_transforms(
    pose: BodyPose,
    spec: &ImpulseCarSpec,
    state: &SmoothedControlState,
) -> [WheelTransform; 4] {
    std::array::from_fn(|i| {
        let steer = if i < 2 { state.steer_value } else { 0.0 };
        wheel_transform(pose, spec.wheel_positions[i], steer, state.wheel_rotations[i])
    })
}

/// A node of a loaded vehicle model, as seen by wheel lookup.
#[derive(Debug, Clone, Copy)]
pub struct WheelNode<'a> {
    pub name: &'a str,
    pub is_mesh: bool,
}

/// Indices of the nodes chosen as FL, FR, RL, RR wheel visuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelSelection {
    pub nodes: Vec<usize>,
    /// True when the named lookup failed and the first meshes were used.
    pub fallback: bool,
}

const WHEEL_NAMES: [&str; 4] = ["wheel_fl", "wheel_fr", "wheel_rl", "wheel_rr"];
const WHEEL_HINTS: [&str; 3] = ["wheel", "tyre", "tire"];

/// Pick the wheel meshes out of a model.
///
/// Each slot first looks for a node whose name contains the slot name. A
/// missing slot takes the same-index node among those whose name mentions a
/// wheel, tyre or tire. If any slot is still empty, the first (up to) four
/// mesh nodes are used instead. Never fails; may return fewer than four.
pub fn select_wheel_nodes(nodes: &[WheelNode<'_>]) -> WheelSelection {
    let lowered: Vec<String> = nodes.iter().map(|n| n.name.to_lowercase()).collect();
    let hinted: Vec<usize> = lowered
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty() && WHEEL_HINTS.iter().any(|h| name.contains(h)))
        .map(|(i, _)| i)
        .collect();

    let named: Vec<Option<usize>> = WHEEL_NAMES
        .iter()
        .enumerate()
        .map(|(slot, wanted)| {
            lowered
                .iter()
                .position(|name| name.contains(wanted))
                .or_else(|| hinted.get(slot).copied())
        })
        .collect();

    if named.iter().all(Option::is_some) {
        return WheelSelection {
            nodes: named.into_iter().flatten().collect(),
            fallback: false,
        };
    }

    WheelSelection {
        nodes: nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_mesh)
            .map(|(i, _)| i)
            .take(4)
            .collect(),
        fallback: true,
    }
}
