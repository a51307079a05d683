use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec3f;

/// Rejected tuning values. Raised when a spec is validated at vehicle
/// creation or when the runner loads overrides from disk.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("low-speed steer limit {low} rad is below the high-speed limit {high} rad")]
    SteerLimitsInverted { low: f32, high: f32 },
    #[error("{field} blend factor {value} is outside (0, 2); the filter would diverge")]
    UnstableBlend { field: &'static str, value: f32 },
    #[error("{field} blend factor {value} is outside (0, 1]")]
    BlendOutOfRange { field: &'static str, value: f32 },
    #[error("wheel placement is not mirrored about the chassis centerline")]
    AsymmetricPlacement,
}

fn finite(field: &'static str, value: f32) -> Result<f32, SpecError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpecError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SpecError> {
    if finite(field, value)? > 0.0 {
        Ok(())
    } else {
        Err(SpecError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SpecError> {
    if finite(field, value)? >= 0.0 {
        Ok(())
    } else {
        Err(SpecError::Negative { field, value })
    }
}

fn finite_vec(field: &'static str, v: Vec3f) -> Result<(), SpecError> {
    for c in v.to_array() {
        finite(field, c)?;
    }
    Ok(())
}

/// Per-wheel suspension and friction constants, applied identically to all
/// four wheels of a raycast vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelTuning {
    pub suspension_stiffness: f32,
    pub suspension_compression: f32,
    pub suspension_relaxation: f32,
    pub max_suspension_force: f32,
    pub friction_slip: f32,
    pub side_friction_stiffness: f32,
    /// Max suspension travel as a multiple of the rest length.
    pub max_travel_factor: f32,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            suspension_stiffness: 38.0,
            suspension_compression: 6.5,
            suspension_relaxation: 8.5,
            max_suspension_force: 6000.0,
            friction_slip: 6.0,
            side_friction_stiffness: 2.4,
            max_travel_factor: 1.6,
        }
    }
}

impl WheelTuning {
    pub fn max_suspension_travel(&self, rest_length: f32) -> f32 {
        rest_length * self.max_travel_factor
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        non_negative("suspension_stiffness", self.suspension_stiffness)?;
        non_negative("suspension_compression", self.suspension_compression)?;
        non_negative("suspension_relaxation", self.suspension_relaxation)?;
        non_negative("max_suspension_force", self.max_suspension_force)?;
        non_negative("friction_slip", self.friction_slip)?;
        non_negative("side_friction_stiffness", self.side_friction_stiffness)?;
        positive("max_travel_factor", self.max_travel_factor)
    }
}

/// Hub positions in chassis-local space (FL, FR, RL, RR) plus the shared
/// wheel radius and suspension rest length. Computed once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelPlacement {
    pub positions: [Vec3f; 4],
    pub wheel_radius: f32,
    pub suspension_rest_length: f32,
}

impl WheelPlacement {
    /// Lay the wheels out inside a chassis box given by its half extents.
    pub fn from_chassis_extents(
        half_width: f32,
        half_length: f32,
        half_height: f32,
        wheel_radius: f32,
        suspension_rest_length: f32,
    ) -> Self {
        let track = half_width * 0.92;
        let front_z = half_length * 0.78;
        let rear_z = -half_length * 0.82;
        let hub_y = -half_height + wheel_radius * 1.1;
        Self {
            positions: [
                Vec3f::new(track, hub_y, front_z),
                Vec3f::new(-track, hub_y, front_z),
                Vec3f::new(track, hub_y, rear_z),
                Vec3f::new(-track, hub_y, rear_z),
            ],
            wheel_radius,
            suspension_rest_length,
        }
    }

    /// Front and rear pairs mirror each other across x = 0.
    pub fn is_symmetric(&self) -> bool {
        const EPS: f32 = 1e-6;
        let mirrored = |a: Vec3f, b: Vec3f| {
            (a.x + b.x).abs() <= EPS && (a.y - b.y).abs() <= EPS && (a.z - b.z).abs() <= EPS
        };
        mirrored(self.positions[0], self.positions[1]) && mirrored(self.positions[2], self.positions[3])
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        positive("wheel_radius", self.wheel_radius)?;
        positive("suspension_rest_length", self.suspension_rest_length)?;
        for p in self.positions {
            finite_vec("wheel position", p)?;
        }
        if !self.is_symmetric() {
            return Err(SpecError::AsymmetricPlacement);
        }
        Ok(())
    }
}

impl Default for WheelPlacement {
    fn default() -> Self {
        // Scale of the bundled racer model.
        Self::from_chassis_extents(0.0104, 0.024425, 0.006835, 0.0036, 0.0034)
    }
}

/// Rigid body parameters for a chassis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChassisSpec {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
    pub spawn_position: Vec3f,
    /// Collision box half extents. The mass is spread uniformly over it.
    pub half_extents: Vec3f,
    /// Contact friction of the chassis collider. The ground combines with it
    /// by minimum, so this is the effective value.
    #[serde(default = "ChassisSpec::default_friction")]
    pub friction: f32,
}

impl ChassisSpec {
    fn default_friction() -> f32 {
        0.5
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        positive("chassis.mass", self.mass)?;
        non_negative("chassis.friction", self.friction)?;
        non_negative("chassis.linear_damping", self.linear_damping)?;
        non_negative("chassis.angular_damping", self.angular_damping)?;
        finite_vec("chassis.spawn_position", self.spawn_position)?;
        for c in self.half_extents.to_array() {
            positive("chassis.half_extents", c)?;
        }
        Ok(())
    }
}

/// Force mapping for the raycast vehicle. Angles are in radians, speeds in
/// m/s along the chassis forward axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastVehicleSpec {
    pub max_engine_force: f32,
    pub max_brake_force: f32,
    /// Rolling resistance applied to every wheel while no throttle is held.
    pub natural_brake_force: f32,
    /// Engine force is cut above this forward speed.
    pub max_forward_speed: f32,
    /// Engine force is cut below minus this speed.
    pub max_reverse_speed: f32,
    pub max_steer_low_speed: f32,
    pub max_steer_high_speed: f32,
    /// Speed at which the steer range reaches `max_steer_high_speed`.
    pub steer_speed_falloff: f32,
    pub wheel_tuning: WheelTuning,
    pub placement: WheelPlacement,
    pub chassis: ChassisSpec,
}

impl Default for RaycastVehicleSpec {
    fn default() -> Self {
        presets::compact_racer()
    }
}

impl RaycastVehicleSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        non_negative("max_engine_force", self.max_engine_force)?;
        non_negative("max_brake_force", self.max_brake_force)?;
        non_negative("natural_brake_force", self.natural_brake_force)?;
        non_negative("max_forward_speed", self.max_forward_speed)?;
        non_negative("max_reverse_speed", self.max_reverse_speed)?;
        non_negative("max_steer_low_speed", self.max_steer_low_speed)?;
        non_negative("max_steer_high_speed", self.max_steer_high_speed)?;
        positive("steer_speed_falloff", self.steer_speed_falloff)?;
        if self.max_steer_low_speed < self.max_steer_high_speed {
            return Err(SpecError::SteerLimitsInverted {
                low: self.max_steer_low_speed,
                high: self.max_steer_high_speed,
            });
        }
        self.wheel_tuning.validate()?;
        self.placement.validate()?;
        self.chassis.validate()
    }
}

/// Tuning for the impulse-driven car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseCarSpec {
    pub max_force: f32,
    pub max_brake_force: f32,
    /// Fraction of `max_brake_force` applied while coasting.
    pub idle_brake_ratio: f32,
    pub max_steer_value: f32,
    pub lerp_speed: f32,
    /// Engine and brake blend factor is `lerp_speed * force_lerp_gain`.
    pub force_lerp_gain: f32,
    /// Steer blend factor is `lerp_speed * steer_lerp_gain`.
    pub steer_lerp_gain: f32,
    pub engine_threshold: f32,
    pub brake_threshold: f32,
    pub steer_threshold: f32,
    pub brake_linear_gain: f32,
    pub brake_angular_gain: f32,
    pub steer_torque_gain: f32,
    pub wheel_radius: f32,
    /// Visual hub positions (FL, FR, RL, RR) in chassis space.
    pub wheel_positions: [Vec3f; 4],
    pub chassis: ChassisSpec,
}

impl Default for ImpulseCarSpec {
    fn default() -> Self {
        presets::arcade_car()
    }
}

impl ImpulseCarSpec {
    pub fn force_lerp_factor(&self) -> f32 {
        self.lerp_speed * self.force_lerp_gain
    }

    pub fn steer_lerp_factor(&self) -> f32 {
        self.lerp_speed * self.steer_lerp_gain
    }

    /// True when the engine/brake filter reaches its target in a single tick,
    /// i.e. no smoothing happens at all.
    pub fn force_smoothing_saturated(&self) -> bool {
        self.force_lerp_factor() >= 1.0
    }

    /// True when the steer filter overshoots its target before settling.
    pub fn steer_smoothing_overshoots(&self) -> bool {
        self.steer_lerp_factor() > 1.0
    }

    /// Chassis origin height above the ground when the lowest wheel rests
    /// on it.
    pub fn ride_height(&self) -> f32 {
        let lowest = self
            .wheel_positions
            .iter()
            .map(|p| p.y)
            .fold(f32::INFINITY, f32::min);
        self.wheel_radius - lowest
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        non_negative("max_force", self.max_force)?;
        non_negative("max_brake_force", self.max_brake_force)?;
        non_negative("idle_brake_ratio", self.idle_brake_ratio)?;
        non_negative("max_steer_value", self.max_steer_value)?;
        non_negative("engine_threshold", self.engine_threshold)?;
        non_negative("brake_threshold", self.brake_threshold)?;
        non_negative("steer_threshold", self.steer_threshold)?;
        non_negative("brake_linear_gain", self.brake_linear_gain)?;
        non_negative("brake_angular_gain", self.brake_angular_gain)?;
        finite("steer_torque_gain", self.steer_torque_gain)?;
        positive("wheel_radius", self.wheel_radius)?;
        for (field, factor) in [
            ("force", self.force_lerp_factor()),
            ("steer", self.steer_lerp_factor()),
        ] {
            // x += (t - x) * f converges only for 0 < f < 2.
            if !(factor > 0.0 && factor < 2.0) {
                return Err(SpecError::UnstableBlend { field, value: factor });
            }
        }
        for p in self.wheel_positions {
            finite_vec("wheel position", p)?;
        }
        self.chassis.validate()
    }
}

/// Chase camera behind a raycast vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseCameraSpec {
    /// Distance behind the chassis along its forward axis.
    pub back_offset: f32,
    pub height: f32,
    pub look_height: f32,
    /// Exponential approach rate (1/s).
    pub rate: f32,
}

impl Default for ChaseCameraSpec {
    fn default() -> Self {
        presets::chase_camera()
    }
}

impl ChaseCameraSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        finite("back_offset", self.back_offset)?;
        finite("height", self.height)?;
        finite("look_height", self.look_height)?;
        positive("rate", self.rate)
    }
}

/// World-space offset camera that blends a fixed fraction per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedLerpCameraSpec {
    pub offset: Vec3f,
    pub factor: f32,
}

impl Default for FixedLerpCameraSpec {
    fn default() -> Self {
        presets::fixed_lerp_camera()
    }
}

impl FixedLerpCameraSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        finite_vec("offset", self.offset)?;
        let f = finite("factor", self.factor)?;
        if f > 0.0 && f <= 1.0 {
            Ok(())
        } else {
            Err(SpecError::BlendOutOfRange {
                field: "factor",
                value: f,
            })
        }
    }
}

pub mod presets {
    use super::*;

    // Small-scale racer: the chassis model is a few centimetres long but is
    // simulated with a full-size car's mass and forces.
    pub fn compact_racer() -> RaycastVehicleSpec {
        RaycastVehicleSpec {
            max_engine_force: 2200.0,
            max_brake_force: 1800.0,
            natural_brake_force: 60.0,
            max_forward_speed: 55.0,
            max_reverse_speed: 15.0,
            max_steer_low_speed: 32.0_f32.to_radians(),
            max_steer_high_speed: 12.0_f32.to_radians(),
            steer_speed_falloff: 35.0,
            wheel_tuning: WheelTuning::default(),
            placement: WheelPlacement::default(),
            chassis: ChassisSpec {
                mass: 1200.0,
                linear_damping: 0.3,
                angular_damping: 0.6,
                can_sleep: true,
                spawn_position: Vec3f::new(0.0, 0.02, 0.0),
                half_extents: Vec3f::new(0.0104, 0.006835, 0.024425),
                // The suspension cannot carry this mass at this scale, so the
                // chassis box rides the road as a skid plate.
                friction: 0.0,
            },
        }
    }

    pub fn arcade_car() -> ImpulseCarSpec {
        ImpulseCarSpec {
            max_force: 150.0,
            max_brake_force: 50.0,
            idle_brake_ratio: 0.3,
            max_steer_value: 0.5,
            lerp_speed: 0.1,
            force_lerp_gain: 10.0,
            steer_lerp_gain: 15.0,
            engine_threshold: 0.1,
            brake_threshold: 0.1,
            steer_threshold: 0.01,
            brake_linear_gain: 0.1,
            brake_angular_gain: 0.05,
            steer_torque_gain: 50.0,
            wheel_radius: 0.4,
            // The model's FL/FR labels sit at -X/+X, mirrored from the
            // chassis basis.
            wheel_positions: [
                Vec3f::new(-0.7, -0.3, 1.2),
                Vec3f::new(0.7, -0.3, 1.2),
                Vec3f::new(-0.7, -0.3, -1.2),
                Vec3f::new(0.7, -0.3, -1.2),
            ],
            chassis: ChassisSpec {
                mass: 800.0,
                linear_damping: 0.4,
                angular_damping: 0.4,
                can_sleep: true,
                spawn_position: Vec3f::new(0.0, 2.0, 0.0),
                half_extents: Vec3f::new(1.0, 0.25, 2.0),
                friction: 0.5,
            },
        }
    }

    pub fn chase_camera() -> ChaseCameraSpec {
        ChaseCameraSpec {
            back_offset: 0.14,
            height: 0.06,
            look_height: 0.02,
            rate: 4.0,
        }
    }

    pub fn fixed_lerp_camera() -> FixedLerpCameraSpec {
        FixedLerpCameraSpec {
            offset: Vec3f::new(0.0, 3.0, 5.0),
            factor: 0.05,
        }
    }
}
