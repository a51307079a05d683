use crate::math::{Quatf, Vec3f};
use crate::specs::ChassisSpec;

/// Creation parameters for a chassis body and its single box collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub translation: Vec3f,
    pub rotation: Quatf,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
    pub half_extents: Vec3f,
    /// Collider center in body space.
    pub collider_offset: Vec3f,
    pub friction: f32,
}

impl BodyDesc {
    /// Box of the chassis' half extents at its spawn position.
    pub fn from_chassis(spec: &ChassisSpec) -> Self {
        Self {
            translation: spec.spawn_position,
            rotation: Quatf::IDENTITY,
            mass: spec.mass,
            linear_damping: spec.linear_damping,
            angular_damping: spec.angular_damping,
            can_sleep: spec.can_sleep,
            half_extents: spec.half_extents,
            collider_offset: Vec3f::ZERO,
            friction: spec.friction,
        }
    }

    /// Grow the collider box until it also encloses a sphere of `radius`
    /// around each wheel hub.
    pub fn enclosing_wheels(mut self, hubs: &[Vec3f], radius: f32) -> Self {
        let r = Vec3f::splat(radius.max(0.0));
        let (min, max) = hubs.iter().fold(
            (self.collider_offset - self.half_extents, self.collider_offset + self.half_extents),
            |(min, max), hub| (min.min(*hub - r), max.max(*hub + r)),
        );
        self.half_extents = (max - min) * 0.5;
        self.collider_offset = (max + min) * 0.5;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::presets::arcade_car;

    #[test]
    fn hull_bottom_matches_ride_height() {
        let spec = arcade_car();
        let desc = BodyDesc::from_chassis(&spec.chassis)
            .enclosing_wheels(&spec.wheel_positions, spec.wheel_radius);
        let bottom = desc.collider_offset.y - desc.half_extents.y;
        assert!((bottom + spec.ride_height()).abs() < 1e-6, "bottom {bottom}");
        // Wheels fit inside the body length, so only width and depth grow.
        assert!((desc.half_extents.z - 2.0).abs() < 1e-6);
        assert!((desc.half_extents.x - 1.1).abs() < 1e-6);
    }

    #[test]
    fn no_hubs_keeps_the_box() {
        let spec = arcade_car();
        let desc = BodyDesc::from_chassis(&spec.chassis);
        assert_eq!(desc.enclosing_wheels(&[], 0.4), desc);
    }
}
