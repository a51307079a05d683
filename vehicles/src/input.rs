use serde::{Deserialize, Serialize};

/// Boolean driver controls sampled once per tick.
///
/// Every combination is valid. Opposing flags cancel for the raycast vehicle
/// and resolve by priority (forward over backward, left over right) for the
/// impulse car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleInputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Hand brake. The impulse car has no brake control and ignores it.
    pub brake: bool,
}

/// Signed control axes derived from a [`VehicleInputState`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverAxes {
    /// +1 forward, -1 backward, 0 when neither or both are held.
    pub throttle: f32,
    /// +1 left, -1 right.
    pub steer: f32,
    /// 1 while the brake is held.
    pub brake: f32,
}

impl DriverAxes {
    pub fn any_active(&self) -> bool {
        self.throttle != 0.0 || self.steer != 0.0 || self.brake != 0.0
    }
}

#[inline]
fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl VehicleInputState {
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        brake: false,
    };

    pub fn axes(&self) -> DriverAxes {
        DriverAxes {
            throttle: flag(self.forward) - flag(self.backward),
            steer: flag(self.left) - flag(self.right),
            brake: flag(self.brake),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }

    /// Builds the snapshot from the low five bits (forward, backward, left,
    /// right, brake). Handy for sweeping every combination.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            forward: bits & 0b00001 != 0,
            backward: bits & 0b00010 != 0,
            left: bits & 0b00100 != 0,
            right: bits & 0b01000 != 0,
            brake: bits & 0b10000 != 0,
        }
    }
}

/// Combine keyboard and on-screen touch state.
///
/// The touch pad has no brake button, so holding its reverse pad also
/// engages the brake.
pub fn merge_touch(keyboard: VehicleInputState, touch: VehicleInputState) -> VehicleInputState {
    VehicleInputState {
        forward: keyboard.forward || touch.forward,
        backward: keyboard.backward || touch.backward,
        left: keyboard.left || touch.left,
        right: keyboard.right || touch.right,
        brake: keyboard.brake || touch.backward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_flags_cancel_on_axes() {
        let all = VehicleInputState::from_bits(0b11111);
        let axes = all.axes();
        assert_eq!(axes.throttle, 0.0);
        assert_eq!(axes.steer, 0.0);
        assert_eq!(axes.brake, 1.0);
        assert!(axes.any_active());
    }

    #[test]
    fn idle_snapshot_has_no_active_axis() {
        assert!(VehicleInputState::IDLE.is_idle());
        assert!(!VehicleInputState::default().axes().any_active());
    }

    #[test]
    fn touch_reverse_also_brakes() {
        let touch = VehicleInputState {
            backward: true,
            ..Default::default()
        };
        let merged = merge_touch(VehicleInputState::IDLE, touch);
        assert!(merged.backward);
        assert!(merged.brake);

        // Keyboard reverse keeps the brake independent.
        let merged = merge_touch(touch_free_reverse(), VehicleInputState::IDLE);
        assert!(merged.backward);
        assert!(!merged.brake);
    }

    fn touch_free_reverse() -> VehicleInputState {
        VehicleInputState {
            backward: true,
            ..Default::default()
        }
    }

    #[test]
    fn from_bits_covers_all_combinations() {
        let distinct: std::collections::HashSet<_> = (0u8..32)
            .map(|b| {
                let s = VehicleInputState::from_bits(b);
                (s.forward, s.backward, s.left, s.right, s.brake)
            })
            .collect();
        assert_eq!(distinct.len(), 32);
    }
}
