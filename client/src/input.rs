use bevy::prelude::*;
use sim::DriverInput;
use vehicles::{merge_touch, VehicleInputState};

/// Buttons held on the on-screen touch pad, written by the HUD.
#[derive(Resource, Debug, Clone, Copy, Default, Deref, DerefMut)]
pub struct TouchPad(pub VehicleInputState);

/// Input providers run here, before the simulation tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSet;

const FORWARD_KEYS: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
const BACKWARD_KEYS: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
const LEFT_KEYS: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];

pub fn keyboard_state(keys: &ButtonInput<KeyCode>) -> VehicleInputState {
    VehicleInputState {
        forward: keys.any_pressed(FORWARD_KEYS),
        backward: keys.any_pressed(BACKWARD_KEYS),
        left: keys.any_pressed(LEFT_KEYS),
        right: keys.any_pressed(RIGHT_KEYS),
        brake: keys.pressed(KeyCode::Space),
    }
}

pub fn read_driver_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    touch: Res<TouchPad>,
    mut input: ResMut<DriverInput>,
) {
    let keyboard = keys.map(|k| keyboard_state(&k)).unwrap_or_default();
    input.0 = merge_touch(keyboard, touch.0);
}
