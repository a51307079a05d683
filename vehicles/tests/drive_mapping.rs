use vehicles::{compute_drive_command, presets, steer_angle_range, VehicleInputState};

const SPEEDS: [f32; 11] = [-60.0, -15.5, -15.0, -5.0, 0.0, 5.0, 34.9, 35.0, 54.9, 55.1, 90.0];

#[test]
fn engine_force_follows_throttle_sign_and_speed_caps() {
    let spec = presets::compact_racer();
    for bits in 0u8..32 {
        let input = VehicleInputState::from_bits(bits);
        let throttle = input.axes().throttle;
        for speed in SPEEDS {
            let cmd = compute_drive_command(&spec, input, speed);
            let capped = (throttle > 0.0 && speed > 55.0) || (throttle < 0.0 && speed < -15.0);
            if throttle == 0.0 || capped {
                assert_eq!(cmd.engine_force, 0.0, "input {input:?} speed {speed}");
            } else {
                assert_eq!(cmd.engine_force.signum(), throttle.signum(), "input {input:?} speed {speed}");
                assert_eq!(cmd.engine_force.abs(), 2200.0);
            }
            assert_eq!(cmd.wheel_engine_force[0], 0.0);
            assert_eq!(cmd.wheel_engine_force[1], 0.0);
            assert_eq!(cmd.wheel_engine_force[2], cmd.engine_force);
            assert_eq!(cmd.wheel_engine_force[3], cmd.engine_force);
        }
    }
}

#[test]
fn holding_brake_always_adds_brake_force() {
    let spec = presets::compact_racer();
    for bits in 0u8..16 {
        let released = VehicleInputState::from_bits(bits);
        let held = VehicleInputState { brake: true, ..released };
        for speed in SPEEDS {
            let a = compute_drive_command(&spec, released, speed);
            let b = compute_drive_command(&spec, held, speed);
            assert!(b.braking_force > a.braking_force, "{released:?} at {speed}");
            assert!(b.wheel_brake.iter().all(|&f| f == b.braking_force));
        }
    }
}

#[test]
fn natural_brake_iff_no_throttle() {
    let spec = presets::compact_racer();
    for bits in 0u8..32 {
        let input = VehicleInputState::from_bits(bits);
        let cmd = compute_drive_command(&spec, input, 3.0);
        let natural = cmd.braking_force - if input.brake { 1800.0 } else { 0.0 };
        if input.axes().throttle == 0.0 {
            assert_eq!(natural, 60.0, "{input:?}");
        } else {
            assert_eq!(natural, 0.0, "{input:?}");
        }
    }
}

#[test]
fn steer_limit_shrinks_with_speed_and_saturates() {
    let spec = presets::compact_racer();
    let low = 32.0_f32.to_radians();
    let high = 12.0_f32.to_radians();
    let mut prev = f32::INFINITY;
    for i in 0..=200 {
        let speed = i as f32 * 0.5;
        let range = steer_angle_range(&spec, speed);
        assert!(range <= prev + 1e-7, "not monotonic at {speed}");
        assert!(range >= high - 1e-6 && range <= low + 1e-6);
        assert_eq!(range, steer_angle_range(&spec, -speed));
        if speed >= 35.0 {
            assert!((range - high).abs() < 1e-6);
        }
        prev = range;
    }
}

#[test]
fn every_combination_is_deterministic_and_finite() {
    let spec = presets::compact_racer();
    for bits in 0u8..32 {
        let input = VehicleInputState::from_bits(bits);
        for speed in SPEEDS {
            let a = compute_drive_command(&spec, input, speed);
            let b = compute_drive_command(&spec, input, speed);
            assert_eq!(a, b);
            assert!(a.engine_force.is_finite() && a.braking_force.is_finite() && a.steer_angle.is_finite());
        }
    }
}
