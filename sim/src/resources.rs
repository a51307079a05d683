use bevy::prelude::*;
use vehicles::{ImpulseStepDebug, RapierWorld, RaycastStepDebug, Vec3f, VehicleInputState};

use crate::config::ScriptSegment;

/// The physics world every vehicle lives in.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct PhysicsWorld(pub RapierWorld);

/// Driver controls for the current tick, written by whichever input
/// provider is active (script, keyboard, touch pad).
#[derive(Resource, Debug, Clone, Copy, Default, Deref, DerefMut)]
pub struct DriverInput(pub VehicleInputState);

#[derive(Resource, Debug, Clone, Copy)]
pub struct SimClock {
    /// Seconds advanced per tick.
    pub dt: f32,
    /// Ticks completed so far.
    pub tick: u64,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self { dt, tick: 0 }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

/// Scripted driver: plays the segments in order, one tick at a time.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputScript {
    segments: Vec<ScriptSegment>,
    index: usize,
    elapsed: u64,
}

impl InputScript {
    pub fn new(segments: Vec<ScriptSegment>) -> Self {
        Self {
            segments,
            index: 0,
            elapsed: 0,
        }
    }

    /// Input for the next tick, or `None` once every segment has played.
    pub fn next_input(&mut self) -> Option<VehicleInputState> {
        while let Some(segment) = self.segments.get(self.index) {
            if self.elapsed < segment.ticks {
                self.elapsed += 1;
                return Some(segment.input);
            }
            self.index += 1;
            self.elapsed = 0;
        }
        None
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.segments.len()
    }
}

/// Stop conditions for headless runs.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RunLimits {
    pub max_ticks: Option<u64>,
    pub log_every_ticks: u64,
}

/// Latest step telemetry of the driven vehicle.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimTelemetry {
    pub tick: u64,
    pub position: Vec3f,
    /// Speed along the chassis heading for the raycast vehicle, horizontal
    /// speed for the impulse car.
    pub speed: f32,
    pub raycast: Option<RaycastStepDebug>,
    pub impulse: Option<ImpulseStepDebug>,
    /// Ticks where the vehicle could not read its chassis.
    pub skipped_ticks: u64,
}
