mod types;
mod dynamics;
mod vehicle;

pub use types::{DriveCommand, RaycastStepDebug};
pub use dynamics::{compute_drive_command, steer_angle_range};
pub use vehicle::{RaycastVehicle, VehicleError};
