use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;
use bevy_inspector_egui::bevy_egui::EguiContexts;
use sim::{DriverInput, SimTelemetry};
use vehicles::VehicleInputState;

use crate::input::TouchPad;

pub struct HudControlsPlugin;

impl Plugin for HudControlsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TouchPad>()
            // Ensure the egui UI runs between BeginPass (PreUpdate) and EndPass (PostUpdate)
            .add_systems(EguiPrimaryContextPass, ui_drive_panel);
    }
}

fn ui_drive_panel(
    mut egui_ctx: EguiContexts,
    mut pad: ResMut<TouchPad>,
    input: Res<DriverInput>,
    telemetry: Res<SimTelemetry>,
) {
    use bevy_inspector_egui::egui::*;
    let Ok(ctx) = egui_ctx.ctx_mut() else {
        return;
    };

    SidePanel::left("drive_panel")
        .exact_width(150.0)
        .show(ctx, |ui| {
            ui.heading("Drive");
            ui.add_space(8.0);

            ui.monospace(format!(
                "tick  {}\nspeed {:6.2} m/s\npos   {:6.2} {:6.2}",
                telemetry.tick, telemetry.speed, telemetry.position.x, telemetry.position.z
            ));
            if let Some(dbg) = telemetry.raycast {
                ui.monospace(format!(
                    "eng {:7.1}\nbrk {:7.1}\nstr {:+.3} rad",
                    dbg.command.engine_force, dbg.command.braking_force, dbg.command.steer_angle
                ));
            }
            if let Some(dbg) = telemetry.impulse {
                ui.monospace(format!(
                    "eng {:6.1}\nbrk {:6.1}\nstr {:+.3}",
                    dbg.smoothed.engine_force, dbg.smoothed.brake_force, dbg.smoothed.steer_value
                ));
            }
            let axes = input.axes();
            ui.monospace(format!(
                "thr {:+.0} steer {:+.0} brk {:.0}",
                axes.throttle, axes.steer, axes.brake
            ));

            ui.separator();
            ui.label("Touch pad (hold)");
            let size = [40.0, 36.0];
            let held = |ui: &mut Ui, label: &str| {
                ui.add_sized(size, Button::new(label)).is_pointer_button_down_on()
            };

            let mut next = VehicleInputState::IDLE;
            ui.horizontal(|ui| {
                ui.add_space(size[0] + 8.0);
                next.forward = held(ui, "^");
            });
            ui.horizontal(|ui| {
                next.left = held(ui, "<");
                next.backward = held(ui, "v");
                next.right = held(ui, ">");
            });
            if pad.0 != next {
                pad.0 = next;
            }
        });
}
