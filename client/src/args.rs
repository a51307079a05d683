use std::path::PathBuf;

use bevy::prelude::Resource;
use clap::Parser;
use sim::Variant;

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "vehicle-client")]
#[command(about = "Windowed driving prototype", long_about = None)]
pub struct Args {
    /// Vehicle to drive
    #[arg(long, value_enum, default_value_t = Variant::Raycast)]
    pub variant: Variant,
    /// Optional sim config with spec overrides; its script is ignored
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Run without window/rendering
    #[arg(long, default_value_t = false)]
    pub headless: bool,
    /// glTF model for the vehicle, relative to the assets folder. Without
    /// one the car is drawn from boxes and cylinders.
    #[arg(long)]
    pub model: Option<String>,
}
