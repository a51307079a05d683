use std::path::PathBuf;

use bevy::prelude::Resource;
use clap::Parser;

use crate::config::{Config, Variant};

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "vehicle-sim")]
#[command(about = "Headless runner for the vehicle dynamics core", long_about = None)]
pub struct Args {
    /// TOML config file; defaults are used when it does not exist
    #[arg(long, default_value = "sim.toml")]
    pub config: PathBuf,
    /// Override the vehicle variant from the config
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,
    /// Stop after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

impl Args {
    /// Command line flags win over the config file.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(variant) = self.variant {
            cfg.variant = variant;
        }
        if self.max_ticks.is_some() {
            cfg.max_ticks = self.max_ticks;
        }
    }
}
