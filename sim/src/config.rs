use std::path::Path;

use anyhow::{ensure, Context, Result};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::info;
use vehicles::{
    ChaseCameraSpec, FixedLerpCameraSpec, ImpulseCarSpec, RaycastVehicleSpec, VehicleInputState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Raycast vehicle controller with a chase camera.
    #[default]
    Raycast,
    /// Impulse-driven car with a fixed-offset camera.
    Impulse,
}

/// Hold `input` for `ticks` simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub ticks: u64,
    #[serde(flatten)]
    pub input: VehicleInputState,
}

impl ScriptSegment {
    pub fn new(ticks: u64, input: VehicleInputState) -> Self {
        Self { ticks, input }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct Config {
    pub tick_hz: u32,
    pub variant: Variant,
    /// Telemetry log period in ticks; 0 disables it.
    pub log_every_ticks: u64,
    pub max_ticks: Option<u64>,
    pub raycast: RaycastVehicleSpec,
    pub impulse: ImpulseCarSpec,
    pub chase_camera: ChaseCameraSpec,
    pub fixed_camera: FixedLerpCameraSpec,
    pub script: Vec<ScriptSegment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            variant: Variant::default(),
            log_every_ticks: 60,
            max_ticks: None,
            raycast: RaycastVehicleSpec::default(),
            impulse: ImpulseCarSpec::default(),
            chase_camera: ChaseCameraSpec::default(),
            fixed_camera: FixedLerpCameraSpec::default(),
            script: Vec::new(),
        }
    }
}

impl Config {
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }

    /// Total length of the input script in ticks.
    pub fn script_ticks(&self) -> u64 {
        self.script.iter().map(|s| s.ticks).sum()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.tick_hz > 0, "tick_hz must be positive");
        self.raycast.validate().context("invalid [raycast] spec")?;
        self.impulse.validate().context("invalid [impulse] spec")?;
        self.chase_camera
            .validate()
            .context("invalid [chase_camera] spec")?;
        self.fixed_camera
            .validate()
            .context("invalid [fixed_camera] spec")?;
        Ok(())
    }
}

pub fn parse_config(text: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(text).context("parsing sim config")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_config(&text).with_context(|| format!("loading {}", path.display()))
}
