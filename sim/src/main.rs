use anyhow::{bail, Result};
use bevy::app::AppExit;
use clap::Parser;
use tracing::info;

use sim::{build_sim_app, load_config, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    args.apply(&mut cfg);
    info!(
        variant = ?cfg.variant,
        tick_hz = cfg.tick_hz,
        segments = cfg.script.len(),
        max_ticks = ?cfg.max_ticks,
        "Sim config loaded"
    );

    let mut app = build_sim_app(cfg);
    app.insert_resource(args);
    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("simulation exited with code {code}"),
    }
}
