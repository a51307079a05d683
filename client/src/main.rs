use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use client::{build_client_app, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => sim::load_config(path)?,
        None => sim::load_config(Path::new("sim.toml"))?,
    };
    info!(variant = ?args.variant, "Client starting");

    let mut app = build_client_app(args, cfg);
    app.run();
    Ok(())
}
