//! mapforge: generate a terrain map and write it as a PNG.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p mapforge-demo -- --seed 42 --size 512 --scale 2`.

mod output;

use clap::Parser;
use mapforge_config::{CliArgs, Config, default_config_dir};
use mapforge_terrain::{BackgroundGeneration, TerrainError};
use tracing::{error, info};

/// Failures that end the run.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to create output directory: {0}")]
    OutputDir(#[source] std::io::Error),
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    mapforge_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), DemoError> {
    let sprite = output::load_sprite(config.world.feature_sprite.as_deref());

    info!(
        preset = ?config.world.preset,
        grid_size = config.world.grid_size,
        "starting generation"
    );
    let world = BackgroundGeneration::spawn(
        config.terrain.clone(),
        config.world.seed,
        config.world.grid_size,
        sprite,
    )?
    .wait()?;

    output::write_world(
        &world,
        &config.output.path,
        config.output.scale,
        config.output.debug_maps,
    )?;

    println!(
        "seed {} -> {} ({} detail sites)",
        world.seed,
        config.output.path.display(),
        world.details.stamped_sites
    );
    Ok(())
}
