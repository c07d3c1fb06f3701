//! Command-line argument parsing for mapforge.

use std::path::PathBuf;

use clap::Parser;
use mapforge_terrain::{TerrainPreset, WorldSeed};

use crate::Config;

/// mapforge command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "mapforge", about = "Deterministic 2D terrain generator")]
pub struct CliArgs {
    /// Generation seed (0 derives one from the clock).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Grid edge length in tiles.
    #[arg(long)]
    pub size: Option<u32>,

    /// Terrain preset (multi-biome, five-band). Replaces the terrain section.
    #[arg(long)]
    pub preset: Option<TerrainPreset>,

    /// Draw a random palette per run.
    #[arg(long)]
    pub randomize_palette: Option<bool>,

    /// Path to the detail sprite.
    #[arg(long)]
    pub sprite: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Integer upscale factor for the output image.
    #[arg(long)]
    pub scale: Option<u32>,

    /// Also write height and biome debug maps.
    #[arg(long)]
    pub debug_maps: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `--preset` is applied before `--randomize-palette` so both can be
    /// combined.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = WorldSeed(seed);
        }
        if let Some(size) = args.size {
            self.world.grid_size = size;
        }
        if let Some(preset) = args.preset {
            self.world.preset = preset;
            self.terrain = preset.config();
        }
        if let Some(randomize) = args.randomize_palette {
            self.terrain.coloring.randomize_palette = randomize;
        }
        if let Some(ref sprite) = args.sprite {
            self.world.feature_sprite = Some(sprite.clone());
        }
        if let Some(ref path) = args.output {
            self.output.path = path.clone();
        }
        if let Some(scale) = args.scale {
            self.output.scale = scale;
        }
        if let Some(debug_maps) = args.debug_maps {
            self.output.debug_maps = debug_maps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use mapforge_terrain::TerrainConfig;

    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            size: Some(64),
            output: Some(PathBuf::from("out/map.png")),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, WorldSeed(42));
        assert_eq!(config.world.grid_size, 64);
        assert_eq!(config.output.path, PathBuf::from("out/map.png"));
        // Non-overridden fields retain defaults
        assert_eq!(config.output.scale, 1);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_preset_then_palette_override() {
        let mut config = Config::default();
        let args = CliArgs {
            preset: Some(TerrainPreset::FiveBand),
            randomize_palette: Some(true),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.preset, TerrainPreset::FiveBand);
        assert!(config.terrain.coloring.randomize_palette);
        assert_eq!(config.terrain.thresholds, TerrainConfig::five_band().thresholds);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "mapforge",
            "--seed",
            "7",
            "--preset",
            "five-band",
            "--debug-maps",
            "true",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.preset, Some(TerrainPreset::FiveBand));
        assert_eq!(args.debug_maps, Some(true));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.size.is_none());
    }
}
