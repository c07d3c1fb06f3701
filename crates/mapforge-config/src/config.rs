//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use mapforge_terrain::{TerrainConfig, TerrainPreset, WorldSeed};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level application configuration.
///
/// A file without a `terrain` section gets the terrain of `world.preset`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "ConfigFile")]
pub struct Config {
    /// What world to generate.
    pub world: WorldConfig,
    /// Generator tunables.
    pub terrain: TerrainConfig,
    /// Where and how to write the result.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// On-disk shape of [`Config`]: the terrain section is optional.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    world: WorldConfig,
    #[serde(deserialize_with = "present")]
    terrain: Option<TerrainConfig>,
    output: OutputConfig,
    debug: DebugConfig,
}

fn present<'de, D>(deserializer: D) -> Result<Option<TerrainConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    TerrainConfig::deserialize(deserializer).map(Some)
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let terrain = file
            .terrain
            .unwrap_or_else(|| file.world.preset.config());
        Self {
            world: file.world,
            terrain,
            output: file.output,
            debug: file.debug,
        }
    }
}

/// World selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Generation seed. `0` derives one from the clock.
    pub seed: WorldSeed,
    /// Edge length of the square grid, in tiles.
    pub grid_size: u32,
    /// Preset the terrain section was created from.
    pub preset: TerrainPreset,
    /// Bitmap stamped on detail sites. Without one, no details are drawn.
    pub feature_sprite: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// PNG file the raster is written to.
    pub path: PathBuf,
    /// Integer upscale factor (nearest neighbor).
    pub scale: u32,
    /// Also write height and biome debug maps next to `path`.
    pub debug_maps: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::FROM_CLOCK,
            grid_size: 256,
            preset: TerrainPreset::default(),
            feature_sprite: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("world.png"),
            scale: 1,
            debug_maps: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// `<platform config dir>/mapforge`, or `./mapforge` when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mapforge")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    ///
    /// The terrain section is validated either way.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            config.terrain.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        new_config.terrain.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
