//! Terrain generation parameters and presets.

use serde::{Deserialize, Serialize};

use crate::biome::{BiomeFlagConfig, BiomeTag, Thresholds};
use crate::color::{ColoringConfig, Palette, Shading};
use crate::error::TerrainError;
use crate::feature::DetailConfig;
use crate::heightmap::HeightParams;

/// Named starting points for [`TerrainConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainPreset {
    /// Biome flags, brightness jitter, water fade, neighbor shading.
    #[default]
    MultiBiome,
    /// Plain height bands on terraced heights with neighbor shading.
    FiveBand,
}

impl TerrainPreset {
    pub fn config(self) -> TerrainConfig {
        match self {
            Self::MultiBiome => TerrainConfig::multi_biome(),
            Self::FiveBand => TerrainConfig::five_band(),
        }
    }
}

impl std::str::FromStr for TerrainPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "multi-biome" | "multibiome" => Ok(Self::MultiBiome),
            "five-band" | "fiveband" => Ok(Self::FiveBand),
            other => Err(format!("unknown terrain preset: {other}")),
        }
    }
}

/// Every tunable of the generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub thresholds: Thresholds,
    pub height: HeightParams,
    pub flags: BiomeFlagConfig,
    pub coloring: ColoringConfig,
    pub details: DetailConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::multi_biome()
    }
}

impl TerrainConfig {
    pub fn multi_biome() -> Self {
        Self {
            thresholds: Thresholds::default(),
            height: HeightParams::default(),
            flags: BiomeFlagConfig::default(),
            coloring: ColoringConfig::default(),
            details: DetailConfig::default(),
        }
    }

    pub fn five_band() -> Self {
        Self {
            thresholds: Thresholds {
                sea_level: 0.0,
                sand_reach: 0.04,
                stone_level: 0.35,
                snow_level: 0.45,
            },
            height: HeightParams::terraced(64),
            flags: BiomeFlagConfig::disabled(),
            coloring: ColoringConfig {
                palette: Palette::muted(),
                randomize_palette: false,
                brightness_jitter: false,
                min_brightness: 0.8,
                water_fadeout_min: None,
                neighbor_shading: Some(Shading::default()),
            },
            details: DetailConfig::default(),
        }
    }

    /// Biome tag given to land that no flag rule claims.
    pub fn land_biome(&self) -> BiomeTag {
        if self.flags.any_enabled() {
            BiomeTag::Grassland
        } else {
            BiomeTag::Plains
        }
    }

    /// Reject configurations that would produce ambiguous bands or never
    /// terminate.
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.thresholds.validate()?;
        self.height.validate()?;
        self.flags.validate()?;
        self.coloring.validate()?;
        self.details.validate()?;
        Ok(())
    }
}
