//! Tile color compositing: palette lookup, brightness jitter, water depth
//! fade and neighbor-relative shading.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biome::{BiomeTag, Classification, TerrainType};
use crate::error::TerrainError;

/// Base colors per terrain category, plus the tint used for stamped features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sea: [u8; 3],
    pub ice: [u8; 3],
    pub grass: [u8; 3],
    pub savanna: [u8; 3],
    pub forest: [u8; 3],
    pub sand: [u8; 3],
    pub stone: [u8; 3],
    pub snow: [u8; 3],
    /// Tint multiplied into feature sprites.
    pub feature: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sea: [0, 128, 255],
            ice: [0, 255, 255],
            grass: [0, 180, 0],
            savanna: [252, 240, 3],
            forest: [32, 150, 0],
            sand: [255, 225, 0],
            stone: [120, 120, 120],
            snow: [255, 255, 255],
            feature: [0, 255, 26],
        }
    }
}

impl Palette {
    /// Muted palette used by the five-band preset.
    pub fn muted() -> Self {
        Self {
            sea: [49, 109, 195],
            ice: [0, 255, 255],
            grass: [92, 166, 31],
            savanna: [252, 240, 3],
            forest: [32, 150, 0],
            sand: [218, 207, 143],
            stone: [120, 120, 120],
            snow: [255, 255, 255],
            feature: [0, 255, 26],
        }
    }

    /// One independent random color per entry, drawn in field order.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut color = || [rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()];
        Self {
            sea: color(),
            ice: color(),
            grass: color(),
            savanna: color(),
            forest: color(),
            sand: color(),
            stone: color(),
            snow: color(),
            feature: color(),
        }
    }

    /// Base color for a classified tile.
    pub fn base_color(&self, class: Classification) -> [u8; 3] {
        match class.terrain {
            TerrainType::Water => self.sea,
            TerrainType::Ice => self.ice,
            TerrainType::Sand => self.sand,
            TerrainType::Stone => self.stone,
            TerrainType::Snow => self.snow,
            TerrainType::Grass => match class.biome {
                BiomeTag::Savanna => self.savanna,
                BiomeTag::Forest => self.forest,
                _ => self.grass,
            },
        }
    }
}

/// Multipliers applied when a tile is higher or lower than the tile above it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shading {
    /// Applied when the upward neighbor is lower. Must be > 1.
    pub brighten: f64,
    /// Applied when the upward neighbor is higher. Must be in (0, 1).
    pub darken: f64,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            brighten: 1.1,
            darken: 0.8,
        }
    }
}

impl Shading {
    /// Multiplier for a tile of `height` below a neighbor of `up_height`.
    pub fn factor(&self, height: f64, up_height: Option<f64>) -> f64 {
        match up_height {
            Some(up) if up < height => self.brighten,
            Some(up) if up > height => self.darken,
            _ => 1.0,
        }
    }
}

/// Coloring parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringConfig {
    pub palette: Palette,
    /// Replace the palette with random colors at the start of each run.
    pub randomize_palette: bool,
    /// Redraw land and ice brightness until it reaches `min_brightness`.
    pub brightness_jitter: bool,
    pub min_brightness: f64,
    /// Darken water with depth, down to this floor.
    pub water_fadeout_min: Option<f64>,
    pub neighbor_shading: Option<Shading>,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            randomize_palette: false,
            brightness_jitter: true,
            min_brightness: 0.8,
            water_fadeout_min: Some(0.8),
            neighbor_shading: Some(Shading::default()),
        }
    }
}

/// Highest accepted `min_brightness`. Rejection sampling needs on average
/// `1 / (1 - floor)` draws per tile.
pub const MAX_BRIGHTNESS_FLOOR: f64 = 0.99;

impl ColoringConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(0.0..=MAX_BRIGHTNESS_FLOOR).contains(&self.min_brightness) {
            return Err(TerrainError::BrightnessFloor(self.min_brightness));
        }
        if let Some(floor) = self.water_fadeout_min
            && !(0.0..=1.0).contains(&floor)
        {
            return Err(TerrainError::BrightnessFloor(floor));
        }
        if let Some(shading) = self.neighbor_shading {
            if !(shading.brighten > 1.0 && shading.brighten.is_finite()) {
                return Err(TerrainError::ShadingMultiplier {
                    name: "brighten",
                    value: shading.brighten,
                });
            }
            if !(shading.darken > 0.0 && shading.darken < 1.0) {
                return Err(TerrainError::ShadingMultiplier {
                    name: "darken",
                    value: shading.darken,
                });
            }
        }
        Ok(())
    }
}

/// Draw from `[0, 1)` until the value reaches `floor`.
///
/// The accepted values are skewed towards `floor` compared with a rescaled
/// `floor + (1 - floor) * u`; existing worlds depend on this distribution.
pub fn rejection_brightness(rng: &mut impl Rng, floor: f64) -> f64 {
    loop {
        let value = rng.random::<f64>();
        if value >= floor {
            return value;
        }
    }
}

/// Scale each channel by `brightness`, rounding and clamping to `0..=255`.
pub fn compose(base: [u8; 3], brightness: f64) -> [u8; 3] {
    base.map(|c| (c as f64 * brightness).round().clamp(0.0, 255.0) as u8)
}

/// Turns a classification into a final color and brightness.
#[derive(Clone, Debug)]
pub struct ColorCompositor {
    config: ColoringConfig,
    palette: Palette,
}

impl ColorCompositor {
    pub fn new(config: ColoringConfig) -> Self {
        let palette = config.palette;
        Self { config, palette }
    }

    /// Palette for the current run.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Reset to the configured palette, or draw a random one if enabled.
    pub fn begin_run(&mut self, rng: &mut impl Rng) {
        self.palette = if self.config.randomize_palette {
            let palette = Palette::random(rng);
            tracing::debug!(?palette, "randomized palette");
            palette
        } else {
            self.config.palette
        };
    }

    /// Brightness multiplier for one tile.
    ///
    /// Consumes RNG draws only when jitter is enabled: one rejection loop for
    /// land tiles, one for ice tiles, none for open water.
    pub fn brightness(
        &self,
        rng: &mut impl Rng,
        class: Classification,
        height: f64,
        up_height: Option<f64>,
    ) -> f64 {
        let jitter = self.config.brightness_jitter;
        let mut brightness = if class.terrain.is_liquid_surface() {
            let mut b = match self.config.water_fadeout_min {
                Some(floor) => (1.0 - height.abs()).clamp(floor, 1.0),
                None => 1.0,
            };
            if jitter && class.terrain == TerrainType::Ice {
                b *= rejection_brightness(rng, self.config.min_brightness);
            }
            b
        } else if jitter {
            rejection_brightness(rng, self.config.min_brightness)
        } else {
            1.0
        };

        if let Some(shading) = &self.config.neighbor_shading {
            brightness *= shading.factor(height, up_height);
        }
        brightness
    }

    /// Composite color for a classified tile at the given brightness.
    pub fn color(&self, class: Classification, brightness: f64) -> [u8; 3] {
        compose(self.palette.base_color(class), brightness)
    }
}
