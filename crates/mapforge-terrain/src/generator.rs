//! Grid and raster assembly.
//!
//! [`TerrainGenerator`] owns every piece of mutable generation state (noise
//! source, RNG, current palette) so independent generators never interfere.

use std::time::Instant;

use glam::UVec2;
use image::{RgbImage, RgbaImage};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::biome::{BiomeClassifier, BiomeSampler, RuleTable, TerrainType};
use crate::color::ColorCompositor;
use crate::config::TerrainConfig;
use crate::error::TerrainError;
use crate::feature::{SitePicker, stamp_features};
use crate::heightmap::HeightFieldBuilder;
use crate::noise_source::NoiseSource;
use crate::seed::{WorldSeed, generation_rng};
use crate::tile::{Tile, TileGrid, index};

/// Largest accepted grid edge, in cells.
pub const MAX_GRID_SIZE: u32 = 16_384;

/// Outcome of the detail pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetailReport {
    /// Sites accepted during the main pass.
    pub candidate_sites: usize,
    /// Sites actually stamped into the raster.
    pub stamped_sites: usize,
    /// No sprite was supplied, so nothing was stamped.
    pub sprite_missing: bool,
}

/// A finished world, handed to the caller by value.
#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    /// The resolved, non-zero seed. Feeding it back reproduces this world.
    pub seed: u64,
    pub grid: TileGrid,
    /// One pixel per tile, with features stamped on top.
    pub raster: RgbImage,
    pub details: DetailReport,
}

/// Deterministic terrain generator.
pub struct TerrainGenerator {
    config: TerrainConfig,
    noise: NoiseSource,
    rng: ChaCha8Rng,
    heights: HeightFieldBuilder,
    flags: BiomeSampler,
    classifier: BiomeClassifier,
    compositor: ColorCompositor,
}

impl TerrainGenerator {
    /// Validate `config` and build a generator.
    ///
    /// # Errors
    ///
    /// Returns the first configuration invariant the config violates.
    pub fn new(config: TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        let classifier = BiomeClassifier::new(
            config.thresholds,
            RuleTable::standard(config.land_biome()),
        )?;
        Ok(Self {
            noise: NoiseSource::new(0),
            rng: generation_rng(0),
            heights: HeightFieldBuilder::new(config.height.clone()),
            flags: BiomeSampler::new(config.flags.clone()),
            classifier,
            compositor: ColorCompositor::new(config.coloring.clone()),
            config,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// The seed of the most recent run (0 before the first run).
    pub fn seed(&self) -> u64 {
        self.noise.seed()
    }

    /// Generate a `grid_size × grid_size` world.
    ///
    /// `feature_sprite` is the decoded detail bitmap; without one the raster
    /// is left with the base tile colors.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::GridSize`] if `grid_size` is 0 or above
    /// [`MAX_GRID_SIZE`]. Nothing else can fail once the generator exists.
    pub fn generate(
        &mut self,
        seed: WorldSeed,
        grid_size: u32,
        feature_sprite: Option<&RgbaImage>,
    ) -> Result<GeneratedWorld, TerrainError> {
        if grid_size == 0 || grid_size > MAX_GRID_SIZE {
            return Err(TerrainError::GridSize {
                size: grid_size,
                max: MAX_GRID_SIZE,
            });
        }

        let start = Instant::now();
        let seed = self.reseed(seed);
        info!(seed, grid_size, "generating terrain");

        self.compositor.begin_run(&mut self.rng);

        let mut tiles: Vec<Tile> = Vec::with_capacity(grid_size as usize * grid_size as usize);
        let mut raster = RgbImage::new(grid_size, grid_size);
        let mut sites = SitePicker::new(self.config.details);

        for y in 0..grid_size {
            for x in 0..grid_size {
                let height = self.heights.height_at(&self.noise, x, y);
                let flags = self.flags.sample(&self.noise, x, y, height);
                let class = self.classifier.classify(height, flags);

                let up_height = y
                    .checked_sub(1)
                    .and_then(|up| tiles.get(index(grid_size, x, up)))
                    .map(|tile| tile.height);
                let brightness = self.compositor.brightness(&mut self.rng, class, height, up_height);
                let color = self.compositor.color(class, brightness);

                let position = UVec2::new(x, y);
                if class.terrain == TerrainType::Grass {
                    sites.consider(&mut self.rng, position);
                }

                raster.put_pixel(x, y, image::Rgb(color));
                tiles.push(Tile {
                    position,
                    height,
                    terrain: class.terrain,
                    biome: class.biome,
                    color,
                    brightness,
                });
            }
        }

        let grid = TileGrid::from_tiles(grid_size, tiles);
        let sites = sites.into_sites();
        let details = match feature_sprite {
            Some(sprite) => DetailReport {
                candidate_sites: sites.len(),
                stamped_sites: stamp_features(
                    &mut raster,
                    &grid,
                    &sites,
                    sprite,
                    self.compositor.palette().feature,
                ),
                sprite_missing: false,
            },
            None => {
                warn!(
                    sites = sites.len(),
                    "no feature sprite supplied, skipping detail placement"
                );
                DetailReport {
                    candidate_sites: sites.len(),
                    stamped_sites: 0,
                    sprite_missing: true,
                }
            }
        };

        info!(
            seed,
            candidate_sites = details.candidate_sites,
            stamped_sites = details.stamped_sites,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "terrain generated"
        );

        Ok(GeneratedWorld {
            seed,
            grid,
            raster,
            details,
        })
    }

    /// Resolve `seed` and reset the noise source and RNG to it.
    fn reseed(&mut self, seed: WorldSeed) -> u64 {
        let seed = seed.resolve();
        self.noise.reseed(seed);
        self.rng = generation_rng(seed);
        seed
    }
}

impl std::fmt::Debug for TerrainGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainGenerator")
            .field("seed", &self.seed())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Convenience wrapper: build a generator and run it once.
pub fn generate_world(
    config: TerrainConfig,
    seed: WorldSeed,
    grid_size: u32,
    feature_sprite: Option<&RgbaImage>,
) -> Result<GeneratedWorld, TerrainError> {
    TerrainGenerator::new(config)?.generate(seed, grid_size, feature_sprite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<TerrainGenerator>();
        assert_send::<GeneratedWorld>();
    }

    #[test]
    fn test_grid_size_bounds() {
        let mut generator = TerrainGenerator::new(TerrainConfig::default()).unwrap();
        assert!(matches!(
            generator.generate(WorldSeed(1), 0, None),
            Err(TerrainError::GridSize { size: 0, .. })
        ));
        assert!(matches!(
            generator.generate(WorldSeed(1), MAX_GRID_SIZE + 1, None),
            Err(TerrainError::GridSize { .. })
        ));
        assert!(generator.generate(WorldSeed(1), 1, None).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected_before_generation() {
        let mut config = TerrainConfig::default();
        config.coloring.min_brightness = 1.2;
        assert!(matches!(
            TerrainGenerator::new(config),
            Err(TerrainError::BrightnessFloor(_))
        ));
    }

    #[test]
    fn test_nan_blend_weight_rejected_before_generation() {
        let mut config = TerrainConfig::default();
        if let crate::heightmap::LayerBlend::Lerp { weight, .. } = &mut config.height.blends[0] {
            *weight = f64::NAN;
        }
        assert!(matches!(
            TerrainGenerator::new(config),
            Err(TerrainError::NonFinite { field: "weight", .. })
        ));
    }

    #[test]
    fn test_seed_reported() {
        let mut generator = TerrainGenerator::new(TerrainConfig::default()).unwrap();
        let world = generator.generate(WorldSeed(99), 8, None).unwrap();
        assert_eq!(world.seed, 99);
        assert_eq!(generator.seed(), 99);

        let clock = generator.generate(WorldSeed::FROM_CLOCK, 8, None).unwrap();
        assert_ne!(clock.seed, 0);
        assert_eq!(generator.seed(), clock.seed);
    }

    #[test]
    fn test_raster_matches_tile_colors_without_sprite() {
        let world = generate_world(TerrainConfig::default(), WorldSeed(17), 32, None).unwrap();
        assert!(world.details.sprite_missing);
        assert_eq!(world.details.stamped_sites, 0);
        for tile in world.grid.tiles() {
            let pixel = world.raster.get_pixel(tile.position.x, tile.position.y);
            assert_eq!(pixel.0, tile.color);
        }
    }

    #[test]
    fn test_reusing_generator_is_reproducible() {
        let mut generator = TerrainGenerator::new(TerrainConfig::default()).unwrap();
        let first = generator.generate(WorldSeed(5), 24, None).unwrap();
        let _other = generator.generate(WorldSeed(6), 24, None).unwrap();
        let again = generator.generate(WorldSeed(5), 24, None).unwrap();
        assert_eq!(first.grid, again.grid);
        assert_eq!(first.raster, again.raster);
    }

    #[test]
    fn test_tile_brightness_reproduces_color() {
        let world = generate_world(TerrainConfig::default(), WorldSeed(8), 16, None).unwrap();
        let palette = TerrainConfig::default().coloring.palette;
        for tile in world.grid.tiles() {
            let class = crate::biome::Classification {
                terrain: tile.terrain,
                biome: tile.biome,
            };
            assert_eq!(
                crate::color::compose(palette.base_color(class), tile.brightness),
                tile.color
            );
        }
    }
}
