//! Deterministic procedural terrain: layered noise heights, rule-based biome
//! classification, color compositing and sprite detail placement on a square
//! tile grid with a matching raster.

mod async_generation;
mod config;
mod error;
mod feature;
mod generator;
mod heightmap;
mod noise_source;
mod seed;
mod tile;

pub mod biome;
pub mod color;
pub mod debug_viz;

pub use async_generation::BackgroundGeneration;
pub use biome::{BiomeTag, Classification, TerrainType};
pub use config::{TerrainConfig, TerrainPreset};
pub use error::TerrainError;
pub use feature::{DetailConfig, SitePicker, spaced_apart, stamp_features};
pub use generator::{
    DetailReport, GeneratedWorld, MAX_GRID_SIZE, TerrainGenerator, generate_world,
};
pub use heightmap::{HeightFieldBuilder, HeightParams, LayerBlend, NoiseLayer, lerp, quantize};
pub use noise_source::NoiseSource;
pub use seed::{WorldSeed, fold_noise_seed, generation_rng, hash_world};
pub use tile::{Tile, TileGrid};

pub use image::{RgbImage, RgbaImage};
