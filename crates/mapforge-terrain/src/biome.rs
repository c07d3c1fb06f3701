//! Biome system: terrain/biome kinds, noise-driven biome flags, and the
//! ordered rule table that classifies each cell.

mod def;
mod rules;
mod sampler;

pub use def::{BiomeTag, Classification, TerrainType};
pub use rules::{
    BiomeClassifier, ClassificationRule, Level, RuleCondition, RuleTable, Thresholds,
};
pub use sampler::{BiomeFlag, BiomeFlagConfig, BiomeFlags, BiomeSampler, FlagField};
