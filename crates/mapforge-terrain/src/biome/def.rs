//! Terrain and biome kinds assigned to each tile.

use serde::{Deserialize, Serialize};

/// Coarse surface material of a tile. Exactly one per tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Water,
    Ice,
    Sand,
    Grass,
    Stone,
    Snow,
}

impl TerrainType {
    /// All terrain types in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Water,
        Self::Ice,
        Self::Sand,
        Self::Grass,
        Self::Stone,
        Self::Snow,
    ];

    /// Returns `true` for the two sea-level-and-below types.
    pub fn is_liquid_surface(self) -> bool {
        matches!(self, Self::Water | Self::Ice)
    }
}

/// Finer classification layered on top of [`TerrainType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeTag {
    Sea,
    FrozenSea,
    Grassland,
    Savanna,
    Forest,
    Beach,
    Frozen,
    Desert,
    Plains,
}

impl BiomeTag {
    /// All biome tags in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Sea,
        Self::FrozenSea,
        Self::Grassland,
        Self::Savanna,
        Self::Forest,
        Self::Beach,
        Self::Frozen,
        Self::Desert,
        Self::Plains,
    ];
}

/// The `(terrain, biome)` pair produced by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Classification {
    pub terrain: TerrainType,
    pub biome: BiomeTag,
}

impl Default for Classification {
    /// Open sea; every rule table starts from here.
    fn default() -> Self {
        Self {
            terrain: TerrainType::Water,
            biome: BiomeTag::Sea,
        }
    }
}
