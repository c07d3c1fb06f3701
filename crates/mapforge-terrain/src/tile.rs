//! Generated tiles and the grid that owns them.

use glam::UVec2;

use crate::biome::{BiomeTag, TerrainType};

/// One generated cell. Built once by the generation pass and never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub position: UVec2,
    /// Normalized height, roughly in `[-1, 1]`.
    pub height: f64,
    pub terrain: TerrainType,
    pub biome: BiomeTag,
    /// Final composited display color.
    pub color: [u8; 3],
    /// Multiplier that was applied to the palette color.
    pub brightness: f64,
}

/// Square, row-major grid of tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    size: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Wrap a complete row-major tile vector.
    ///
    /// Only the generator builds grids, and it always pushes `size * size` tiles.
    pub(crate) fn from_tiles(size: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), size as usize * size as usize);
        Self { size, tiles }
    }

    /// Width and height in cells.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of tiles (`size * size`).
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Bounds-checked lookup.
    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.tiles.get(index(self.size, x, y))
    }

    /// The tile at `(x, y - 1)`, or `None` on the top row.
    pub fn up_neighbor(&self, x: u32, y: u32) -> Option<&Tile> {
        y.checked_sub(1).and_then(|up| self.get(x, up))
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks_exact(self.size.max(1) as usize)
    }
}

/// Row-major index of `(x, y)` in a grid of `size` columns.
#[inline]
pub(crate) fn index(size: u32, x: u32, y: u32) -> usize {
    y as usize * size as usize + x as usize
}
