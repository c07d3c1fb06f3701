//! Debug visualizations of a generated grid.
//!
//! These images show the raw height field and the biome classification
//! without palette, jitter or shading, which makes classifier and height
//! tuning problems easy to spot.

use image::RgbImage;

use crate::biome::BiomeTag;
use crate::tile::TileGrid;

/// Grayscale height map: `-1` is black, `1` is white.
pub fn render_height_debug(grid: &TileGrid) -> RgbImage {
    RgbImage::from_fn(grid.size(), grid.size(), |x, y| {
        let value = grid
            .get(x, y)
            .map(|tile| ((tile.height.clamp(-1.0, 1.0) + 1.0) * 0.5 * 255.0).round() as u8)
            .unwrap_or(0);
        image::Rgb([value, value, value])
    })
}

/// Fixed, palette-independent color for each biome tag.
pub fn biome_color(biome: BiomeTag) -> [u8; 3] {
    match biome {
        BiomeTag::Sea => [20, 50, 180],
        BiomeTag::FrozenSea => [150, 200, 230],
        BiomeTag::Grassland => [100, 180, 60],
        BiomeTag::Savanna => [180, 170, 60],
        BiomeTag::Forest => [30, 120, 30],
        BiomeTag::Beach => [230, 210, 140],
        BiomeTag::Frozen => [235, 240, 245],
        BiomeTag::Desert => [220, 190, 80],
        BiomeTag::Plains => [120, 200, 90],
    }
}

/// One pixel per tile in its [`biome_color`].
pub fn render_biome_debug(grid: &TileGrid) -> RgbImage {
    RgbImage::from_fn(grid.size(), grid.size(), |x, y| {
        let color = grid
            .get(x, y)
            .map(|tile| biome_color(tile.biome))
            .unwrap_or([0, 0, 0]);
        image::Rgb(color)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::TerrainConfig;
    use crate::generator::generate_world;
    use crate::seed::WorldSeed;

    #[test]
    fn test_debug_images_match_grid_dimensions() {
        let world = generate_world(TerrainConfig::default(), WorldSeed(3), 20, None).unwrap();
        assert_eq!(render_height_debug(&world.grid).dimensions(), (20, 20));
        assert_eq!(render_biome_debug(&world.grid).dimensions(), (20, 20));
    }

    #[test]
    fn test_biome_colors_unique() {
        let colors: HashSet<_> = BiomeTag::ALL.iter().map(|&b| biome_color(b)).collect();
        assert_eq!(colors.len(), BiomeTag::ALL.len());
    }

    #[test]
    fn test_biome_debug_uses_tile_biome() {
        let world = generate_world(TerrainConfig::default(), WorldSeed(12), 16, None).unwrap();
        let image = render_biome_debug(&world.grid);
        for tile in world.grid.tiles() {
            assert_eq!(
                image.get_pixel(tile.position.x, tile.position.y).0,
                biome_color(tile.biome)
            );
        }
    }

    #[test]
    fn test_height_debug_is_gray() {
        let world = generate_world(TerrainConfig::default(), WorldSeed(4), 16, None).unwrap();
        let image = render_height_debug(&world.grid);
        assert!(image.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }
}
