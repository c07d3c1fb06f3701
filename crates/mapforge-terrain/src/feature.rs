//! Detail placement: sparse site selection on grass and sprite stamping.
//!
//! Sites are picked during the main pass, one RNG draw per grass tile, and
//! must be far enough from the *last* accepted site only. This is not a
//! minimum-distance packing; it depends on row-major visiting order.

use glam::UVec2;
use image::{RgbImage, RgbaImage};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biome::TerrainType;
use crate::error::TerrainError;
use crate::tile::TileGrid;

/// Detail placement parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// A grass tile becomes a candidate when its draw is strictly above this.
    pub density: f64,
    /// A candidate is accepted when `|dx|` or `|dy|` to the last site exceeds this.
    pub min_spacing: u32,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            density: 0.95,
            min_spacing: 5,
        }
    }
}

impl DetailConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(0.0..=1.0).contains(&self.density) {
            return Err(TerrainError::Density(self.density));
        }
        Ok(())
    }
}

/// Collects detail sites during the main generation pass.
#[derive(Clone, Debug)]
pub struct SitePicker {
    config: DetailConfig,
    sites: Vec<UVec2>,
}

impl SitePicker {
    pub fn new(config: DetailConfig) -> Self {
        Self {
            config,
            sites: Vec::new(),
        }
    }

    /// The point new candidates are measured against. Before the first
    /// acceptance this is the grid origin.
    pub fn last_site(&self) -> UVec2 {
        self.sites.last().copied().unwrap_or(UVec2::ZERO)
    }

    /// Offer a grass tile. Always consumes exactly one RNG draw.
    ///
    /// Returns `true` if the position was recorded as a site.
    pub fn consider(&mut self, rng: &mut impl Rng, position: UVec2) -> bool {
        let chance = rng.random::<f64>();
        if chance <= self.config.density {
            return false;
        }
        if spaced_apart(self.last_site(), position, self.config.min_spacing) {
            self.sites.push(position);
            true
        } else {
            false
        }
    }

    pub fn sites(&self) -> &[UVec2] {
        &self.sites
    }

    pub fn into_sites(self) -> Vec<UVec2> {
        self.sites
    }
}

/// `true` if `a` and `b` differ by more than `min_spacing` on either axis.
#[inline]
pub fn spaced_apart(a: UVec2, b: UVec2, min_spacing: u32) -> bool {
    a.x.abs_diff(b.x) > min_spacing || a.y.abs_diff(b.y) > min_spacing
}

/// `src / 255 * tint` per channel, truncated.
#[inline]
fn tint_pixel(src: [u8; 3], tint: [u8; 3]) -> [u8; 3] {
    [0, 1, 2].map(|i| (src[i] as f32 / 255.0 * tint[i] as f32).clamp(0.0, 255.0) as u8)
}

/// Stamp `sprite` centered on every site that is still grass.
///
/// Fully transparent sprite pixels are skipped; alpha is otherwise ignored
/// (no blending). Pixels falling outside the raster are clipped. Only the
/// raster is modified. Returns the number of sites stamped.
pub fn stamp_features(
    raster: &mut RgbImage,
    grid: &TileGrid,
    sites: &[UVec2],
    sprite: &RgbaImage,
    tint: [u8; 3],
) -> usize {
    let (raster_w, raster_h) = raster.dimensions();
    let half_w = (sprite.width() / 2) as i64;
    let half_h = (sprite.height() / 2) as i64;
    let mut stamped = 0;

    for site in sites {
        let still_grass = grid
            .get(site.x, site.y)
            .is_some_and(|tile| tile.terrain == TerrainType::Grass);
        if !still_grass {
            continue;
        }

        for (sx, sy, pixel) in sprite.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            let dx = site.x as i64 + sx as i64 - half_w;
            let dy = site.y as i64 + sy as i64 - half_h;
            if dx < 0 || dy < 0 || dx >= raster_w as i64 || dy >= raster_h as i64 {
                continue;
            }
            raster.put_pixel(dx as u32, dy as u32, image::Rgb(tint_pixel([r, g, b], tint)));
        }
        stamped += 1;
    }

    stamped
}
