//! Writing generated worlds to disk.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{RgbImage, RgbaImage};
use mapforge_terrain::GeneratedWorld;
use mapforge_terrain::debug_viz::{render_biome_debug, render_height_debug};
use tracing::{info, warn};

use crate::DemoError;

/// Decode the detail sprite. A missing or unreadable sprite is not fatal:
/// the world is generated without details.
pub fn load_sprite(path: Option<&Path>) -> Option<RgbaImage> {
    let path = path?;
    match image::open(path) {
        Ok(sprite) => {
            let sprite = sprite.to_rgba8();
            info!(
                path = %path.display(),
                width = sprite.width(),
                height = sprite.height(),
                "loaded feature sprite"
            );
            Some(sprite)
        }
        Err(e) => {
            warn!(path = %path.display(), "failed to load feature sprite: {e}");
            None
        }
    }
}

/// Nearest-neighbor upscale by an integer factor. `0` and `1` leave the image as is.
pub fn upscale(raster: &RgbImage, scale: u32) -> RgbImage {
    if scale <= 1 {
        return raster.clone();
    }
    imageops::resize(
        raster,
        raster.width().saturating_mul(scale),
        raster.height().saturating_mul(scale),
        FilterType::Nearest,
    )
}

/// `world.png` -> `world.<suffix>.png`, next to the main output.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "world".to_string());
    path.with_file_name(format!("{stem}.{suffix}.png"))
}

/// Save the raster and, if requested, the height and biome debug maps.
pub fn write_world(
    world: &GeneratedWorld,
    path: &Path,
    scale: u32,
    debug_maps: bool,
) -> Result<(), DemoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(DemoError::OutputDir)?;
    }

    upscale(&world.raster, scale).save(path)?;
    info!(path = %path.display(), scale, "wrote world image");

    if debug_maps {
        let height_path = sibling_path(path, "height");
        upscale(&render_height_debug(&world.grid), scale).save(&height_path)?;
        let biome_path = sibling_path(path, "biome");
        upscale(&render_biome_debug(&world.grid), scale).save(&biome_path)?;
        info!(
            height = %height_path.display(),
            biome = %biome_path.display(),
            "wrote debug maps"
        );
    }
    Ok(())
}
