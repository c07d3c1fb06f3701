//! Terrain generation error types.

/// Errors raised while validating a terrain configuration or running a
/// background generation.
///
/// Once a configuration passes validation, generation itself is total.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Height thresholds are not strictly ordered
    /// (`sea_level < sea_level + sand_reach < stone_level < snow_level`).
    #[error(
        "height thresholds out of order: sea {sea_level}, beach limit {beach_limit}, \
         stone {stone_level}, snow {snow_level}"
    )]
    ThresholdOrder {
        sea_level: f64,
        beach_limit: f64,
        stone_level: f64,
        snow_level: f64,
    },

    /// The brightness floor must stay clear of 1 or rejection sampling never ends.
    #[error("brightness floor {0} is out of range")]
    BrightnessFloor(f64),

    /// A neighbor-shading multiplier is on the wrong side of 1.
    #[error("shading multiplier `{name}` has invalid value {value}")]
    ShadingMultiplier { name: &'static str, value: f64 },

    /// Feature density is a probability threshold.
    #[error("feature density {0} must be in [0, 1]")]
    Density(f64),

    /// A noise layer wavelength is zero or not finite.
    #[error("noise layer scale {scale} must be finite and non-zero")]
    NoiseScale { scale: f64 },

    /// A layer weight, offset or flag parameter is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// Terracing with zero bands is undefined.
    #[error("max height band must be at least 1")]
    HeightBands,

    /// The requested grid is empty or too large.
    #[error("grid size {size} must be in 1..={max}")]
    GridSize { size: u32, max: u32 },

    /// The background worker thread could not be started.
    #[error("failed to spawn generation worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The background worker exited without delivering a world.
    #[error("generation worker exited without a result: {0}")]
    WorkerLost(String),
}
