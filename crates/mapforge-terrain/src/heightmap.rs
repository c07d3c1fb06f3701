//! Layered height field builder.
//!
//! Samples the noise source at several fixed wavelengths and folds the layers
//! together with linear interpolation rather than summation, so the coarse
//! layers keep the overall shape and the fine layers only add local relief.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::noise_source::NoiseSource;

/// Linear interpolation: `a + t * (b - a)`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// One noise sample at a fixed spatial scale.
///
/// The cell `(x, y)` is sampled at `(x / scale_x + offset, y / scale_y + offset, param)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    /// Horizontal wavelength in cells.
    pub scale_x: f64,
    /// Vertical wavelength in cells.
    pub scale_y: f64,
    /// Third noise axis; selects a decorrelated slice of the field.
    pub param: f64,
    /// Added to both scaled coordinates.
    #[serde(default)]
    pub offset: f64,
}

impl NoiseLayer {
    /// A layer with independent horizontal and vertical wavelengths.
    pub const fn new(scale_x: f64, scale_y: f64, param: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            param,
            offset: 0.0,
        }
    }

    /// A layer with the same wavelength on both axes.
    pub const fn square(scale: f64, param: f64) -> Self {
        Self::new(scale, scale, param)
    }

    /// Shift the sample position by `offset` on both axes.
    pub const fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Sample this layer for cell `(x, y)`.
    #[inline]
    pub fn sample(&self, noise: &NoiseSource, x: u32, y: u32) -> f64 {
        noise.sample(
            x as f64 / self.scale_x + self.offset,
            y as f64 / self.scale_y + self.offset,
            self.param,
        )
    }

    pub(crate) fn validate(&self) -> Result<(), TerrainError> {
        for scale in [self.scale_x, self.scale_y] {
            if !scale.is_finite() || scale == 0.0 {
                return Err(TerrainError::NoiseScale { scale });
            }
        }
        require_finite("param", self.param)?;
        require_finite("offset", self.offset)
    }
}

/// How a layer is folded into the accumulated height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayerBlend {
    /// `acc = lerp(acc, layer, weight)`.
    Lerp { layer: NoiseLayer, weight: f64 },
    /// `acc = lerp(layer, acc, weight)`: the layer is the base and the
    /// accumulated value is pulled in with `weight`.
    LerpOnto { layer: NoiseLayer, weight: f64 },
    /// `acc = clamp(acc + layer, -1, 1)`. Gives sharper features than lerp.
    AddClamped { layer: NoiseLayer },
}

impl LayerBlend {
    fn layer(&self) -> &NoiseLayer {
        match self {
            Self::Lerp { layer, .. } | Self::LerpOnto { layer, .. } | Self::AddClamped { layer } => {
                layer
            }
        }
    }

    fn validate(&self) -> Result<(), TerrainError> {
        self.layer().validate()?;
        match *self {
            Self::Lerp { weight, .. } | Self::LerpOnto { weight, .. } => {
                require_finite("weight", weight)
            }
            Self::AddClamped { .. } => Ok(()),
        }
    }

    #[inline]
    fn apply(&self, acc: f64, sample: f64) -> f64 {
        match *self {
            Self::Lerp { weight, .. } => lerp(acc, sample, weight),
            Self::LerpOnto { weight, .. } => lerp(sample, acc, weight),
            Self::AddClamped { .. } => (acc + sample).clamp(-1.0, 1.0),
        }
    }
}

/// Layer stack and optional terracing for the height field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightParams {
    /// First layer; seeds the accumulator.
    pub base: NoiseLayer,
    /// Applied in order after `base`.
    pub blends: Vec<LayerBlend>,
    /// Snap heights to multiples of `1 / max_height_band` for stepped terrain.
    #[serde(default)]
    pub max_height_band: Option<u32>,
}

impl Default for HeightParams {
    /// Continents at 64-128 cells, relief at 16-24, detail at 8.
    fn default() -> Self {
        Self {
            base: NoiseLayer::square(24.0, 1.0),
            blends: vec![
                LayerBlend::Lerp {
                    layer: NoiseLayer::square(8.0, 0.5),
                    weight: 0.5,
                },
                LayerBlend::Lerp {
                    layer: NoiseLayer::square(16.0, 1.0),
                    weight: 0.5,
                },
                LayerBlend::AddClamped {
                    layer: NoiseLayer::square(64.0, 0.0),
                },
                LayerBlend::LerpOnto {
                    layer: NoiseLayer::new(128.0, 24.0, 0.0),
                    weight: 0.8,
                },
            ],
            max_height_band: None,
        }
    }
}

impl HeightParams {
    /// The default layer stack quantized into `bands` steps.
    pub fn terraced(bands: u32) -> Self {
        Self {
            max_height_band: Some(bands),
            ..Self::default()
        }
    }

    /// Check scales, weights and the band count.
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.base.validate()?;
        for blend in &self.blends {
            blend.validate()?;
        }
        if self.max_height_band == Some(0) {
            return Err(TerrainError::HeightBands);
        }
        Ok(())
    }
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<(), TerrainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::NonFinite { field, value })
    }
}

/// Snap `height` to the nearest multiple of `1 / bands`.
#[inline]
pub fn quantize(height: f64, bands: u32) -> f64 {
    let step = 1.0 / bands as f64;
    step * (height / step).round()
}

/// Computes the height of a single cell from the layer stack.
#[derive(Clone, Debug)]
pub struct HeightFieldBuilder {
    params: HeightParams,
}

impl HeightFieldBuilder {
    pub fn new(params: HeightParams) -> Self {
        Self { params }
    }

    /// Height of cell `(x, y)`; roughly in `[-1, 1]`.
    pub fn height_at(&self, noise: &NoiseSource, x: u32, y: u32) -> f64 {
        let mut acc = self.params.base.sample(noise, x, y);
        for blend in &self.params.blends {
            acc = blend.apply(acc, blend.layer().sample(noise, x, y));
        }
        match self.params.max_height_band {
            Some(bands) => quantize(acc, bands),
            None => acc,
        }
    }

    pub fn params(&self) -> &HeightParams {
        &self.params
    }
}
