//! Biome flag sampler: boolean desert/snow/savanna/forest fields.
//!
//! Each flag reads its own offset slice of the noise source, pulls it 20%
//! towards the cell height and thresholds the result. Offsets keep the four
//! fields decorrelated.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::heightmap::{NoiseLayer, lerp, require_finite};
use crate::noise_source::NoiseSource;

/// Auxiliary biome flags consulted by the rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiomeFlag {
    Desert,
    Snow,
    Savanna,
    Forest,
}

/// One thresholded noise field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlagField {
    pub layer: NoiseLayer,
    /// Weight of the cell height in the blend; `0.2` means 80% noise, 20% height.
    pub height_blend: f64,
    /// The flag is set when the blended value is strictly above this.
    pub threshold: f64,
}

impl FlagField {
    /// Evaluate the flag for cell `(x, y)` with the given height.
    pub fn is_set(&self, noise: &NoiseSource, x: u32, y: u32, height: f64) -> bool {
        lerp(self.layer.sample(noise, x, y), height, self.height_blend) > self.threshold
    }
}

/// Which flags are enabled, and how each is sampled. `None` disables a flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeFlagConfig {
    pub desert: Option<FlagField>,
    pub snow: Option<FlagField>,
    pub savanna: Option<FlagField>,
    pub forest: Option<FlagField>,
}

impl Default for BiomeFlagConfig {
    fn default() -> Self {
        Self {
            desert: Some(FlagField {
                layer: NoiseLayer::square(64.0, 0.5),
                height_blend: 0.2,
                threshold: 0.5,
            }),
            snow: Some(FlagField {
                layer: NoiseLayer::square(64.0, 0.5).with_offset(10.0),
                height_blend: 0.2,
                threshold: 0.5,
            }),
            savanna: Some(FlagField {
                layer: NoiseLayer::square(64.0, 0.5).with_offset(20.0),
                height_blend: 0.2,
                threshold: 0.5,
            }),
            forest: Some(FlagField {
                layer: NoiseLayer::square(48.0, 1.0).with_offset(20.0),
                height_blend: 0.2,
                threshold: 0.4,
            }),
        }
    }
}

impl BiomeFlagConfig {
    /// No auxiliary flags: the classifier degenerates to plain height bands.
    pub fn disabled() -> Self {
        Self {
            desert: None,
            snow: None,
            savanna: None,
            forest: None,
        }
    }

    /// Returns `true` if at least one flag is enabled.
    pub fn any_enabled(&self) -> bool {
        self.fields().any(|(_, field)| field.is_some())
    }

    pub fn field(&self, flag: BiomeFlag) -> Option<&FlagField> {
        match flag {
            BiomeFlag::Desert => self.desert.as_ref(),
            BiomeFlag::Snow => self.snow.as_ref(),
            BiomeFlag::Savanna => self.savanna.as_ref(),
            BiomeFlag::Forest => self.forest.as_ref(),
        }
    }

    fn fields(&self) -> impl Iterator<Item = (BiomeFlag, Option<&FlagField>)> {
        [
            BiomeFlag::Desert,
            BiomeFlag::Snow,
            BiomeFlag::Savanna,
            BiomeFlag::Forest,
        ]
        .into_iter()
        .map(|flag| (flag, self.field(flag)))
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        for (_, field) in self.fields() {
            if let Some(field) = field {
                field.layer.validate()?;
                require_finite("height_blend", field.height_blend)?;
                require_finite("threshold", field.threshold)?;
            }
        }
        Ok(())
    }
}

/// Evaluated flags for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BiomeFlags {
    pub desert: bool,
    pub snow: bool,
    pub savanna: bool,
    pub forest: bool,
}

impl BiomeFlags {
    pub fn get(&self, flag: BiomeFlag) -> bool {
        match flag {
            BiomeFlag::Desert => self.desert,
            BiomeFlag::Snow => self.snow,
            BiomeFlag::Savanna => self.savanna,
            BiomeFlag::Forest => self.forest,
        }
    }

    /// Builder-style setter, handy for hand-made classifier inputs.
    pub fn with(mut self, flag: BiomeFlag) -> Self {
        match flag {
            BiomeFlag::Desert => self.desert = true,
            BiomeFlag::Snow => self.snow = true,
            BiomeFlag::Savanna => self.savanna = true,
            BiomeFlag::Forest => self.forest = true,
        }
        self
    }
}

/// Samples [`BiomeFlags`] for cells of the grid.
#[derive(Clone, Debug)]
pub struct BiomeSampler {
    config: BiomeFlagConfig,
}

impl BiomeSampler {
    pub fn new(config: BiomeFlagConfig) -> Self {
        Self { config }
    }

    /// Sample every enabled flag at `(x, y)`. Disabled flags are `false`
    /// and cost no noise evaluation.
    pub fn sample(&self, noise: &NoiseSource, x: u32, y: u32, height: f64) -> BiomeFlags {
        let eval = |field: &Option<FlagField>| {
            field
                .as_ref()
                .is_some_and(|f| f.is_set(noise, x, y, height))
        };
        BiomeFlags {
            desert: eval(&self.config.desert),
            snow: eval(&self.config.snow),
            savanna: eval(&self.config.savanna),
            forest: eval(&self.config.forest),
        }
    }

    pub fn config(&self) -> &BiomeFlagConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_flags_never_set() {
        let sampler = BiomeSampler::new(BiomeFlagConfig::disabled());
        let noise = NoiseSource::new(42);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(sampler.sample(&noise, x, y, 0.9), BiomeFlags::default());
            }
        }
        assert!(!BiomeFlagConfig::disabled().any_enabled());
        assert!(BiomeFlagConfig::default().any_enabled());
    }

    #[test]
    fn test_flag_threshold_is_strict() {
        // With height_blend = 1 the noise sample cancels out exactly.
        let field = FlagField {
            layer: NoiseLayer::square(64.0, 0.5),
            height_blend: 1.0,
            threshold: 0.0,
        };
        let noise = NoiseSource::new(1);
        assert!(!field.is_set(&noise, 3, 3, 0.0));
        assert!(field.is_set(&noise, 3, 3, 0.25));
    }

    #[test]
    fn test_flag_fields_are_decorrelated() {
        let config = BiomeFlagConfig::default();
        let (Some(desert), Some(snow)) = (config.desert, config.snow) else {
            panic!("default config enables desert and snow");
        };
        let noise = NoiseSource::new(77);
        let differs = (0..64).any(|i| {
            (desert.layer.sample(&noise, i, i) - snow.layer.sample(&noise, i, i)).abs() > 1e-9
        });
        assert!(differs, "Offset flag fields should not sample identical noise");
    }

    #[test]
    fn test_sampling_deterministic() {
        let sampler = BiomeSampler::new(BiomeFlagConfig::default());
        let a = NoiseSource::new(5);
        let b = NoiseSource::new(5);
        for i in 0..200 {
            assert_eq!(
                sampler.sample(&a, i, i / 2, 0.3),
                sampler.sample(&b, i, i / 2, 0.3)
            );
        }
    }

    #[test]
    fn test_flags_builder() {
        let flags = BiomeFlags::default()
            .with(BiomeFlag::Snow)
            .with(BiomeFlag::Forest);
        assert!(flags.get(BiomeFlag::Snow));
        assert!(flags.get(BiomeFlag::Forest));
        assert!(!flags.get(BiomeFlag::Desert));
        assert!(!flags.get(BiomeFlag::Savanna));
    }

    #[test]
    fn test_non_finite_flag_parameters_rejected() {
        let mut config = BiomeFlagConfig::default();
        if let Some(desert) = config.desert.as_mut() {
            desert.height_blend = f64::NAN;
        }
        assert!(matches!(
            config.validate(),
            Err(TerrainError::NonFinite { field: "height_blend", .. })
        ));

        let mut config = BiomeFlagConfig::default();
        if let Some(forest) = config.forest.as_mut() {
            forest.threshold = f64::INFINITY;
        }
        assert!(matches!(
            config.validate(),
            Err(TerrainError::NonFinite { field: "threshold", .. })
        ));

        assert!(BiomeFlagConfig::default().validate().is_ok());
    }
}
