//! Seeded 3D noise source used by every generation stage.
//!
//! The third axis is not time: callers use it as a secondary parameter to pull
//! decorrelated slices out of the same field.

use noise::{NoiseFn, OpenSimplex};

use crate::seed::fold_noise_seed;

/// Deterministic, continuous noise function over `(x, y, param)`.
///
/// Output lies approximately in `[-1.0, 1.0]`. Identical `(seed, x, y, param)`
/// always produce the identical value.
#[derive(Clone, Debug)]
pub struct NoiseSource {
    seed: u64,
    noise: OpenSimplex,
}

impl NoiseSource {
    /// Create a noise source for the given world seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            noise: OpenSimplex::new(fold_noise_seed(seed)),
        }
    }

    /// Replace the underlying field. Nothing sampled before the call is cached.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.noise = OpenSimplex::new(fold_noise_seed(seed));
    }

    /// The world seed this source was last seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample the field at a non-integer position.
    #[inline]
    pub fn sample(&self, x: f64, y: f64, param: f64) -> f64 {
        self.noise.get([x, y, param])
    }
}
