//! Seeded standard-normal sampler.
//!
//! Uses a ChaCha8 stream and the Box-Muller transform, producing identical
//! sequences for identical seeds.

use quire_core::NormalSampler;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Deterministic `N(0, 1)` sampler backed by ChaCha8.
///
/// Each draw consumes two 64-bit words and allocates nothing.
pub struct ChaChaNormal {
    rng: ChaCha8Rng,
}

impl ChaChaNormal {
    /// Create a sampler from a 64-bit seed.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl NormalSampler for ChaChaNormal {
    fn sample(&mut self) -> f64 {
        let u1: f64 = self.rng.random::<f64>().max(1e-300); // avoid ln(0)
        let u2: f64 = self.rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
