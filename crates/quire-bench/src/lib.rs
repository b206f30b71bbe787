//! Benchmark profiles and utilities for Quire.
//!
//! - [`reference_config`]: 64 → 128 → 32 network
//! - [`stress_config`]: 256 → 512 → 512 → 64 network
//! - [`random_matrix`] / [`random_vector`]: seeded kernel operands

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use quire_arena::{Arena, Matrix};
use quire_core::{AllocError, Allocator, NormalSampler};
use quire_nn::{ChaChaNormal, NetworkConfig, NnError};

/// Reference network profile.
pub fn reference_config(seed: u64) -> Result<NetworkConfig, NnError> {
    NetworkConfig::builder()
        .widths([64, 128, 32])
        .seed(seed)
        .learning_rate(0.01)
        .build()
}

/// Stress network profile, roughly 20x the reference parameter count.
pub fn stress_config(seed: u64) -> Result<NetworkConfig, NnError> {
    NetworkConfig::builder()
        .widths([256, 512, 512, 64])
        .seed(seed)
        .learning_rate(0.01)
        .build()
}

/// `nrow x ncol` matrix of standard-normal entries.
pub fn random_matrix<A: Allocator>(
    arena: &Arena<A>,
    nrow: usize,
    ncol: usize,
    seed: u64,
) -> Result<Matrix<f64>, AllocError> {
    let mut sampler = ChaChaNormal::seed_from_u64(seed);
    let mut m = arena.matrix(nrow, ncol)?;
    for i in 0..nrow {
        for v in m.row_mut(i) {
            *v = sampler.sample();
        }
    }
    Ok(m)
}

/// `n` standard-normal values.
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut sampler = ChaChaNormal::seed_from_u64(seed);
    (0..n).map(|_| sampler.sample()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::Heap;

    #[test]
    fn profiles_are_valid() {
        assert_eq!(reference_config(1).unwrap().widths(), &[64, 128, 32]);
        assert_eq!(stress_config(1).unwrap().layer_count(), 3);
    }

    #[test]
    fn random_operands_are_seeded() {
        let arena = Arena::new(Heap);
        let a = random_matrix(&arena, 3, 4, 9).unwrap();
        let b = random_matrix(&arena, 3, 4, 9).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(random_vector(5, 2), random_vector(5, 2));
        arena.free_matrix(a, 3, 4).unwrap();
        arena.free_matrix(b, 3, 4).unwrap();
    }
}
