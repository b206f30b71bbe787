//! Test utilities and mock types for Quire development.
//!
//! Provides deterministic [`NormalSampler`] mocks, matrix helpers, and the
//! golden dense-layer scenario in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use quire_arena::{Arena, Matrix};
use quire_core::{Allocator, Element, NormalSampler};

/// Mock [`NormalSampler`] that replays a fixed sequence, cycling when it
/// runs out.
pub struct SequenceSampler {
    values: Vec<f64>,
    next: usize,
}

impl SequenceSampler {
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(
            !values.is_empty(),
            "SequenceSampler needs at least one value"
        );
        Self { values, next: 0 }
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl NormalSampler for SequenceSampler {
    fn sample(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

/// Mock [`NormalSampler`] returning `0.0, 1.0, 2.0, ...`, so the draw
/// order of a consumer can be read back from the values it stored.
#[derive(Default)]
pub struct CountingSampler {
    draws: usize,
}

impl CountingSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl NormalSampler for CountingSampler {
    fn sample(&mut self) -> f64 {
        let v = self.draws as f64;
        self.draws += 1;
        v
    }
}

/// Allocate the transpose of `m`.
pub fn transposed<T: Element, A: Allocator>(arena: &Arena<A>, m: &Matrix<T>) -> Matrix<T> {
    let mut t = arena
        .matrix(m.ncol(), m.nrow())
        .expect("allocate transposed matrix");
    for i in 0..m.nrow() {
        for j in 0..m.ncol() {
            t.set(j, i, m.get(i, j));
        }
    }
    t
}

/// Flatten a matrix into row-major order.
pub fn row_major<T: Element>(m: &Matrix<T>) -> Vec<T> {
    m.rows().flat_map(|row| row.iter().copied()).collect()
}

/// Bit patterns of `values`, for exact floating-point comparisons.
pub fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}
