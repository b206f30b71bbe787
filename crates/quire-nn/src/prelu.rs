//! Parametric rectified linear activation.

use quire_arena::{Arena, Vector};
use quire_core::{AllocError, Allocator};

/// PReLU activation over `outputs` channels:
/// `y[i] = max(0, z[i]) + a[i]·min(0, z[i])`.
///
/// Owns the per-channel slope `a` and the upstream gradient cache `dcdy`
/// (`∂c/∂y`). The pre-activation `z` is not owned here: it is borrowed
/// from the enclosing [`Layer`](crate::Layer) on every call.
pub struct PRelu {
    a: Vector<f64>,
    dcdy: Vector<f64>,
}

impl PRelu {
    /// Allocate an activation with every slope set to `slope` and a zeroed
    /// gradient cache.
    ///
    /// # Errors
    ///
    /// Propagates allocation failure; nothing is left allocated.
    pub fn new<A: Allocator>(
        arena: &Arena<A>,
        outputs: usize,
        slope: f64,
    ) -> Result<Self, AllocError> {
        let a = arena.vector_filled(outputs, slope)?;
        let dcdy = match arena.vector_filled(outputs, 0.0) {
            Ok(dcdy) => dcdy,
            Err(err) => {
                arena.free_vector(a);
                return Err(err);
            }
        };
        Ok(Self { a, dcdy })
    }

    /// Release both buffers back to `arena`.
    pub fn free<A: Allocator>(self, arena: &Arena<A>) {
        arena.free_vector(self.dcdy);
        arena.free_vector(self.a);
    }

    /// Number of channels.
    pub fn outputs(&self) -> usize {
        self.a.len()
    }

    /// Per-channel negative-side slopes.
    pub fn slopes(&self) -> &[f64] {
        &self.a
    }

    /// Mutable slopes.
    pub fn slopes_mut(&mut self) -> &mut [f64] {
        &mut self.a
    }

    /// Cached `∂c/∂y`.
    pub fn gradient(&self) -> &[f64] {
        &self.dcdy
    }

    /// Upstream gradient cache; write `∂c/∂y` here before backward.
    pub fn gradient_mut(&mut self) -> &mut [f64] {
        &mut self.dcdy
    }

    /// `y = max(0, z) + a·min(0, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `y` do not have one element per channel.
    pub fn forward(&self, z: &[f64], y: &mut [f64]) {
        self.check_len(z, "z");
        self.check_len(y, "y");
        for ((yi, &zi), &ai) in y.iter_mut().zip(z).zip(self.a.iter()) {
            *yi = zi.max(0.0) + ai * zi.min(0.0);
        }
    }

    /// `dcdz[i] = dcdy[i]` where `z[i] > 0`, else `dcdy[i]·a[i]`.
    ///
    /// A zero pre-activation takes the scaled branch.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `dcdz` do not have one element per channel.
    pub fn backward(&self, z: &[f64], dcdz: &mut [f64]) {
        self.check_len(z, "z");
        self.check_len(dcdz, "dcdz");
        for (i, out) in dcdz.iter_mut().enumerate() {
            *out = if z[i] > 0.0 {
                self.dcdy[i]
            } else {
                self.dcdy[i] * self.a[i]
            };
        }
    }

    /// Slope step: `a[i] -= rate·dcdy[i]·z[i]` for channels with `z[i] < 0`.
    /// Channels with `z[i] >= 0` are unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `z` does not have one element per channel.
    pub fn learn(&mut self, z: &[f64], rate: f64) {
        self.check_len(z, "z");
        let dcdy = self.dcdy.as_slice();
        for ((ai, &zi), &gi) in self.a.as_mut_slice().iter_mut().zip(z).zip(dcdy) {
            if zi < 0.0 {
                *ai -= rate * gi * zi;
            }
        }
    }

    fn check_len(&self, values: &[f64], name: &str) {
        assert_eq!(
            values.len(),
            self.a.len(),
            "prelu: {name} length does not match channel count"
        );
    }
}
