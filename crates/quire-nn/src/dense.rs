//! Affine transform `z = W·x + b`.

use quire_arena::{Arena, ArenaError, Matrix, Vector};
use quire_blas::{axpy, gemv, geru, Trans, WriteMode};
use quire_core::{AllocError, Allocator, NormalSampler};

use crate::init::init_scale;

/// A fully connected layer with `inputs` inputs and `outputs` outputs.
///
/// Owns the weights `W` (`outputs x inputs`), the bias `b`, the input cache
/// `x` and the gradient cache `dcdz` (`∂c/∂z`). Both caches are working
/// buffers rewritten on every pass.
pub struct Dense {
    w: Matrix<f64>,
    b: Vector<f64>,
    x: Vector<f64>,
    dcdz: Vector<f64>,
}

impl Dense {
    /// Allocate and initialise a dense layer.
    ///
    /// Weights are `scale · sampler.sample()` drawn in row-major order with
    /// `scale = invsqrt(0.5 · inputs)`; bias and caches start at zero.
    ///
    /// # Errors
    ///
    /// Propagates allocation failure. Buffers allocated before the failure
    /// are released in reverse order.
    pub fn new<A: Allocator, S: NormalSampler + ?Sized>(
        arena: &Arena<A>,
        inputs: usize,
        outputs: usize,
        sampler: &mut S,
    ) -> Result<Self, AllocError> {
        let mut w = arena.matrix::<f64>(outputs, inputs)?;
        let b = match arena.vector_filled(outputs, 0.0) {
            Ok(b) => b,
            Err(err) => {
                arena.release_matrix(w);
                return Err(err);
            }
        };
        let x = match arena.vector_filled(inputs, 0.0) {
            Ok(x) => x,
            Err(err) => {
                arena.free_vector(b);
                arena.release_matrix(w);
                return Err(err);
            }
        };
        let dcdz = match arena.vector_filled(outputs, 0.0) {
            Ok(dcdz) => dcdz,
            Err(err) => {
                arena.free_vector(x);
                arena.free_vector(b);
                arena.release_matrix(w);
                return Err(err);
            }
        };

        let scale = init_scale(inputs);
        for i in 0..outputs {
            for wij in w.row_mut(i) {
                *wij = scale * sampler.sample();
            }
        }

        Ok(Self { w, b, x, dcdz })
    }

    /// Release every buffer back to `arena`, in reverse allocation order.
    pub fn free<A: Allocator>(self, arena: &Arena<A>) -> Result<(), ArenaError> {
        let (outputs, inputs) = self.w.shape();
        arena.free_vector(self.dcdz);
        arena.free_vector(self.x);
        arena.free_vector(self.b);
        arena.free_matrix(self.w, outputs, inputs)
    }

    /// Release every buffer on a cleanup path that cannot report errors.
    pub(crate) fn release<A: Allocator>(self, arena: &Arena<A>) {
        arena.free_vector(self.dcdz);
        arena.free_vector(self.x);
        arena.free_vector(self.b);
        arena.release_matrix(self.w);
    }

    /// Number of inputs.
    pub fn inputs(&self) -> usize {
        self.w.ncol()
    }

    /// Number of outputs.
    pub fn outputs(&self) -> usize {
        self.w.nrow()
    }

    /// Weight matrix.
    pub fn weights(&self) -> &Matrix<f64> {
        &self.w
    }

    /// Mutable weight matrix.
    pub fn weights_mut(&mut self) -> &mut Matrix<f64> {
        &mut self.w
    }

    /// Bias vector.
    pub fn bias(&self) -> &[f64] {
        &self.b
    }

    /// Mutable bias vector.
    pub fn bias_mut(&mut self) -> &mut [f64] {
        &mut self.b
    }

    /// Cached input `x`.
    pub fn input(&self) -> &[f64] {
        &self.x
    }

    /// Input cache; write `x` here before [`forward`](Self::forward).
    pub fn input_mut(&mut self) -> &mut [f64] {
        &mut self.x
    }

    /// Cached `∂c/∂z`.
    pub fn gradient(&self) -> &[f64] {
        &self.dcdz
    }

    /// Gradient cache; holds `∂c/∂z` between backward and learn.
    pub fn gradient_mut(&mut self) -> &mut [f64] {
        &mut self.dcdz
    }

    /// `z = W·x + b` from the cached input.
    pub fn forward(&self, z: &mut [f64]) {
        gemv(
            Trans::Normal,
            1.0,
            &self.w,
            &self.x,
            1.0,
            Some(self.b.as_slice()),
            z,
        );
    }

    /// `dcdx = Wᵀ·dcdz` from the cached gradient.
    pub fn backward(&self, dcdx: &mut [f64]) {
        gemv(Trans::Transpose, 1.0, &self.w, &self.dcdz, 0.0, None, dcdx);
    }

    /// Gradient step: `b -= rate·dcdz`, `W -= rate·(dcdz ⊗ x)`.
    pub fn learn(&mut self, rate: f64) {
        axpy(-rate, &self.dcdz, &mut self.b);
        geru(WriteMode::Update, -rate, &self.dcdz, &self.x, &mut self.w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::{BudgetAllocator, Heap};
    use quire_test_utils::{row_major, CountingSampler, SequenceSampler};

    #[test]
    fn weights_drawn_row_major_and_scaled() {
        let arena = Arena::new(Heap);
        let mut sampler = CountingSampler::new();
        let dense = Dense::new(&arena, 2, 3, &mut sampler).unwrap();
        assert_eq!(sampler.draws(), 6);
        let scale = init_scale(2);
        let expected: Vec<f64> = (0..6).map(|k| scale * k as f64).collect();
        assert_eq!(row_major(dense.weights()), expected);
        assert_eq!(dense.bias(), &[0.0; 3]);
        assert_eq!(dense.input(), &[0.0; 2]);
        assert_eq!(dense.gradient(), &[0.0; 3]);
        dense.free(&arena).unwrap();
    }

    #[test]
    fn forward_is_affine() {
        let arena = Arena::new(Heap);
        let mut dense = Dense::new(&arena, 2, 2, &mut SequenceSampler::new(vec![0.0])).unwrap();
        dense.weights_mut().copy_from_row_major(&[1.0, 2.0, 3.0, 4.0]);
        dense.bias_mut().copy_from_slice(&[0.5, -0.5]);
        dense.input_mut().copy_from_slice(&[1.0, 1.0]);
        let mut z = [0.0; 2];
        dense.forward(&mut z);
        assert_eq!(z, [3.5, 6.5]);
    }

    #[test]
    fn backward_uses_transpose() {
        let arena = Arena::new(Heap);
        let mut dense = Dense::new(&arena, 2, 2, &mut SequenceSampler::new(vec![0.0])).unwrap();
        dense.weights_mut().copy_from_row_major(&[1.0, 2.0, 3.0, 4.0]);
        dense.gradient_mut().copy_from_slice(&[1.0, -1.0]);
        let mut dcdx = [f64::NAN; 2];
        dense.backward(&mut dcdx);
        assert_eq!(dcdx, [-2.0, -2.0]);
    }

    #[test]
    fn learn_steps_against_gradient() {
        let arena = Arena::new(Heap);
        let mut dense = Dense::new(&arena, 2, 1, &mut SequenceSampler::new(vec![0.0])).unwrap();
        dense.weights_mut().copy_from_row_major(&[1.0, 1.0]);
        dense.input_mut().copy_from_slice(&[2.0, -4.0]);
        dense.gradient_mut().copy_from_slice(&[0.5]);
        dense.learn(0.25);
        assert_eq!(dense.bias(), &[-0.125]);
        assert_eq!(dense.weights().row(0), &[0.75, 1.5]);
    }

    #[test]
    fn allocation_failure_releases_earlier_buffers() {
        // W for 2x3 is 3*2*8 + 3*16 = 96 bytes; b needs 24 more.
        let alloc = BudgetAllocator::new(100);
        let arena = Arena::new(&alloc);
        let result = Dense::new(&arena, 2, 3, &mut CountingSampler::new());
        assert_eq!(result.err(), Some(AllocError::OutOfMemory));
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.outstanding(), 0);
    }

    #[test]
    fn late_failure_releases_everything() {
        // W 96 + b 24 + x 16 = 136; dcdz needs 24 more.
        let alloc = BudgetAllocator::new(150);
        let arena = Arena::new(&alloc);
        let result = Dense::new(&arena, 2, 3, &mut CountingSampler::new());
        assert!(result.is_err());
        assert_eq!(alloc.allocation_count(), 3);
        assert_eq!(alloc.release_count(), 3);
        assert_eq!(alloc.live_bytes(), 0);
    }

    #[test]
    fn free_returns_all_bytes() {
        let alloc = BudgetAllocator::new(1 << 16);
        let arena = Arena::new(&alloc);
        let dense = Dense::new(&arena, 4, 5, &mut CountingSampler::new()).unwrap();
        assert_eq!(alloc.allocation_count(), 4);
        dense.free(&arena).unwrap();
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.outstanding(), 0);
    }

    #[test]
    fn release_returns_all_bytes() {
        let alloc = BudgetAllocator::new(1 << 16);
        let arena = Arena::new(&alloc);
        let dense = Dense::new(&arena, 3, 2, &mut CountingSampler::new()).unwrap();
        dense.release(&arena);
        assert_eq!(alloc.release_count(), 4);
        assert_eq!(alloc.live_bytes(), 0);
    }
}
