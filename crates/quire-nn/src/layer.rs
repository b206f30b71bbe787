//! Dense + PReLU layer.

use quire_arena::{Arena, ArenaError, Vector};
use quire_core::{AllocError, Allocator, NormalSampler};
use tracing::debug;

use crate::dense::Dense;
use crate::init::init_scale;
use crate::prelu::PRelu;

/// A [`Dense`] transform followed by a [`PRelu`] activation, `inputs → outputs`.
///
/// The layer owns the pre-activation cache `z`. [`Dense::forward`] writes
/// it and [`PRelu`] reads it; neither component holds its own copy, so the
/// two halves of one layer always operate on the same buffer.
///
/// Passes must run in the order forward, backward (which also learns), any
/// number of times: backward reads the `x` and `z` cached by the preceding
/// forward.
pub struct Layer {
    dense: Dense,
    prelu: PRelu,
    z: Vector<f64>,
}

impl Layer {
    /// Allocate and initialise a layer.
    ///
    /// With `scale = invsqrt(0.5 · inputs)`: weights are `scale · N(0, 1)`
    /// in row-major draw order, biases are zero, every slope is `scale`.
    ///
    /// # Errors
    ///
    /// Propagates allocation failure after releasing whatever was already
    /// allocated, newest first.
    pub fn new<A: Allocator, S: NormalSampler + ?Sized>(
        arena: &Arena<A>,
        inputs: usize,
        outputs: usize,
        sampler: &mut S,
    ) -> Result<Self, AllocError> {
        let z = arena.vector_filled(outputs, 0.0)?;
        let dense = match Dense::new(arena, inputs, outputs, sampler) {
            Ok(dense) => dense,
            Err(err) => {
                arena.free_vector(z);
                return Err(err);
            }
        };
        let scale = init_scale(inputs);
        let prelu = match PRelu::new(arena, outputs, scale) {
            Ok(prelu) => prelu,
            Err(err) => {
                dense.release(arena);
                arena.free_vector(z);
                return Err(err);
            }
        };
        debug!(inputs, outputs, scale, "initialised layer");
        Ok(Self { dense, prelu, z })
    }

    /// Release the activation, the dense transform and the shared cache.
    pub fn free<A: Allocator>(self, arena: &Arena<A>) -> Result<(), ArenaError> {
        self.prelu.free(arena);
        let released = self.dense.free(arena);
        arena.free_vector(self.z);
        released
    }

    /// Release everything on a cleanup path that cannot report errors.
    pub(crate) fn release<A: Allocator>(self, arena: &Arena<A>) {
        self.prelu.free(arena);
        self.dense.release(arena);
        arena.free_vector(self.z);
    }

    /// Number of inputs.
    pub fn inputs(&self) -> usize {
        self.dense.inputs()
    }

    /// Number of outputs.
    pub fn outputs(&self) -> usize {
        self.dense.outputs()
    }

    /// The dense half.
    pub fn dense(&self) -> &Dense {
        &self.dense
    }

    /// Mutable dense half.
    pub fn dense_mut(&mut self) -> &mut Dense {
        &mut self.dense
    }

    /// The activation half.
    pub fn prelu(&self) -> &PRelu {
        &self.prelu
    }

    /// Mutable activation half.
    pub fn prelu_mut(&mut self) -> &mut PRelu {
        &mut self.prelu
    }

    /// Shared pre-activation cache `z`.
    pub fn preactivation(&self) -> &[f64] {
        &self.z
    }

    /// Input cache; write `x` here before [`forward`](Self::forward).
    pub fn input_mut(&mut self) -> &mut [f64] {
        self.dense.input_mut()
    }

    /// Upstream gradient cache; write `∂c/∂y` here before
    /// [`backward`](Self::backward).
    pub fn output_grad_mut(&mut self) -> &mut [f64] {
        self.prelu.gradient_mut()
    }

    /// `z = W·x + b`, then `output = prelu(z)`.
    pub fn forward(&mut self, output: &mut [f64]) {
        self.dense.forward(&mut self.z);
        self.prelu.forward(&self.z, output);
    }

    /// Back-propagate the cached `∂c/∂y` into `dcdx` and take one gradient
    /// step of size `rate`.
    ///
    /// Order: activation backward into the dense gradient cache, activation
    /// learn, dense backward into `dcdx`, dense learn. Slopes change only
    /// after `∂c/∂z` has been computed, and weights only after `∂c/∂x`.
    pub fn backward(&mut self, dcdx: &mut [f64], rate: f64) {
        self.prelu.backward(&self.z, self.dense.gradient_mut());
        self.prelu.learn(&self.z, rate);
        self.dense.backward(dcdx);
        self.dense.learn(rate);
    }
}
