//! A stack of layers trained with squared-error cost.

use quire_arena::{Arena, Vector};
use quire_core::{Allocator, NormalSampler};
use tracing::{debug, trace};

use crate::config::NetworkConfig;
use crate::cost::{squared_error, squared_error_grad};
use crate::error::NnError;
use crate::layer::Layer;
use crate::prng::ChaChaNormal;

/// Layers of widths `w0 -> w1 -> ... -> wk`.
///
/// Layer `i`'s output is written straight into layer `i + 1`'s input
/// cache, and its `∂c/∂x` straight into layer `i - 1`'s upstream gradient
/// cache; no intermediate copies are made.
pub struct Network {
    layers: Vec<Layer>,
    output: Vector<f64>,
    dcdx: Vector<f64>,
    learning_rate: f64,
}

impl Network {
    /// Build a network with weights drawn from a [`ChaChaNormal`] seeded
    /// with `config.seed()`.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::Alloc`] if any buffer cannot be allocated; every
    /// layer built so far is released first, newest first.
    pub fn new<A: Allocator>(arena: &Arena<A>, config: &NetworkConfig) -> Result<Self, NnError> {
        let mut sampler = ChaChaNormal::seed_from_u64(config.seed());
        Self::with_sampler(arena, config, &mut sampler)
    }

    /// Build a network drawing initial weights from `sampler`, layer by
    /// layer in input-to-output order.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn with_sampler<A: Allocator, S: NormalSampler + ?Sized>(
        arena: &Arena<A>,
        config: &NetworkConfig,
        sampler: &mut S,
    ) -> Result<Self, NnError> {
        let widths = config.widths();
        let mut layers = Vec::with_capacity(config.layer_count());
        for pair in widths.windows(2) {
            match Layer::new(arena, pair[0], pair[1], sampler) {
                Ok(layer) => layers.push(layer),
                Err(err) => {
                    release_layers(arena, layers);
                    return Err(err.into());
                }
            }
        }

        let outputs = widths[widths.len() - 1];
        let output = match arena.vector_filled(outputs, 0.0) {
            Ok(v) => v,
            Err(err) => {
                release_layers(arena, layers);
                return Err(err.into());
            }
        };
        let dcdx = match arena.vector_filled(widths[0], 0.0) {
            Ok(v) => v,
            Err(err) => {
                arena.free_vector(output);
                release_layers(arena, layers);
                return Err(err.into());
            }
        };

        debug!(
            layers = layers.len(),
            inputs = widths[0],
            outputs,
            seed = config.seed(),
            "initialised network"
        );
        Ok(Self {
            layers,
            output,
            dcdx,
            learning_rate: config.learning_rate(),
        })
    }

    /// Release every layer and the boundary buffers.
    ///
    /// # Errors
    ///
    /// Returns the first release error; the remaining buffers are still
    /// released.
    pub fn free<A: Allocator>(self, arena: &Arena<A>) -> Result<(), NnError> {
        arena.free_vector(self.dcdx);
        arena.free_vector(self.output);
        let mut first = Ok(());
        for layer in self.layers.into_iter().rev() {
            let released = layer.free(arena);
            if first.is_ok() {
                first = released;
            }
        }
        Ok(first?)
    }

    /// The layers, input side first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to the layers.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Input width.
    pub fn inputs(&self) -> usize {
        self.dcdx.len()
    }

    /// Output width.
    pub fn outputs(&self) -> usize {
        self.output.len()
    }

    /// Learning rate used by [`train_step`](Self::train_step).
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Output of the most recent forward pass.
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// `∂c/∂x` of the network input from the most recent backward pass.
    pub fn input_grad(&self) -> &[f64] {
        &self.dcdx
    }

    /// Upstream gradient cache of the last layer; write `∂c/∂y` here before
    /// [`backward`](Self::backward).
    pub fn output_grad_mut(&mut self) -> &mut [f64] {
        match self.layers.last_mut() {
            Some(last) => last.output_grad_mut(),
            None => &mut [],
        }
    }

    /// Run every layer on `input` and return the network output.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from the input width.
    pub fn forward(&mut self, input: &[f64]) -> &[f64] {
        assert_eq!(
            input.len(),
            self.inputs(),
            "network: input length does not match input width"
        );
        let count = self.layers.len();
        if let Some(first) = self.layers.first_mut() {
            first.input_mut().copy_from_slice(input);
        }
        for i in 0..count {
            if i + 1 < count {
                let (head, tail) = self.layers.split_at_mut(i + 1);
                head[i].forward(tail[0].input_mut());
            } else {
                self.layers[i].forward(&mut self.output);
            }
        }
        &self.output
    }

    /// Back-propagate the gradient previously written through
    /// [`output_grad_mut`](Self::output_grad_mut), updating every layer
    /// with step `rate`. Layers are visited output side first.
    pub fn backward(&mut self, rate: f64) {
        for i in (0..self.layers.len()).rev() {
            if i > 0 {
                let (head, tail) = self.layers.split_at_mut(i);
                tail[0].backward(head[i - 1].output_grad_mut(), rate);
            } else {
                self.layers[0].backward(&mut self.dcdx, rate);
            }
        }
    }

    /// One gradient-descent step on a single sample; returns the
    /// squared-error loss measured before the update.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `target` have the wrong length.
    pub fn train_step(&mut self, input: &[f64], target: &[f64]) -> f64 {
        self.forward(input);
        let loss = squared_error(&self.output, target);
        if let Some(last) = self.layers.last_mut() {
            squared_error_grad(&self.output, target, last.output_grad_mut());
        }
        self.backward(self.learning_rate);
        trace!(loss, "train step");
        loss
    }
}

fn release_layers<A: Allocator>(arena: &Arena<A>, layers: Vec<Layer>) {
    for layer in layers.into_iter().rev() {
        layer.release(arena);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::{BudgetAllocator, Heap};
    use quire_test_utils::SequenceSampler;

    fn config(widths: &[usize]) -> NetworkConfig {
        NetworkConfig::builder()
            .widths(widths.iter().copied())
            .seed(7)
            .learning_rate(0.05)
            .build()
            .unwrap()
    }

    #[test]
    fn shapes_follow_widths() {
        let arena = Arena::new(Heap);
        let net = Network::new(&arena, &config(&[4, 3, 2])).unwrap();
        assert_eq!(net.layers().len(), 2);
        assert_eq!(
            (net.layers()[0].inputs(), net.layers()[0].outputs()),
            (4, 3)
        );
        assert_eq!(
            (net.layers()[1].inputs(), net.layers()[1].outputs()),
            (3, 2)
        );
        assert_eq!((net.inputs(), net.outputs()), (4, 2));
        net.free(&arena).unwrap();
    }

    #[test]
    fn forward_chains_layers() {
        let arena = Arena::new(Heap);
        let mut net = Network::with_sampler(
            &arena,
            &config(&[1, 1, 1]),
            &mut SequenceSampler::new(vec![0.0]),
        )
        .unwrap();
        net.layers_mut()[0].dense_mut().weights_mut().set(0, 0, 2.0);
        net.layers_mut()[1].dense_mut().weights_mut().set(0, 0, 3.0);
        let y = net.forward(&[1.5]).to_vec();
        assert_eq!(net.layers()[1].dense().input(), &[3.0]);
        assert_eq!(y, [9.0]);
    }

    #[test]
    fn backward_chains_gradients() {
        let arena = Arena::new(Heap);
        let mut net = Network::with_sampler(
            &arena,
            &config(&[1, 1, 1]),
            &mut SequenceSampler::new(vec![0.0]),
        )
        .unwrap();
        net.layers_mut()[0].dense_mut().weights_mut().set(0, 0, 2.0);
        net.layers_mut()[1].dense_mut().weights_mut().set(0, 0, 3.0);
        net.forward(&[1.0]);
        net.output_grad_mut()[0] = 1.0;
        net.backward(0.0);
        // both pre-activations positive: dcdx = 3 * 2
        assert_eq!(net.input_grad(), &[6.0]);
        assert_eq!(net.layers()[0].prelu().gradient(), &[3.0]);
    }

    #[test]
    fn same_seed_same_weights() {
        let arena = Arena::new(Heap);
        let a = Network::new(&arena, &config(&[3, 4, 2])).unwrap();
        let b = Network::new(&arena, &config(&[3, 4, 2])).unwrap();
        for (la, lb) in a.layers().iter().zip(b.layers()) {
            assert_eq!(
                la.dense().weights().as_bytes(),
                lb.dense().weights().as_bytes()
            );
        }
        a.free(&arena).unwrap();
        b.free(&arena).unwrap();
    }

    #[test]
    fn training_reduces_loss() {
        let arena = Arena::new(Heap);
        let mut net = Network::new(&arena, &config(&[3, 5, 2])).unwrap();
        let input = [0.5, -0.25, 1.0];
        let target = [0.3, -0.2];
        let first = net.train_step(&input, &target);
        let mut last = first;
        for _ in 0..200 {
            last = net.train_step(&input, &target);
        }
        assert!(last < first, "loss went from {first} to {last}");
        net.free(&arena).unwrap();
    }

    #[test]
    fn zero_rate_leaves_parameters_untouched() {
        let arena = Arena::new(Heap);
        let cfg = NetworkConfig::builder()
            .widths([2, 3, 1])
            .learning_rate(0.0)
            .build()
            .unwrap();
        let mut net = Network::new(&arena, &cfg).unwrap();
        let before = net.forward(&[0.1, 0.2]).to_vec();
        net.train_step(&[0.1, 0.2], &[1.0]);
        let after = net.forward(&[0.1, 0.2]).to_vec();
        assert_eq!(before, after);
        net.free(&arena).unwrap();
    }

    #[test]
    fn construction_failure_releases_everything() {
        for capacity in [0, 200, 400, 600, 800] {
            let alloc = BudgetAllocator::new(capacity);
            let arena = Arena::new(&alloc);
            let result = Network::new(&arena, &config(&[4, 6, 3]));
            assert!(
                matches!(result, Err(NnError::Alloc(_))),
                "capacity {capacity}"
            );
            assert_eq!(alloc.live_bytes(), 0, "capacity {capacity}");
            assert_eq!(alloc.outstanding(), 0, "capacity {capacity}");
        }
    }

    #[test]
    fn free_balances_allocations() {
        let alloc = BudgetAllocator::new(1 << 20);
        let arena = Arena::new(&alloc);
        let net = Network::new(&arena, &config(&[4, 6, 3])).unwrap();
        assert_eq!(alloc.allocation_count(), 2 * 7 + 2);
        net.free(&arena).unwrap();
        assert_eq!(alloc.outstanding(), 0);
    }
}
