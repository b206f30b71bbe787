//! Network configuration.
//!
//! Constructed via the builder pattern: [`NetworkConfig::builder`].

use smallvec::SmallVec;

use crate::error::NnError;

/// Layer widths `w0 -> w1 -> ... -> wk`, PRNG seed and learning rate for a
/// [`Network`](crate::Network).
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    widths: SmallVec<[usize; 8]>,
    seed: u64,
    learning_rate: f64,
}

/// Builder for [`NetworkConfig`].
///
/// Required field: `widths`.
#[derive(Clone, Debug)]
pub struct NetworkConfigBuilder {
    widths: SmallVec<[usize; 8]>,
    seed: u64,
    learning_rate: f64,
}

impl NetworkConfig {
    /// Create a new builder.
    pub fn builder() -> NetworkConfigBuilder {
        NetworkConfigBuilder {
            widths: SmallVec::new(),
            seed: 0,
            learning_rate: 0.01,
        }
    }

    /// Layer widths, input width first.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Number of layers (`widths().len() - 1`).
    pub fn layer_count(&self) -> usize {
        self.widths.len() - 1
    }

    /// Seed for weight initialisation.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Step size used by [`Network::train_step`](crate::Network::train_step).
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl NetworkConfigBuilder {
    /// Set the layer widths, input width first.
    pub fn widths(mut self, widths: impl IntoIterator<Item = usize>) -> Self {
        self.widths = widths.into_iter().collect();
        self
    }

    /// Set the weight-initialisation seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the learning rate (default: 0.01). Must be finite and >= 0.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::InvalidConfig`] if:
    /// - fewer than two widths are given
    /// - any width is zero
    /// - the learning rate is negative or not finite
    pub fn build(self) -> Result<NetworkConfig, NnError> {
        if self.widths.len() < 2 {
            return Err(invalid(format!(
                "need at least two widths (input and output), got {}",
                self.widths.len()
            )));
        }
        if let Some(pos) = self.widths.iter().position(|&w| w == 0) {
            return Err(invalid(format!("width {pos} is zero")));
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(invalid(format!(
                "learning rate must be finite and >= 0, got {}",
                self.learning_rate
            )));
        }
        Ok(NetworkConfig {
            widths: self.widths,
            seed: self.seed,
            learning_rate: self.learning_rate,
        })
    }
}

fn invalid(reason: String) -> NnError {
    NnError::InvalidConfig { reason }
}
