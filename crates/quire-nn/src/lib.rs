//! Dense + PReLU network layers with hand-derived gradients.
//!
//! A [`Layer`] is a [`Dense`] affine transform `z = W·x + b` followed by a
//! [`PRelu`] activation `y = max(0, z) + a·min(0, z)` with a learned
//! per-channel slope `a`. Each layer supports three passes:
//!
//! - **forward**: `x → z → y`, caching `x` and `z`;
//! - **backward**: from the upstream gradient `∂c/∂y`, produce `∂c/∂x` and
//!   update `a`, `W` and `b` by plain gradient descent;
//! - **learn**: the per-component update step, run by backward.
//!
//! The pre-activation cache `z` is owned by the [`Layer`]. `Dense` writes
//! it and `PRelu` reads it through borrowed slices, so both sides always
//! see the same physical buffer.
//!
//! All storage comes from a [`quire_arena::Arena`]; components are released
//! with an explicit `free(arena)` call.
//!
//! Weights are initialised as `scale · N(0, 1)` with
//! `scale = invsqrt(0.5 · inputs)` (see [`invsqrt`](init::invsqrt)); slopes
//! start at `scale` and biases at zero.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod cost;
pub mod dense;
pub mod error;
pub mod init;
pub mod layer;
pub mod network;
pub mod prelu;
pub mod prng;

pub use config::{NetworkConfig, NetworkConfigBuilder};
pub use dense::Dense;
pub use error::NnError;
pub use init::{init_scale, invsqrt};
pub use layer::Layer;
pub use network::Network;
pub use prelu::PRelu;
pub use prng::ChaChaNormal;
