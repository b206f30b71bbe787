//! Quire: arena-backed dense linear algebra with a minimal Dense + PReLU
//! network layer.
//!
//! This is the facade crate re-exporting the public API of every Quire
//! sub-crate. Adding `quire` as a single dependency is usually enough.
//!
//! # Quick start
//!
//! ```rust
//! use quire::prelude::*;
//!
//! let arena = Arena::new(Heap);
//!
//! // z = A·x + y with a 2x3 matrix living in a single buffer.
//! let a = arena.matrix_from(2, 3, &[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! let mut z = [0.0; 2];
//! gemv(
//!     Trans::Normal,
//!     1.0,
//!     &a,
//!     &[1.0, 0.0, -1.0],
//!     1.0,
//!     Some(&[0.5, 0.5][..]),
//!     &mut z,
//! );
//! assert_eq!(z, [-1.5, -1.5]);
//! arena.free_matrix(a, 2, 3).unwrap();
//!
//! // A 2 -> 4 -> 1 network trained on one sample.
//! let config = NetworkConfig::builder()
//!     .widths([2, 4, 1])
//!     .seed(42)
//!     .learning_rate(0.05)
//!     .build()
//!     .unwrap();
//! let mut net = Network::new(&arena, &config).unwrap();
//! let first = net.train_step(&[0.5, -0.5], &[0.25]);
//! let mut loss = first;
//! for _ in 0..50 {
//!     loss = net.train_step(&[0.5, -0.5], &[0.25]);
//! }
//! assert!(loss <= first);
//! net.free(&arena).unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `quire-core` | `Element`, `Allocator`, `Buffer`, `AllocError`, `NormalSampler` |
//! | [`arena`] | `quire-arena` | `Arena`, `Vector`, `Matrix`, the sub-allocator |
//! | [`blas`] | `quire-blas` | `copy`, `elementwise_mul`, `axpy`, `scal`, `dot`, `gemv`, `geru` |
//! | [`nn`] | `quire-nn` | `Dense`, `PRelu`, `Layer`, `Network`, `invsqrt` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Element trait, backing allocators and collaborator traits (`quire-core`).
pub use quire_core as types;

/// Arena front end, vectors, matrices and the sub-allocator (`quire-arena`).
///
/// [`arena::Arena`] is the usual entry point; [`arena::SubAllocator`]
/// carves typed slices out of caller-owned storage.
pub use quire_arena as arena;

/// Level-1 and level-2 kernels (`quire-blas`).
pub use quire_blas as blas;

/// Dense + PReLU layers and networks (`quire-nn`).
///
/// [`nn::Layer`] for a single layer, [`nn::Network`] for a trained stack.
pub use quire_nn as nn;

/// Common imports for typical Quire usage.
///
/// ```rust
/// use quire::prelude::*;
/// ```
pub mod prelude {
    // Storage
    pub use quire_arena::{Arena, ArenaError, Matrix, Vector};
    pub use quire_core::{AllocError, Allocator, BudgetAllocator, Element, Heap, NormalSampler};

    // Kernels
    pub use quire_blas::{axpy, copy, dot, elementwise_mul, gemv, geru, scal, Trans, WriteMode};

    // Layers
    pub use quire_nn::{
        ChaChaNormal, Dense, Layer, Network, NetworkConfig, NnError, PRelu,
    };
}
