//! BLAS-style kernels over Quire vectors and matrices.
//!
//! Level 1 works on plain slices; level 2 works on arena [`Matrix`]
//! values. Every kernel is generic over [`Element`], so the same code is
//! instantiated for `f32` and `f64`.
//!
//! Special coefficient values (`0`, `1`, `-1`) take dedicated branches.
//! These branches are part of the contract, not just fast paths: a zero
//! `beta` in [`gemv`] never reads `y`, so NaN or infinite values there do
//! not leak into the result.
//!
//! Operand lengths are a caller contract. A mismatch panics with a message
//! naming the operands; no kernel reconciles lengths on its own.
//!
//! [`Matrix`]: quire_arena::Matrix
//! [`Element`]: quire_core::Element

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod level1;
pub mod level2;
pub mod mode;

pub use level1::{axpy, copy, dot, elementwise_mul, scal};
pub use level2::{gemv, geru};
pub use mode::{Trans, WriteMode};
