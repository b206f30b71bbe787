//! Single-allocation matrix and vector storage for Quire.
//!
//! A matrix is backed by exactly one [`Buffer`](quire_core::Buffer) holding
//! both its row-descriptor table and its row data, so it costs one
//! allocation and one release regardless of row count.
//!
//! # Layout
//!
//! ```text
//! Buffer (one allocation, base aligned to MAX_ALIGN)
//! ├── RowDescriptor[nrow]   offset 0, { byte offset, element count }
//! ├── row 0: T[ncol]        carved by the sub-allocator
//! ├── row 1: T[ncol]
//! └── ...
//! ```
//!
//! The table and rows are carved with the bump [`suballoc`] primitives, so
//! a matrix has exactly the layout a [`SubAllocator`] seeded at offset 0
//! produces for `nrow` descriptors followed by `nrow` rows.
//!
//! Vectors are plain single allocations with no descriptor table.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod error;
pub mod matrix;
pub mod suballoc;
pub mod vector;

pub use arena::Arena;
pub use error::ArenaError;
pub use matrix::{matrix_bytes, Matrix, RowDescriptor};
pub use suballoc::{align_up, claim, sub_alloc, SubAllocator, UNDEFINED_BYTE};
pub use vector::Vector;
