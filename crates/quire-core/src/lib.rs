//! Core types and traits for the Quire numerical substrate.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions every other Quire crate builds on: the numeric
//! [`Element`] trait, the [`Allocator`] seam and its [`Buffer`] unit of
//! allocation, the allocation error type, and the [`NormalSampler`]
//! collaborator trait used for weight initialisation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod buffer;
pub mod element;
pub mod error;
pub mod traits;

pub use alloc::{Allocator, BudgetAllocator, Heap};
pub use buffer::{Buffer, MAX_ALIGN};
pub use element::Element;
pub use error::AllocError;
pub use traits::NormalSampler;
