//! The allocator seam and its two stock implementations.
//!
//! [`Allocator`] is the injected dependency of the arena and of every layer
//! constructor: it is the sole configuration surface of the substrate.
//! [`Heap`] is the system allocator; [`BudgetAllocator`] enforces a byte
//! budget and keeps live-allocation accounting for leak and
//! out-of-memory testing.

use std::cell::Cell;

use tracing::debug;

use crate::buffer::Buffer;
use crate::error::AllocError;

/// A general-purpose byte allocator.
///
/// Every buffer returned by [`allocate`](Allocator::allocate) must be
/// passed back to [`release`](Allocator::release) on the same allocator
/// exactly once.
pub trait Allocator {
    /// Allocate `byte_count` bytes aligned to `align`.
    ///
    /// # Errors
    ///
    /// [`AllocError::ZeroAllocation`] for `byte_count == 0`,
    /// [`AllocError::OutOfMemory`] when the request cannot be satisfied,
    /// [`AllocError::UnsupportedAlignment`] for an alignment the storage
    /// cannot honour.
    fn allocate(&self, byte_count: usize, align: usize) -> Result<Buffer, AllocError>;

    /// Return a buffer previously produced by [`allocate`](Allocator::allocate).
    fn release(&self, buffer: Buffer);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, byte_count: usize, align: usize) -> Result<Buffer, AllocError> {
        (**self).allocate(byte_count, align)
    }

    fn release(&self, buffer: Buffer) {
        (**self).release(buffer)
    }
}

/// The system allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heap;

impl Allocator for Heap {
    fn allocate(&self, byte_count: usize, align: usize) -> Result<Buffer, AllocError> {
        Buffer::try_new(byte_count, align)
    }

    fn release(&self, buffer: Buffer) {
        drop(buffer);
    }
}

/// A capacity-limited allocator with live-byte accounting.
///
/// Requests that would push the live total past `capacity` fail with
/// [`AllocError::OutOfMemory`]. Single-threaded by construction (`Cell`
/// counters, not `Sync`).
#[derive(Debug)]
pub struct BudgetAllocator {
    capacity: usize,
    live: Cell<usize>,
    peak: Cell<usize>,
    allocations: Cell<usize>,
    releases: Cell<usize>,
}

impl BudgetAllocator {
    /// Create an allocator that will hand out at most `capacity` live bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            live: Cell::new(0),
            peak: Cell::new(0),
            allocations: Cell::new(0),
            releases: Cell::new(0),
        }
    }

    /// Byte budget.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently allocated and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.live.get()
    }

    /// Highest live byte count observed.
    pub fn peak_bytes(&self) -> usize {
        self.peak.get()
    }

    /// Number of successful allocations.
    pub fn allocation_count(&self) -> usize {
        self.allocations.get()
    }

    /// Number of releases.
    pub fn release_count(&self) -> usize {
        self.releases.get()
    }

    /// Allocations that have not been released yet.
    pub fn outstanding(&self) -> usize {
        self.allocations.get() - self.releases.get()
    }
}

impl Allocator for BudgetAllocator {
    fn allocate(&self, byte_count: usize, align: usize) -> Result<Buffer, AllocError> {
        if byte_count == 0 {
            return Err(AllocError::ZeroAllocation);
        }
        let live = self.live.get();
        let within_budget = live
            .checked_add(byte_count)
            .is_some_and(|total| total <= self.capacity);
        if !within_budget {
            debug!(
                requested = byte_count,
                live,
                capacity = self.capacity,
                "allocation refused: budget exhausted"
            );
            return Err(AllocError::OutOfMemory);
        }
        let buffer = Buffer::try_new(byte_count, align)?;
        let live = live + byte_count;
        self.live.set(live);
        self.peak.set(self.peak.get().max(live));
        self.allocations.set(self.allocations.get() + 1);
        Ok(buffer)
    }

    fn release(&self, buffer: Buffer) {
        self.live.set(self.live.get().saturating_sub(buffer.len()));
        self.releases.set(self.releases.get() + 1);
    }
}
