//! The opaque byte region that is the unit of allocation.
//!
//! A [`Buffer`] is backed by a `Vec<u128>` so its base address is always
//! aligned to [`MAX_ALIGN`]. Byte and typed views are produced with
//! `bytemuck`, never by pointer reinterpretation.

use crate::error::AllocError;

/// Strongest alignment a [`Buffer`] guarantees for its base address.
pub const MAX_ALIGN: usize = std::mem::align_of::<u128>();

const WORD_BYTES: usize = std::mem::size_of::<u128>();

/// A contiguous, exclusively owned byte region.
///
/// Buffers are produced by an [`Allocator`](crate::Allocator) and handed
/// back to the same allocator exactly once via
/// [`Allocator::release`](crate::Allocator::release).
#[derive(Debug)]
pub struct Buffer {
    /// Backing words. `words.len() * WORD_BYTES >= len`.
    words: Vec<u128>,
    /// Requested length in bytes.
    len: usize,
}

impl Buffer {
    /// Allocate a zero-filled buffer of `len` bytes aligned to `align`.
    ///
    /// Every buffer is aligned to [`MAX_ALIGN`], so any supported `align`
    /// is satisfied and is not stored.
    ///
    /// # Errors
    ///
    /// - [`AllocError::ZeroAllocation`] if `len == 0`.
    /// - [`AllocError::UnsupportedAlignment`] if `align` is not a power of
    ///   two or exceeds [`MAX_ALIGN`].
    /// - [`AllocError::OutOfMemory`] if the system allocator refuses.
    pub fn try_new(len: usize, align: usize) -> Result<Self, AllocError> {
        if len == 0 {
            return Err(AllocError::ZeroAllocation);
        }
        if !align.is_power_of_two() || align > MAX_ALIGN {
            return Err(AllocError::UnsupportedAlignment { align });
        }
        let word_count = len.div_ceil(WORD_BYTES);
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| AllocError::OutOfMemory)?;
        words.resize(word_count, 0);
        Ok(Self { words, len })
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: zero-length buffers cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the region.
    pub fn addr(&self) -> usize {
        self.words.as_ptr() as usize
    }

    /// Shared byte view of the whole region.
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u128, u8>(&self.words)[..self.len]
    }

    /// Mutable byte view of the whole region.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u128, u8>(&mut self.words)[..self.len]
    }
}
