//! Bump sub-allocation of aligned, typed spans inside a byte buffer.
//!
//! All arithmetic is done on unsigned addresses with checked operations:
//! any overflow is reported as [`AllocError::OutOfMemory`] instead of
//! wrapping. Alignment is computed on the real address of the buffer, so
//! the returned spans are aligned even when the buffer itself is not.

use std::mem::{align_of, size_of};
use std::ops::Range;

use bytemuck::Pod;
use quire_core::AllocError;

/// Fill pattern written over every claimed span.
///
/// Claimed memory is "allocated", not "initialised": callers must write
/// before they read.
pub const UNDEFINED_BYTE: u8 = 0xaa;

/// Round `addr` up to the next multiple of `align`.
///
/// `align` must be a power of two. Returns `None` if rounding overflows.
pub fn align_up(addr: usize, align: usize) -> Option<usize> {
    debug_assert!(
        align.is_power_of_two(),
        "alignment {align} is not a power of two"
    );
    let mask = align - 1;
    addr.checked_add(mask).map(|bumped| bumped & !mask)
}

/// Claim room for `n` values of `T` in a buffer starting at address `base`
/// with `buf_len` bytes, advancing the cursor `end`.
///
/// Returns the claimed byte range relative to `base`. On error `end` is
/// left untouched.
///
/// # Errors
///
/// - [`AllocError::OutOfMemory`] if `size_of::<T>() * n` overflows, if
///   aligning the cursor overflows, or if the span does not fit.
/// - [`AllocError::ZeroAllocation`] if the span would be zero bytes.
pub fn claim<T>(
    base: usize,
    buf_len: usize,
    end: &mut usize,
    n: usize,
) -> Result<Range<usize>, AllocError> {
    let byte_count = size_of::<T>()
        .checked_mul(n)
        .ok_or(AllocError::OutOfMemory)?;
    if byte_count == 0 {
        return Err(AllocError::ZeroAllocation);
    }
    let cursor = base.checked_add(*end).ok_or(AllocError::OutOfMemory)?;
    let start_addr = align_up(cursor, align_of::<T>()).ok_or(AllocError::OutOfMemory)?;
    let start = start_addr - base;
    let stop = start
        .checked_add(byte_count)
        .ok_or(AllocError::OutOfMemory)?;
    if stop > buf_len {
        return Err(AllocError::OutOfMemory);
    }
    *end = stop;
    Ok(start..stop)
}

/// Carve `n` values of `T` out of `buf` at or after the cursor `end`.
///
/// The claimed bytes are overwritten with [`UNDEFINED_BYTE`] and `end` is
/// moved to the first byte past the span. Identical inputs always claim
/// the identical span.
///
/// # Errors
///
/// See [`claim`].
pub fn sub_alloc<'a, T: Pod>(
    buf: &'a mut [u8],
    end: &mut usize,
    n: usize,
) -> Result<&'a mut [T], AllocError> {
    let mut next = *end;
    let range = claim::<T>(buf.as_ptr() as usize, buf.len(), &mut next, n)?;
    let bytes = &mut buf[range];
    bytes.fill(UNDEFINED_BYTE);
    let typed = bytemuck::try_cast_slice_mut(bytes).map_err(|_| {
        AllocError::UnsupportedAlignment {
            align: align_of::<T>(),
        }
    })?;
    *end = next;
    Ok(typed)
}

/// A bump allocator over a borrowed byte buffer.
///
/// Unlike [`sub_alloc`], spans handed out by one `SubAllocator` can be held
/// simultaneously: each allocation splits the claimed span off the
/// unclaimed tail.
pub struct SubAllocator<'a> {
    base: usize,
    len: usize,
    end: usize,
    rest: &'a mut [u8],
}

impl<'a> SubAllocator<'a> {
    /// Start a bump allocator at offset 0 of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            base: buf.as_ptr() as usize,
            len: buf.len(),
            end: 0,
            rest: buf,
        }
    }

    /// Allocate `n` values of `T`.
    ///
    /// # Errors
    ///
    /// See [`claim`]. A failed allocation leaves the cursor unchanged.
    pub fn alloc<T: Pod>(&mut self, n: usize) -> Result<&'a mut [T], AllocError> {
        let mut next = self.end;
        let range = claim::<T>(self.base, self.len, &mut next, n)?;
        let rest = std::mem::take(&mut self.rest);
        let (_padding, tail) = rest.split_at_mut(range.start - self.end);
        let (claimed, tail) = tail.split_at_mut(range.len());
        self.rest = tail;
        self.end = next;
        claimed.fill(UNDEFINED_BYTE);
        bytemuck::try_cast_slice_mut(claimed).map_err(|_| AllocError::UnsupportedAlignment {
            align: align_of::<T>(),
        })
    }

    /// Cursor: offset of the first unclaimed byte.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.len - self.end
    }

    /// Whether no bytes remain after the cursor.
    pub fn is_saturated(&self) -> bool {
        self.end == self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(0, 8), Some(0));
        assert_eq!(align_up(1, 8), Some(8));
        assert_eq!(align_up(8, 8), Some(8));
        assert_eq!(align_up(9, 4), Some(12));
        assert_eq!(align_up(13, 1), Some(13));
    }

    #[test]
    fn align_up_overflow_is_none() {
        assert_eq!(align_up(usize::MAX, 8), None);
        assert_eq!(align_up(usize::MAX - 3, 8), None);
        assert_eq!(align_up(usize::MAX, 1), Some(usize::MAX));
    }

    #[test]
    fn claim_zero_count_is_zero_allocation() {
        let mut end = 0;
        assert_eq!(
            claim::<u64>(0, 64, &mut end, 0).unwrap_err(),
            AllocError::ZeroAllocation
        );
        assert_eq!(end, 0);
    }

    #[test]
    fn claim_zero_sized_type_is_zero_allocation() {
        let mut end = 0;
        assert_eq!(
            claim::<()>(0, 64, &mut end, 10).unwrap_err(),
            AllocError::ZeroAllocation
        );
    }

    #[test]
    fn claim_byte_count_overflow_is_out_of_memory() {
        let mut end = 0;
        assert_eq!(
            claim::<u64>(0, 64, &mut end, usize::MAX / 4).unwrap_err(),
            AllocError::OutOfMemory
        );
        assert_eq!(end, 0);
    }

    #[test]
    fn claim_alignment_overflow_is_out_of_memory() {
        let mut end = 0;
        assert_eq!(
            claim::<u64>(usize::MAX - 2, 64, &mut end, 1).unwrap_err(),
            AllocError::OutOfMemory
        );
    }

    #[test]
    fn claim_past_end_is_out_of_memory() {
        let mut end = 0;
        claim::<u64>(0, 16, &mut end, 2).unwrap();
        assert_eq!(end, 16);
        assert_eq!(
            claim::<u8>(0, 16, &mut end, 1).unwrap_err(),
            AllocError::OutOfMemory
        );
        assert_eq!(end, 16);
    }

    #[test]
    fn claim_pads_to_alignment() {
        let mut end = 0;
        assert_eq!(claim::<u8>(0, 64, &mut end, 3).unwrap(), 0..3);
        assert_eq!(claim::<u32>(0, 64, &mut end, 1).unwrap(), 4..8);
        assert_eq!(claim::<u64>(0, 64, &mut end, 1).unwrap(), 8..16);
        assert_eq!(claim::<u8>(0, 64, &mut end, 1).unwrap(), 16..17);
        assert_eq!(claim::<u64>(0, 64, &mut end, 2).unwrap(), 24..40);
        assert_eq!(end, 40);
    }

    #[test]
    fn claim_aligns_real_address_not_offset() {
        // A buffer starting at an odd address must pad the first u32.
        let mut end = 0;
        let range = claim::<u32>(0x1001, 64, &mut end, 1).unwrap();
        assert_eq!(range, 3..7);
        assert_eq!((0x1001 + range.start) % 4, 0);
    }

    #[test]
    fn sub_alloc_fills_and_advances() {
        let mut words = [0u64; 8];
        let buf: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let mut end = 0;
        let span = sub_alloc::<u32>(buf, &mut end, 3).unwrap();
        assert_eq!(span.len(), 3);
        assert!(span.iter().all(|&v| v == 0xaaaa_aaaa));
        assert_eq!(end, 12);
    }

    #[test]
    fn sub_alloc_is_deterministic() {
        let mut words = [0u64; 8];
        let buf: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let mut end_a = 5;
        let first = sub_alloc::<u64>(buf, &mut end_a, 2).unwrap().as_ptr() as usize;
        let mut end_b = 5;
        let second = sub_alloc::<u64>(buf, &mut end_b, 2).unwrap().as_ptr() as usize;
        assert_eq!(first, second);
        assert_eq!(end_a, end_b);
    }

    #[test]
    fn sub_allocator_spans_do_not_overlap() {
        let mut words = [0u64; 16];
        let buf: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let mut bump = SubAllocator::new(buf);
        let a: &mut [u8] = bump.alloc(3).unwrap();
        let b: &mut [f64] = bump.alloc(2).unwrap();
        a.fill(1);
        b.fill(2.0);
        let a_end = a.as_ptr() as usize + a.len();
        assert!(b.as_ptr() as usize >= a_end);
        assert_eq!(b.as_ptr() as usize % 8, 0);
        assert_eq!(bump.end(), 24);
        assert_eq!(bump.remaining(), 128 - 24);
    }

    #[test]
    fn sub_allocator_saturates() {
        let mut words = [0u64; 2];
        let buf: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let mut bump = SubAllocator::new(buf);
        bump.alloc::<u64>(2).unwrap();
        assert!(bump.is_saturated());
        assert_eq!(bump.alloc::<u8>(1).unwrap_err(), AllocError::OutOfMemory);
        assert_eq!(bump.end(), 16);
    }

    #[test]
    fn sub_allocator_failure_keeps_cursor() {
        let mut words = [0u64; 4];
        let buf: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let mut bump = SubAllocator::new(buf);
        bump.alloc::<u8>(1).unwrap();
        assert_eq!(bump.alloc::<u64>(4).unwrap_err(), AllocError::OutOfMemory);
        assert_eq!(bump.end(), 1);
        let next: &mut [u64] = bump.alloc(3).unwrap();
        assert_eq!(next.len(), 3);
        assert_eq!(bump.end(), 32);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn claimed_span_is_aligned_and_cursor_exact(
                base in 0usize..4096,
                start in 0usize..64,
                n in 1usize..32,
            ) {
                let mut end = start;
                let range = claim::<u64>(base, 1024, &mut end, n).unwrap();
                prop_assert_eq!((base + range.start) % align_of::<u64>(), 0);
                prop_assert!(range.start >= start);
                prop_assert!(range.start - start < align_of::<u64>());
                prop_assert_eq!(end, range.start + n * size_of::<u64>());
                prop_assert_eq!(range.end, end);
            }

            #[test]
            fn sub_alloc_address_is_aligned(
                skip in 0usize..16,
                n in 1usize..8,
            ) {
                let mut words = [0u64; 32];
                let buf: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
                let mut end = skip;
                let span = sub_alloc::<u32>(buf, &mut end, n).unwrap();
                prop_assert_eq!(span.as_ptr() as usize % align_of::<u32>(), 0);
                prop_assert_eq!(span.len(), n);
            }
        }
    }
}
