//! Allocation front end for vectors and matrices.
//!
//! [`Arena`] wraps an injected [`Allocator`] and is the only place vectors
//! and matrices are created or released. A matrix costs exactly one
//! `allocate` and one `release`; if laying out its rows fails after the
//! buffer was obtained, the buffer is released before the error returns.

use std::mem::{align_of, size_of};

use quire_core::{AllocError, Allocator, Element, Heap};
use tracing::{trace, warn};

use crate::error::ArenaError;
use crate::matrix::{matrix_bytes, Matrix, RowDescriptor};
use crate::vector::Vector;

/// Vector and matrix allocator over a backing [`Allocator`].
#[derive(Debug, Default)]
pub struct Arena<A: Allocator = Heap> {
    allocator: A,
}

impl<A: Allocator> Arena<A> {
    /// Create an arena drawing memory from `allocator`.
    pub fn new(allocator: A) -> Self {
        Self { allocator }
    }

    /// The backing allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Allocate a vector of `n` elements.
    ///
    /// The contents are allocated storage only; write before reading.
    ///
    /// # Errors
    ///
    /// [`AllocError::ZeroAllocation`] for `n == 0`,
    /// [`AllocError::OutOfMemory`] if the size overflows or the allocator
    /// refuses.
    pub fn vector<T: Element>(&self, n: usize) -> Result<Vector<T>, AllocError> {
        let bytes = size_of::<T>()
            .checked_mul(n)
            .ok_or(AllocError::OutOfMemory)?;
        let buffer = self.allocator.allocate(bytes, align_of::<T>())?;
        trace!(len = n, bytes, elem = T::NAME, "allocated vector");
        Ok(Vector::from_buffer(buffer, n))
    }

    /// Allocate a vector of `n` elements all set to `value`.
    pub fn vector_filled<T: Element>(&self, n: usize, value: T) -> Result<Vector<T>, AllocError> {
        let mut v = self.vector(n)?;
        v.fill(value);
        Ok(v)
    }

    /// Allocate a vector holding a copy of `values`.
    pub fn vector_from<T: Element>(&self, values: &[T]) -> Result<Vector<T>, AllocError> {
        let mut v = self.vector(values.len())?;
        v.copy_from_slice(values);
        Ok(v)
    }

    /// Allocate an `nrow x ncol` matrix in a single buffer.
    ///
    /// # Errors
    ///
    /// [`AllocError::ZeroAllocation`] if either dimension is zero,
    /// [`AllocError::OutOfMemory`] if the size overflows or the allocator
    /// refuses. No allocation is left behind on failure.
    pub fn matrix<T: Element>(&self, nrow: usize, ncol: usize) -> Result<Matrix<T>, AllocError> {
        let bytes = matrix_bytes::<T>(nrow, ncol)?;
        let align = align_of::<RowDescriptor>().max(align_of::<T>());
        let buffer = self.allocator.allocate(bytes, align)?;
        match Matrix::from_buffer(buffer, nrow, ncol) {
            Ok(matrix) => {
                trace!(nrow, ncol, bytes, elem = T::NAME, "allocated matrix");
                Ok(matrix)
            }
            Err((buffer, err)) => {
                self.allocator.release(buffer);
                Err(err)
            }
        }
    }

    /// Allocate a matrix and fill it from row-major `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != nrow * ncol`.
    pub fn matrix_from<T: Element>(
        &self,
        nrow: usize,
        ncol: usize,
        values: &[T],
    ) -> Result<Matrix<T>, AllocError> {
        let mut m = self.matrix(nrow, ncol)?;
        m.copy_from_row_major(values);
        Ok(m)
    }

    /// Release a vector.
    pub fn free_vector<T: Element>(&self, vector: Vector<T>) {
        trace!(len = vector.len(), "released vector");
        self.allocator.release(vector.into_buffer());
    }

    /// Release a matrix allocated as `nrow x ncol`.
    ///
    /// The release size is recomputed from the caller's shape.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ShapeMismatch`] if `(nrow, ncol)` differs from the
    /// allocation shape. The matrix is then dropped without being returned
    /// to the allocator, so the mismatch shows up as a leak in allocator
    /// accounting instead of a wrongly sized release.
    pub fn free_matrix<T: Element>(
        &self,
        matrix: Matrix<T>,
        nrow: usize,
        ncol: usize,
    ) -> Result<(), ArenaError> {
        if matrix.shape() != (nrow, ncol) {
            warn!(
                expected_nrow = matrix.nrow(),
                expected_ncol = matrix.ncol(),
                nrow,
                ncol,
                "matrix freed with mismatched shape"
            );
            return Err(ArenaError::ShapeMismatch {
                expected: matrix.shape(),
                actual: (nrow, ncol),
            });
        }
        let bytes = matrix_bytes::<T>(nrow, ncol)?;
        debug_assert_eq!(bytes, matrix.byte_len());
        trace!(nrow, ncol, bytes, "released matrix");
        self.allocator.release(matrix.into_buffer());
        Ok(())
    }

    /// Release a matrix using the shape it was allocated with.
    ///
    /// Used on cleanup paths where the owner holds the matrix itself and
    /// has no separately tracked shape to check against.
    pub fn release_matrix<T: Element>(&self, matrix: Matrix<T>) {
        trace!(
            nrow = matrix.nrow(),
            ncol = matrix.ncol(),
            bytes = matrix.byte_len(),
            "released matrix"
        );
        self.allocator.release(matrix.into_buffer());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::BudgetAllocator;

    use crate::suballoc::UNDEFINED_BYTE;

    #[test]
    fn vector_has_requested_length() {
        let arena = Arena::new(Heap);
        let v: Vector<f64> = arena.vector(7).unwrap();
        assert_eq!(v.len(), 7);
        assert_eq!(v.byte_len(), 56);
    }

    #[test]
    fn zero_length_vector_is_zero_allocation() {
        let arena = Arena::new(Heap);
        assert_eq!(
            arena.vector::<f32>(0).unwrap_err(),
            AllocError::ZeroAllocation
        );
    }

    #[test]
    fn oversized_vector_is_out_of_memory() {
        let arena = Arena::new(Heap);
        assert_eq!(
            arena.vector::<f64>(usize::MAX).unwrap_err(),
            AllocError::OutOfMemory
        );
    }

    #[test]
    fn vector_from_copies_values() {
        let arena = Arena::new(Heap);
        let v = arena.vector_from(&[1.0f32, 2.0, 3.0]).unwrap();
        assert_eq!(&v[..], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn matrix_uses_one_allocation_of_exact_size() {
        let alloc = BudgetAllocator::new(1 << 20);
        let arena = Arena::new(&alloc);
        let m: Matrix<f64> = arena.matrix(3, 5).unwrap();
        assert_eq!(alloc.allocation_count(), 1);
        assert_eq!(alloc.live_bytes(), 3 * 5 * 8 + 3 * 16);
        assert_eq!(m.byte_len(), 3 * 5 * 8 + 3 * 16);
        arena.free_matrix(m, 3, 5).unwrap();
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.release_count(), 1);
    }

    #[test]
    fn matrix_rows_have_ncol_elements() {
        let arena = Arena::new(Heap);
        let m: Matrix<f32> = arena.matrix(4, 3).unwrap();
        assert_eq!(m.rows().count(), 4);
        assert!(m.rows().all(|row| row.len() == 3));
    }

    #[test]
    fn fresh_matrix_holds_fill_pattern() {
        let arena = Arena::new(Heap);
        let m: Matrix<f32> = arena.matrix(2, 2).unwrap();
        let table = 2 * size_of::<RowDescriptor>();
        assert!(m.as_bytes()[table..].iter().all(|&b| b == UNDEFINED_BYTE));
    }

    #[test]
    fn descriptor_table_comes_first() {
        let arena = Arena::new(Heap);
        let m: Matrix<f64> = arena.matrix(3, 2).unwrap();
        let descs = m.descriptors();
        assert_eq!(descs.len(), 3);
        assert_eq!(descs[0].offset, 3 * size_of::<RowDescriptor>());
        for (i, d) in descs.iter().enumerate() {
            assert_eq!(d.len, 2);
            assert_eq!(d.offset, 48 + i * 16);
            assert_eq!(m.row(i).as_ptr() as usize, m.base_addr() + d.offset);
        }
    }

    #[test]
    fn rows_are_independent() {
        let arena = Arena::new(Heap);
        let mut m: Matrix<f64> = arena.matrix(3, 2).unwrap();
        m.fill(0.0);
        m.set(1, 1, 4.5);
        assert_eq!(m.row(0), &[0.0, 0.0]);
        assert_eq!(m.row(1), &[0.0, 4.5]);
        assert_eq!(m.row(2), &[0.0, 0.0]);
        assert_eq!(m.get(1, 1), 4.5);
    }

    #[test]
    fn matrix_from_fills_row_major() {
        let arena = Arena::new(Heap);
        let m = arena.matrix_from(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn zero_rows_is_zero_allocation() {
        let alloc = BudgetAllocator::new(1024);
        let arena = Arena::new(&alloc);
        assert_eq!(
            arena.matrix::<f64>(0, 4).unwrap_err(),
            AllocError::ZeroAllocation
        );
        assert_eq!(alloc.allocation_count(), 0);
    }

    #[test]
    fn zero_columns_releases_parent_buffer() {
        // The descriptor table is non-empty, so the buffer is obtained and
        // the first row claim fails; the buffer must be released.
        let alloc = BudgetAllocator::new(1024);
        let arena = Arena::new(&alloc);
        assert_eq!(
            arena.matrix::<f64>(4, 0).unwrap_err(),
            AllocError::ZeroAllocation
        );
        assert_eq!(alloc.allocation_count(), 1);
        assert_eq!(alloc.release_count(), 1);
        assert_eq!(alloc.live_bytes(), 0);
    }

    #[test]
    fn overflowing_shape_is_out_of_memory() {
        let arena = Arena::new(Heap);
        assert_eq!(
            arena.matrix::<f64>(usize::MAX / 2, 4).unwrap_err(),
            AllocError::OutOfMemory
        );
    }

    #[test]
    fn budget_exhaustion_propagates() {
        let alloc = BudgetAllocator::new(100);
        let arena = Arena::new(&alloc);
        assert_eq!(
            arena.matrix::<f64>(4, 4).unwrap_err(),
            AllocError::OutOfMemory
        );
        assert_eq!(alloc.live_bytes(), 0);
    }

    #[test]
    fn free_with_wrong_shape_is_rejected() {
        let alloc = BudgetAllocator::new(1024);
        let arena = Arena::new(&alloc);
        let m: Matrix<f32> = arena.matrix(2, 3).unwrap();
        let err = arena.free_matrix(m, 3, 2).unwrap_err();
        assert_eq!(
            err,
            ArenaError::ShapeMismatch {
                expected: (2, 3),
                actual: (3, 2),
            }
        );
        assert_eq!(alloc.release_count(), 0);
        assert_eq!(alloc.outstanding(), 1);
    }

    #[test]
    fn release_matrix_uses_allocation_shape() {
        let alloc = BudgetAllocator::new(1024);
        let arena = Arena::new(&alloc);
        let m: Matrix<f64> = arena.matrix(2, 3).unwrap();
        assert_eq!(alloc.live_bytes(), 2 * 3 * 8 + 2 * 16);
        arena.release_matrix(m);
        assert_eq!(alloc.release_count(), 1);
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.outstanding(), 0);
    }

    #[test]
    fn free_vector_releases() {
        let alloc = BudgetAllocator::new(1024);
        let arena = Arena::new(&alloc);
        let v = arena.vector_filled(4, 1.5f64).unwrap();
        assert!(v.iter().all(|&x| x == 1.5));
        arena.free_vector(v);
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.outstanding(), 0);
    }
}
