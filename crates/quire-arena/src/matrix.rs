//! Row-major matrices stored in a single buffer.
//!
//! The first `nrow * size_of::<RowDescriptor>()` bytes of the buffer hold
//! the descriptor table; descriptor `i` records where row `i` lives. Rows
//! follow the table and are packed with no padding beyond what the
//! element alignment requires.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use quire_core::{AllocError, Buffer, Element};

use crate::suballoc::{claim, UNDEFINED_BYTE};

/// Location of one row inside a matrix buffer.
///
/// Two address-width words: the byte offset of the row from the start of
/// the buffer and the number of elements in it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RowDescriptor {
    /// Byte offset of the row's first element from the buffer base.
    pub offset: usize,
    /// Number of elements in the row.
    pub len: usize,
}

/// Total buffer size for an `nrow x ncol` matrix of `T`:
/// `nrow * ncol * size_of::<T>() + nrow * size_of::<RowDescriptor>()`.
///
/// # Errors
///
/// [`AllocError::OutOfMemory`] if the arithmetic overflows.
pub fn matrix_bytes<T>(nrow: usize, ncol: usize) -> Result<usize, AllocError> {
    let data = nrow
        .checked_mul(ncol)
        .and_then(|count| count.checked_mul(size_of::<T>()))
        .ok_or(AllocError::OutOfMemory)?;
    let table = nrow
        .checked_mul(size_of::<RowDescriptor>())
        .ok_or(AllocError::OutOfMemory)?;
    data.checked_add(table).ok_or(AllocError::OutOfMemory)
}

/// A dense `nrow x ncol` matrix whose descriptor table and rows share one
/// allocation.
///
/// Created by [`Arena::matrix`](crate::Arena::matrix); fresh storage holds
/// the [`UNDEFINED_BYTE`] pattern, not numeric zeros. Release it through
/// [`Arena::free_matrix`](crate::Arena::free_matrix) with the same shape.
pub struct Matrix<T: Element> {
    buffer: Buffer,
    nrow: usize,
    ncol: usize,
    _marker: PhantomData<T>,
}

impl<T: Element> Matrix<T> {
    /// Lay out the descriptor table and rows inside `buffer`.
    ///
    /// On failure the buffer is handed back so the caller can release it.
    pub(crate) fn from_buffer(
        mut buffer: Buffer,
        nrow: usize,
        ncol: usize,
    ) -> Result<Self, (Buffer, AllocError)> {
        match lay_out::<T>(&mut buffer, nrow, ncol) {
            Ok(()) => Ok(Self {
                buffer,
                nrow,
                ncol,
                _marker: PhantomData,
            }),
            Err(err) => Err((buffer, err)),
        }
    }

    pub(crate) fn into_buffer(self) -> Buffer {
        self.buffer
    }

    /// Number of rows.
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// Number of columns (the length of every row).
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// `(nrow, ncol)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    /// The descriptor table stored at the front of the buffer.
    pub fn descriptors(&self) -> &[RowDescriptor] {
        let table = self.nrow * size_of::<RowDescriptor>();
        bytemuck::cast_slice(&self.buffer.as_bytes()[..table])
    }

    /// Row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= nrow`.
    pub fn row(&self, i: usize) -> &[T] {
        let desc = self.descriptors()[i];
        let stop = desc.offset + desc.len * size_of::<T>();
        bytemuck::cast_slice(&self.buffer.as_bytes()[desc.offset..stop])
    }

    /// Mutable row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= nrow`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let desc = self.descriptors()[i];
        let stop = desc.offset + desc.len * size_of::<T>();
        bytemuck::cast_slice_mut(&mut self.buffer.as_bytes_mut()[desc.offset..stop])
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.nrow).map(move |i| self.row(i))
    }

    /// Element at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> T {
        self.row(i)[j]
    }

    /// Overwrite the element at row `i`, column `j`.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.row_mut(i)[j] = value;
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        for i in 0..self.nrow {
            self.row_mut(i).fill(value);
        }
    }

    /// Overwrite the matrix from row-major `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != nrow * ncol`.
    pub fn copy_from_row_major(&mut self, values: &[T]) {
        assert_eq!(
            values.len(),
            self.nrow * self.ncol,
            "row-major source length does not match matrix shape"
        );
        if self.ncol == 0 {
            return;
        }
        for (i, chunk) in values.chunks_exact(self.ncol).enumerate() {
            self.row_mut(i).copy_from_slice(chunk);
        }
    }

    /// Raw bytes of the whole allocation, table included.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Base address of the allocation.
    pub fn base_addr(&self) -> usize {
        self.buffer.addr()
    }

    /// Size of the backing allocation in bytes.
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("nrow", &self.nrow)
            .field("ncol", &self.ncol)
            .field("rows", &self.rows().collect::<Vec<_>>())
            .finish()
    }
}

/// Carve `nrow` descriptors, then `nrow` rows of `ncol` elements, from a
/// cursor starting at offset 0, writing each row's descriptor as it goes.
fn lay_out<T: Element>(buffer: &mut Buffer, nrow: usize, ncol: usize) -> Result<(), AllocError> {
    let base = buffer.addr();
    let len = buffer.len();
    let mut end = 0;

    let table = claim::<RowDescriptor>(base, len, &mut end, nrow)?;
    let bytes = buffer.as_bytes_mut();
    bytes[table.clone()].fill(UNDEFINED_BYTE);

    for i in 0..nrow {
        let row = claim::<T>(base, len, &mut end, ncol)?;
        bytes[row.clone()].fill(UNDEFINED_BYTE);
        let descriptors: &mut [RowDescriptor] = bytemuck::cast_slice_mut(&mut bytes[table.clone()]);
        descriptors[i] = RowDescriptor {
            offset: row.start,
            len: ncol,
        };
    }
    Ok(())
}
