//! Arena-owned vectors.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::{Deref, DerefMut};

use quire_core::{Buffer, Element};

/// A dense vector of `T` backed by its own allocation.
///
/// Derefs to `[T]`. Release it through
/// [`Arena::free_vector`](crate::Arena::free_vector) so the allocator that
/// produced it sees the release.
pub struct Vector<T: Element> {
    buffer: Buffer,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Element> Vector<T> {
    pub(crate) fn from_buffer(buffer: Buffer, len: usize) -> Self {
        debug_assert_eq!(buffer.len(), len * size_of::<T>());
        Self {
            buffer,
            len,
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_buffer(self) -> Buffer {
        self.buffer
    }

    /// Shared element view.
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(self.buffer.as_bytes())
    }

    /// Mutable element view.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.buffer.as_bytes_mut())
    }

    /// Size of the backing allocation in bytes.
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }
}

impl<T: Element> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Element> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("len", &self.len)
            .field("data", &self.as_slice())
            .finish()
    }
}
