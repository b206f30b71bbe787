//! Allocation error types shared by every Quire crate.

use std::error::Error;
use std::fmt;

/// Errors returned by an [`Allocator`](crate::Allocator) or by sub-allocation
/// inside an arena buffer.
///
/// Allocation failure is never retried internally: callers release any
/// sibling buffers they already own and propagate the error upward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The backing allocator could not satisfy the request, or the request
    /// size or alignment arithmetic overflowed the address width.
    OutOfMemory,
    /// A zero-byte allocation was requested (zero count or zero-sized
    /// element). This signals a caller logic error, not exhaustion.
    ZeroAllocation,
    /// The requested alignment is not a power of two or exceeds what the
    /// backing storage can guarantee ([`MAX_ALIGN`](crate::MAX_ALIGN)).
    UnsupportedAlignment {
        /// The alignment that was requested, in bytes.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::ZeroAllocation => write!(f, "zero-sized allocation requested"),
            Self::UnsupportedAlignment { align } => {
                write!(f, "unsupported alignment: {align} bytes")
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(AllocError::OutOfMemory.to_string(), "out of memory");
        assert_eq!(
            AllocError::ZeroAllocation.to_string(),
            "zero-sized allocation requested"
        );
        assert_eq!(
            AllocError::UnsupportedAlignment { align: 3 }.to_string(),
            "unsupported alignment: 3 bytes"
        );
    }
}
