//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use quire_core::AllocError;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Allocation or sub-allocation failed.
    Alloc(AllocError),
    /// A matrix was freed with a shape other than the one it was
    /// allocated with.
    ShapeMismatch {
        /// Shape `(nrow, ncol)` the matrix was allocated with.
        expected: (usize, usize),
        /// Shape `(nrow, ncol)` passed to the free call.
        actual: (usize, usize),
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "arena allocation failed: {err}"),
            Self::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "matrix freed as {}x{} but allocated as {}x{}",
                    actual.0, actual.1, expected.0, expected.1
                )
            }
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::ShapeMismatch { .. } => None,
        }
    }
}

impl From<AllocError> for ArenaError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}
