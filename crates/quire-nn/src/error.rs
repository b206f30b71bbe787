//! Error types for layer and network construction.

use std::error::Error;
use std::fmt;

use quire_arena::ArenaError;
use quire_core::AllocError;

/// Errors from building or releasing layers and networks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NnError {
    /// Allocating a parameter or cache buffer failed.
    Alloc(AllocError),
    /// Releasing storage back to the arena failed.
    Arena(ArenaError),
    /// A network configuration was rejected.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for NnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "layer allocation failed: {err}"),
            Self::Arena(err) => write!(f, "layer release failed: {err}"),
            Self::InvalidConfig { reason } => write!(f, "invalid network config: {reason}"),
        }
    }
}

impl Error for NnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::Arena(err) => Some(err),
            Self::InvalidConfig { .. } => None,
        }
    }
}

impl From<AllocError> for NnError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl From<ArenaError> for NnError {
    fn from(err: ArenaError) -> Self {
        Self::Arena(err)
    }
}
