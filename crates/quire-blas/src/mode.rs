//! Operand and output modes for level-2 kernels.

/// How [`gemv`](crate::gemv) applies its matrix operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trans {
    /// Use `A` as stored (`nrow x ncol`).
    Normal,
    /// Use `Aᵀ`: the product sums along the row dimension.
    Transpose,
}

/// Whether a kernel replaces or accumulates into its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Replace the previous contents of the output.
    Overwrite,
    /// Add into the previous contents of the output.
    Update,
}
