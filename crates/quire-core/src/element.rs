//! Numeric element trait for arena storage and kernels.

use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::Float;

/// A floating-point type that can live in arena storage.
///
/// `Pod` lets the arena view raw buffer bytes as typed slices without
/// pointer casts; `Float` supplies the arithmetic the kernels need.
/// Implemented for `f32` and `f64`.
pub trait Element: Float + Pod + Debug + Default + Send + Sync + 'static {
    /// Short type name used in diagnostics.
    const NAME: &'static str;
}

impl Element for f32 {
    const NAME: &'static str = "f32";
}

impl Element for f64 {
    const NAME: &'static str = "f64";
}
