//! Collaborator traits.

/// Source of standard-normal samples for weight initialisation.
///
/// Each call returns one draw from `N(0, 1)`. Implementations must be
/// deterministic for a given seed and must not allocate per draw.
/// Teardown is `Drop`.
pub trait NormalSampler {
    /// Draw one standard-normal sample.
    fn sample(&mut self) -> f64;
}

impl<S: NormalSampler + ?Sized> NormalSampler for &mut S {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

impl<S: NormalSampler + ?Sized> NormalSampler for Box<S> {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}
