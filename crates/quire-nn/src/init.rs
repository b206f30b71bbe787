//! Weight-initialisation scale.

/// Seed constant for the 64-bit reciprocal square root approximation.
pub const INVSQRT_MAGIC: u64 = 0x5fe6_eb50_c7b5_37a9;

/// Newton-Raphson refinements applied after the bit-level estimate.
pub const INVSQRT_NEWTON_STEPS: usize = 3;

/// Fast approximation of `1 / sqrt(x)` for 64-bit floats.
///
/// The estimate `MAGIC - (bits(x) >> 1)` is refined by exactly
/// [`INVSQRT_NEWTON_STEPS`] iterations of `y *= 1.5 - 0.5·x·y·y`. The
/// result is bit-for-bit reproducible; golden tests depend on it, so
/// neither the constant nor the step count may change.
pub fn invsqrt(x: f64) -> f64 {
    let mut y = f64::from_bits(INVSQRT_MAGIC.wrapping_sub(x.to_bits() >> 1));
    for _ in 0..INVSQRT_NEWTON_STEPS {
        y *= 1.5 - 0.5 * x * y * y;
    }
    y
}

/// Initialisation scale for a layer with `inputs` inputs:
/// `invsqrt(0.5 · inputs)`.
pub fn init_scale(inputs: usize) -> f64 {
    invsqrt(0.5 * inputs as f64)
}
