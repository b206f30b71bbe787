//! Golden dense + PReLU layer scenario (2 inputs, 3 outputs).
//!
//! Load [`WEIGHTS`], [`BIAS`], [`SLOPES`] and [`INPUT`] into a layer, run
//! forward, write [`OUTPUT_GRAD`] as `∂c/∂y` and run backward with
//! [`RATE`]. Every pre-activation is negative, so each channel exercises
//! the scaled PReLU branch.
//!
//! `*_BITS` constants are exact `f64::to_bits` results for the kernel
//! evaluation order; the `APPROX_*` values are the rounded figures the
//! scenario was designed around.

/// Rows of `W`, `outputs x inputs`.
pub const WEIGHTS: [[f64; 2]; 3] = [
    [0.0203125, -0.06875],
    [0.290039, -0.129883],
    [0.109863, -0.0298],
];

pub const BIAS: [f64; 3] = [-0.171875, -0.191406, -0.05];

pub const INPUT: [f64; 2] = [0.229492, 0.310547];

pub const SLOPES: [f64; 3] = [0.18906, 0.28616, 0.17061];

/// `∂c/∂y` written before backward.
pub const OUTPUT_GRAD: [f64; 3] = [0.118364, 0.182871, 0.080530];

pub const RATE: f64 = 0.05;

pub const PREACTIVATION_BITS: [u64; 3] = [
    0xbfc8_22d9_b43b_dc4f,
    0xbfc5_2497_1a9f_c01d,
    0xbfa1_6de7_41d4_7bc2,
];

pub const OUTPUT_BITS: [u64; 3] = [
    0xbfa2_40b1_9eee_30c9,
    0xbfa8_3377_a138_2063,
    0xbf77_c9f6_6fb3_c543,
];

/// `∂c/∂z` left in the dense gradient cache by backward.
pub const DENSE_GRAD_BITS: [u64; 3] = [
    0x3f96_ea3b_4d81_0dc2,
    0x3faa_cb0b_af9e_2c3e,
    0x3f8c_234f_55f7_b006,
];

pub const INPUT_GRAD_BITS: [u64; 2] = [0x3f91_8da0_c007_fda8, 0xbf81_e8c2_5a58_d6cf];

/// Slopes after one step.
pub const LEARNED_SLOPES_BITS: [u64; 3] = [
    0x3fc8_57af_8d79_65f3,
    0x3fd2_6930_ca2a_3102,
    0x3fc5_db0a_39bc_0573,
];

/// Bias after one step.
pub const LEARNED_BIAS_BITS: [u64; 3] = [
    0xbfc6_24a9_f87c_01b0,
    0xbfc8_d5ba_d953_0610,
    0xbfa9_f3a4_3113_189a,
];

/// `W` after one step, row-major.
pub const LEARNED_WEIGHTS_BITS: [u64; 6] = [
    0x3f94_897c_c233_cf64,
    0xbfb1_b05f_2b88_6643,
    0x3fd2_8629_2f20_801e,
    0xbfc0_baa1_c091_8a87,
    0x3fbc_15a6_5176_694d,
    0xbf9e_bbd0_bb3d_0543,
];

pub const APPROX_OUTPUT: [f64; 3] = [-0.035649, -0.047268, -0.005808];

pub const APPROX_INPUT_GRAD: [f64; 2] = [0.017144, -0.008746];

/// Weights flattened row-major, for [`Arena::matrix_from`](quire_arena::Arena::matrix_from)
/// and `copy_from_row_major`.
pub fn weights_row_major() -> Vec<f64> {
    WEIGHTS.iter().flatten().copied().collect()
}
