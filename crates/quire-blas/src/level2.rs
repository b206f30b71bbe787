//! Matrix-vector kernels.

use quire_arena::Matrix;
use quire_core::Element;

use crate::mode::{Trans, WriteMode};

/// General matrix-vector multiply: `z = alpha * op(A) * x + beta * y`.
///
/// `A` is stored `nrow x ncol`. With [`Trans::Normal`], `x` has `ncol`
/// elements and `z` has `nrow`; with [`Trans::Transpose`], `x` has `nrow`
/// elements and `z` has `ncol`.
///
/// `y = None` scales `z` in place, i.e. `z = alpha * op(A) * x + beta * z`.
///
/// Evaluation order:
/// 1. `z` receives `beta * y`: `beta == 0` writes zeros without reading
///    `y`, `beta == 1` copies, `beta == -1` negates, anything else scales.
/// 2. `alpha == 0` stops here; `A` and `x` are not read.
/// 3. `alpha * op(A) * x` is accumulated into `z`. Normal mode sums one
///    dot product per output row; Transpose mode adds `x[j] * A[j, :]` for
///    each row `j`. `alpha == ±1` skips the multiply by `alpha`.
///
/// # Panics
///
/// Panics if `x`, `y` or `z` do not match the shape of `op(A)`.
pub fn gemv<T: Element>(
    trans: Trans,
    alpha: T,
    a: &Matrix<T>,
    x: &[T],
    beta: T,
    y: Option<&[T]>,
    z: &mut [T],
) {
    let (x_len, z_len) = match trans {
        Trans::Normal => (a.ncol(), a.nrow()),
        Trans::Transpose => (a.nrow(), a.ncol()),
    };
    assert_eq!(x.len(), x_len, "gemv: x length does not match op(A)");
    assert_eq!(z.len(), z_len, "gemv: z length does not match op(A)");
    if let Some(y) = y {
        assert_eq!(y.len(), z_len, "gemv: y length does not match op(A)");
    }

    scale_into(beta, y, z);

    if alpha == T::zero() {
        return;
    }

    match trans {
        Trans::Normal => {
            for (i, zi) in z.iter_mut().enumerate() {
                let acc = a
                    .row(i)
                    .iter()
                    .zip(x)
                    .fold(T::zero(), |acc, (&aij, &xj)| acc + aij * xj);
                *zi = if alpha == T::one() {
                    *zi + acc
                } else if alpha == -T::one() {
                    *zi - acc
                } else {
                    *zi + alpha * acc
                };
            }
        }
        Trans::Transpose => {
            for (j, &xj) in x.iter().enumerate() {
                let row = a.row(j);
                if alpha == T::one() {
                    for (zk, &ajk) in z.iter_mut().zip(row) {
                        *zk = *zk + ajk * xj;
                    }
                } else if alpha == -T::one() {
                    for (zk, &ajk) in z.iter_mut().zip(row) {
                        *zk = *zk - ajk * xj;
                    }
                } else {
                    let scaled = alpha * xj;
                    for (zk, &ajk) in z.iter_mut().zip(row) {
                        *zk = *zk + ajk * scaled;
                    }
                }
            }
        }
    }
}

/// Step 1 of [`gemv`]: `z = beta * y`, or `z = beta * z` without `y`.
fn scale_into<T: Element>(beta: T, y: Option<&[T]>, z: &mut [T]) {
    if beta == T::zero() {
        z.fill(T::zero());
        return;
    }
    match y {
        Some(y) => {
            if beta == T::one() {
                z.copy_from_slice(y);
            } else if beta == -T::one() {
                for (zi, &yi) in z.iter_mut().zip(y) {
                    *zi = -yi;
                }
            } else {
                for (zi, &yi) in z.iter_mut().zip(y) {
                    *zi = beta * yi;
                }
            }
        }
        None => {
            if beta == -T::one() {
                for zi in z.iter_mut() {
                    *zi = -*zi;
                }
            } else if beta != T::one() {
                for zi in z.iter_mut() {
                    *zi = beta * *zi;
                }
            }
        }
    }
}

/// Rank-1 update: `A = alpha * x * yᵀ` ([`WriteMode::Overwrite`]) or
/// `A += alpha * x * yᵀ` ([`WriteMode::Update`]).
///
/// `A` is `nrow x ncol`, `x` has `nrow` elements, `y` has `ncol`.
///
/// Zero handling differs by mode and is not interchangeable:
/// - Overwrite: `alpha == 0` zeros all of `A`; a row with `x[i] == 0` is
///   written as zeros, replacing stale contents even when `y` holds
///   non-finite values.
/// - Update: `alpha == 0` is a no-op; rows with `x[i] == 0` are skipped.
///
/// Each element is computed as `(alpha * x[i]) * y[j]`.
///
/// # Panics
///
/// Panics if `x` or `y` do not match the shape of `A`.
pub fn geru<T: Element>(mode: WriteMode, alpha: T, x: &[T], y: &[T], a: &mut Matrix<T>) {
    assert_eq!(x.len(), a.nrow(), "geru: x length does not match A rows");
    assert_eq!(y.len(), a.ncol(), "geru: y length does not match A columns");

    match mode {
        WriteMode::Overwrite => {
            if alpha == T::zero() {
                a.fill(T::zero());
                return;
            }
            for (i, &xi) in x.iter().enumerate() {
                let row = a.row_mut(i);
                if xi == T::zero() {
                    row.fill(T::zero());
                    continue;
                }
                let scaled = alpha * xi;
                for (aij, &yj) in row.iter_mut().zip(y) {
                    *aij = scaled * yj;
                }
            }
        }
        WriteMode::Update => {
            if alpha == T::zero() {
                return;
            }
            for (i, &xi) in x.iter().enumerate() {
                if xi == T::zero() {
                    continue;
                }
                let scaled = alpha * xi;
                for (aij, &yj) in a.row_mut(i).iter_mut().zip(y) {
                    *aij = *aij + scaled * yj;
                }
            }
        }
    }
}
