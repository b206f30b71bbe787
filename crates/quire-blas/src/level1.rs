//! Vector-vector kernels.

use quire_core::Element;

/// `dst[i] = src[i]`.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn copy<T: Element>(dst: &mut [T], src: &[T]) {
    assert_eq!(dst.len(), src.len(), "copy: dst and src lengths differ");
    dst.copy_from_slice(src);
}

/// `z[i] = x[i] * y[i]`.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn elementwise_mul<T: Element>(x: &[T], y: &[T], z: &mut [T]) {
    assert_eq!(x.len(), y.len(), "elementwise_mul: x and y lengths differ");
    assert_eq!(x.len(), z.len(), "elementwise_mul: x and z lengths differ");
    for ((zi, &xi), &yi) in z.iter_mut().zip(x).zip(y) {
        *zi = xi * yi;
    }
}

/// `y[i] += alpha * x[i]`. A zero `alpha` leaves `y` untouched.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn axpy<T: Element>(alpha: T, x: &[T], y: &mut [T]) {
    assert_eq!(x.len(), y.len(), "axpy: x and y lengths differ");
    if alpha == T::zero() {
        return;
    }
    if alpha == T::one() {
        for (yi, &xi) in y.iter_mut().zip(x) {
            *yi = *yi + xi;
        }
    } else if alpha == -T::one() {
        for (yi, &xi) in y.iter_mut().zip(x) {
            *yi = *yi - xi;
        }
    } else {
        for (yi, &xi) in y.iter_mut().zip(x) {
            *yi = *yi + alpha * xi;
        }
    }
}

/// `x[i] *= alpha`, with `alpha == 0` writing exact zeros (non-finite
/// inputs included).
pub fn scal<T: Element>(alpha: T, x: &mut [T]) {
    if alpha == T::zero() {
        x.fill(T::zero());
    } else if alpha == -T::one() {
        for xi in x.iter_mut() {
            *xi = -*xi;
        }
    } else if alpha != T::one() {
        for xi in x.iter_mut() {
            *xi = alpha * *xi;
        }
    }
}

/// `sum(x[i] * y[i])`, accumulated left to right from zero.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn dot<T: Element>(x: &[T], y: &[T]) -> T {
    assert_eq!(x.len(), y.len(), "dot: x and y lengths differ");
    x.iter()
        .zip(y)
        .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
}
