//! Squared-error cost `c = ½·Σ(y - t)²`.

/// `0.5 · Σ (y[i] - target[i])²`.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn squared_error(y: &[f64], target: &[f64]) -> f64 {
    assert_eq!(
        y.len(),
        target.len(),
        "squared_error: y/target length mismatch"
    );
    0.5 * y
        .iter()
        .zip(target)
        .map(|(&yi, &ti)| (yi - ti) * (yi - ti))
        .sum::<f64>()
}

/// `out[i] = y[i] - target[i]`, the gradient of [`squared_error`] in `y`.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn squared_error_grad(y: &[f64], target: &[f64], out: &mut [f64]) {
    assert_eq!(
        y.len(),
        target.len(),
        "squared_error_grad: y/target length mismatch"
    );
    assert_eq!(
        y.len(),
        out.len(),
        "squared_error_grad: y/out length mismatch"
    );
    for ((o, &yi), &ti) in out.iter_mut().zip(y).zip(target) {
        *o = yi - ti;
    }
}
