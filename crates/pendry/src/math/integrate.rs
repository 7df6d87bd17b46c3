//! Trapezoidal integration on a uniform grid.
//!
//! The R-factor integrals run over a strictly uniform energy grid, so the
//! trapezoidal rule reduces to a plain sum with half-weighted endpoints.
//! The hot accumulation path computes the full sum first (possibly with
//! SIMD) and applies the endpoint correction afterwards.

// External dependencies
use num_traits::Float;

// Integrate sampled values with constant step.
#[inline]
pub fn trapz_uniform<T: Float>(values: &[T], step: T) -> T {
    let n = values.len();
    if n < 2 {
        return T::zero();
    }
    let mut sum = T::zero();
    for &v in values {
        sum = sum + v;
    }
    trapz_from_sum(sum, values[0], values[n - 1], step)
}

// Turn a full sample sum into the trapezoid value by half-weighting the
// endpoints: step * (sum - (first + last) / 2).
#[inline]
pub fn trapz_from_sum<T: Float>(sum: T, first: T, last: T, step: T) -> T {
    step * (sum - (first + last) / T::from(2.0).unwrap())
}
