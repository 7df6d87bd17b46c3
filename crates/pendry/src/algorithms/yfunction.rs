//! Pendry Y-function evaluation.
//!
//! The Y-function `Y = I*I' / (I^2 + V0i^2 * I'^2)` makes the R-factor
//! insensitive to the absolute intensity scale. With a positive imaginary
//! inner potential the denominator is strictly positive for finite inputs,
//! so no guarding is required; the degenerate `V0i = 0`, `I = I' = 0` case
//! is defined as zero.

// External dependencies
use num_traits::Float;

// Pointwise Y-function.
#[inline]
pub fn pendry_y<T: Float>(intensity: T, derivative: T, v0i: T) -> T {
    let den = intensity * intensity + v0i * v0i * derivative * derivative;
    if den == T::zero() {
        return T::zero();
    }
    intensity * derivative / den
}

// Apply the Y-function over matching slices.
#[inline]
pub fn pendry_y_into<T: Float>(intensity: &[T], derivative: &[T], v0i: T, out: &mut [T]) {
    debug_assert_eq!(intensity.len(), derivative.len());
    debug_assert_eq!(intensity.len(), out.len());
    for i in 0..out.len() {
        out[i] = pendry_y(intensity[i], derivative[i], v0i);
    }
}
