//! Natural B-spline interpolation with derivative evaluation.
//!
//! ## Purpose
//!
//! This module fits an interpolating cubic B-spline through per-beam
//! intensity samples and evaluates the spline and its first derivative on
//! the uniform output grid. The "natural" boundary condition (vanishing
//! second derivative at both endpoints) closes the collocation system.
//!
//! ## Design notes
//!
//! * **Natural knots**: The knot vector repeats each boundary abscissa
//!   `degree + 1` times and uses the interior data abscissae as-is, giving
//!   `n + 2` coefficients for `n` cubic samples.
//! * **Banded collocation**: Interpolation rows and the two boundary rows
//!   touch at most four basis functions each, so the system is assembled
//!   directly into [`BandMatrix`] with bandwidth 3 on both sides.
//! * **Cached interval search**: Evaluation walks a [`KnotCursor`] forward,
//!   so ascending targets locate their knot interval in amortized constant
//!   time.
//! * **Closed right edge**: The last grid energy belongs to the last knot
//!   interval, so the right endpoint evaluates like any interior point.
//!
//! ## Key concepts
//!
//! * **Cox-de Boor triangle**: Nonzero basis values at a point are built
//!   degree-by-degree from the degree-0 indicator.
//! * **Derivative raising**: Derivatives of degree-k basis functions are
//!   linear combinations of degree-(k-1) values; applying the formula
//!   repeatedly yields any derivative order up to the degree.
//!
//! ## Invariants
//!
//! * `S(x_i) = y_i` for every sample (up to solver round-off).
//! * The spline is C^2 everywhere and has `S'' = 0` at both endpoints.
//! * Evaluation targets must lie inside `[x_first, x_last]`.
//!
//! ## Non-goals
//!
//! * Degrees other than 3; two natural-boundary rows close only the cubic
//!   system.
//! * Smoothing or least-squares fitting; the spline interpolates exactly.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::banded::BandMatrix;
use crate::primitives::errors::PendryError;

/// Spline degree; the natural-boundary closure fixes it to cubic.
pub const DEGREE: usize = 3;

/// Minimum number of samples a beam must carry to be fitted.
#[inline]
pub fn min_samples(degree: usize) -> usize {
    2 * degree + 1
}

// ============================================================================
// Knot Cursor
// ============================================================================

/// Cached ascending search for the knot interval containing a target.
#[derive(Debug, Clone)]
pub struct KnotCursor {
    ell: usize,
    max_ell: usize,
}

impl KnotCursor {
    /// Cursor over a knot vector with `n_knots` entries.
    #[inline]
    pub fn new(n_knots: usize) -> Self {
        Self {
            ell: DEGREE,
            max_ell: n_knots - DEGREE - 2,
        }
    }

    /// Interval `ell` with `knots[ell] <= x < knots[ell + 1]`; the final
    /// interval is closed on the right.
    #[inline]
    pub fn locate<T: Float>(&mut self, knots: &[T], x: T) -> usize {
        while self.ell > DEGREE && x < knots[self.ell] {
            self.ell -= 1;
        }
        while self.ell < self.max_ell && x >= knots[self.ell + 1] {
            self.ell += 1;
        }
        self.ell
    }
}

// ============================================================================
// Basis Evaluation
// ============================================================================

/// Nonzero basis derivative values at `x` in interval `ell`.
///
/// Returns `d^nu/dx^nu B_{j,3}(x)` for the four indices
/// `j = ell - 3 ..= ell`; `nu` must not exceed the degree.
fn basis_derivs<T: Float>(knots: &[T], ell: usize, x: T, nu: usize) -> [T; DEGREE + 1] {
    debug_assert!(nu <= DEGREE, "basis_derivs: derivative order too high");

    let mut vals = [T::zero(); DEGREE + 1];
    vals[0] = T::one();

    // Cox-de Boor triangle up to degree (DEGREE - nu).
    let d0 = DEGREE - nu;
    for d in 1..=d0 {
        let mut saved = T::zero();
        for r in 0..d {
            let t_right = knots[ell + r + 1];
            let t_left = knots[ell + 1 + r - d];
            let term = vals[r] / (t_right - t_left);
            vals[r] = saved + (t_right - x) * term;
            saved = (x - t_left) * term;
        }
        vals[d] = saved;
    }

    // Raise back to the spline degree, differentiating once per level.
    let mut d = d0;
    while d < DEGREE {
        let dd = d + 1;
        let mut next = [T::zero(); DEGREE + 1];
        for (r, slot) in next.iter_mut().enumerate().take(dd + 1) {
            let j = ell + r - dd;
            let mut acc = T::zero();
            if r >= 1 {
                let den = knots[j + dd] - knots[j];
                if den > T::zero() {
                    acc = acc + vals[r - 1] / den;
                }
            }
            if r <= d {
                let den = knots[j + dd + 1] - knots[j + 1];
                if den > T::zero() {
                    acc = acc - vals[r] / den;
                }
            }
            *slot = T::from(dd).unwrap() * acc;
        }
        vals = next;
        d = dd;
    }

    vals
}

// ============================================================================
// Natural Spline
// ============================================================================

/// Interpolating cubic B-spline with natural boundary conditions.
#[derive(Debug, Clone)]
pub struct NaturalSpline<T> {
    knots: Vec<T>,
    coeffs: Vec<T>,
}

impl<T: Float> NaturalSpline<T> {
    /// Fit the spline through `(x, y)` samples.
    ///
    /// `x` must be strictly increasing with at least `2 * degree + 1`
    /// entries; violations fail with a bad-grid or too-few-points error, a
    /// solver breakdown with the singular-spline error.
    pub fn fit(x: &[T], y: &[T]) -> Result<Self, PendryError> {
        let n = x.len();
        if n != y.len() {
            return Err(PendryError::MismatchedInputs {
                expected: n,
                got: y.len(),
            });
        }
        if n < min_samples(DEGREE) {
            return Err(PendryError::TooFewPoints {
                got: n,
                min: min_samples(DEGREE),
            });
        }
        for w in x.windows(2) {
            if !(w[1] > w[0]) {
                return Err(PendryError::BadGrid(format!(
                    "sample abscissae must be strictly increasing ({} before {})",
                    w[0].to_f64().unwrap_or(f64::NAN),
                    w[1].to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        // Natural knot vector: (degree + 1)-fold boundary repetition around
        // the interior abscissae.
        let mut knots = Vec::with_capacity(n + 2 * DEGREE);
        for _ in 0..=DEGREE {
            knots.push(x[0]);
        }
        knots.extend_from_slice(&x[1..n - 1]);
        for _ in 0..=DEGREE {
            knots.push(x[n - 1]);
        }
        let nt = n + DEGREE - 1;
        debug_assert_eq!(knots.len(), nt + DEGREE + 1);

        let mut band = BandMatrix::new(nt, DEGREE, DEGREE);
        let mut rhs = vec![T::zero(); nt];

        // Row 0: S''(x_first) = 0.
        let d2 = basis_derivs(&knots, DEGREE, x[0], 2);
        for (r, &v) in d2.iter().enumerate() {
            band.set(0, r, v);
        }

        // Interpolation rows.
        let mut cursor = KnotCursor::new(knots.len());
        for i in 0..n {
            let ell = cursor.locate(&knots, x[i]);
            let b0 = basis_derivs(&knots, ell, x[i], 0);
            for (r, &v) in b0.iter().enumerate() {
                band.set(i + 1, ell - DEGREE + r, v);
            }
            rhs[i + 1] = y[i];
        }

        // Last row: S''(x_last) = 0.
        let last_ell = nt - 1;
        let d2 = basis_derivs(&knots, last_ell, x[n - 1], 2);
        for (r, &v) in d2.iter().enumerate() {
            band.set(nt - 1, last_ell - DEGREE + r, v);
        }

        let factored = band.factor()?;
        factored.solve_into(&mut rhs);

        Ok(Self { knots, coeffs: rhs })
    }

    /// First sample abscissa (left domain edge).
    #[inline]
    pub fn domain_start(&self) -> T {
        self.knots[DEGREE]
    }

    /// Last sample abscissa (right domain edge, included).
    #[inline]
    pub fn domain_end(&self) -> T {
        self.knots[self.knots.len() - DEGREE - 1]
    }

    /// Evaluate the spline and its first derivative on non-decreasing
    /// targets, writing into `values` and `derivs`.
    ///
    /// Targets must lie inside the fitted domain up to round-off; anything
    /// further out fails with a bad-grid error.
    pub fn evaluate_into(
        &self,
        targets: &[T],
        values: &mut [T],
        derivs: &mut [T],
    ) -> Result<(), PendryError> {
        debug_assert_eq!(targets.len(), values.len());
        debug_assert_eq!(targets.len(), derivs.len());

        let lo = self.domain_start();
        let hi = self.domain_end();
        let slack = (hi - lo) * T::from(1e-9).unwrap();

        let mut cursor = KnotCursor::new(self.knots.len());
        for (i, &target) in targets.iter().enumerate() {
            if target < lo - slack || target > hi + slack {
                return Err(PendryError::BadGrid(format!(
                    "evaluation target {} outside spline domain [{}, {}]",
                    target.to_f64().unwrap_or(f64::NAN),
                    lo.to_f64().unwrap_or(f64::NAN),
                    hi.to_f64().unwrap_or(f64::NAN)
                )));
            }
            // Round-off from grid arithmetic may leave a target a few ulps
            // outside the domain.
            let x = target.max(lo).min(hi);

            let ell = cursor.locate(&self.knots, x);
            let b0 = basis_derivs(&self.knots, ell, x, 0);
            let b1 = basis_derivs(&self.knots, ell, x, 1);

            let mut v = T::zero();
            let mut dv = T::zero();
            for r in 0..=DEGREE {
                let c = self.coeffs[ell - DEGREE + r];
                v = v + c * b0[r];
                dv = dv + c * b1[r];
            }
            values[i] = v;
            derivs[i] = dv;
        }
        Ok(())
    }
}
