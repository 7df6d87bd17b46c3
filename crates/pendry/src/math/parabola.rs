//! Weighted parabola least-squares fit.
//!
//! ## Purpose
//!
//! This module fits `y = a*x^2 + b*x + c` to weighted samples by solving
//! the 3x3 symmetric normal equations with a symmetric-indefinite LDL^T
//! factorization. The V0r optimizer uses the fit to predict the location
//! of the R-factor minimum and to judge fit quality via the weighted
//! coefficient of determination.
//!
//! ## Design notes
//!
//! * **Accumulate then solve**: One pass gathers the moment sums, a
//!   closed-form LDL^T solves the fixed-size system; no general solver is
//!   involved.
//! * **Pivot policy**: A pivot that is singular or non-positive fails with
//!   the singular-parabola error; the normal matrix of a genuine fit is
//!   positive definite, so a lost pivot always means degenerate data.
//! * **Generics**: All computations are generic over `Float` types.
//!
//! ## Invariants
//!
//! * Sample, value, and weight slices share one length.
//! * A successful fit has strictly positive pivots in all three positions.
//!
//! ## Non-goals
//!
//! * Polynomial degrees other than 2.
//! * Robust or iteratively reweighted fitting.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::PendryError;

// ============================================================================
// Parabola Coefficients
// ============================================================================

/// Quadratic `y = a*x^2 + b*x + c` fitted to weighted samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola<T> {
    /// Quadratic coefficient.
    pub a: T,

    /// Linear coefficient.
    pub b: T,

    /// Constant coefficient.
    pub c: T,
}

impl<T: Float> Parabola<T> {
    /// Evaluate the parabola at `x`.
    #[inline]
    pub fn value(&self, x: T) -> T {
        (self.a * x + self.b) * x + self.c
    }

    /// Curvature `2a`.
    #[inline]
    pub fn curvature(&self) -> T {
        self.a + self.a
    }

    /// Abscissa of the stationary point, `-b / (2a)`.
    #[inline]
    pub fn vertex(&self) -> T {
        -self.b / self.curvature()
    }

    /// Ordinate of the stationary point, `c - b^2 / (4a)`.
    #[inline]
    pub fn value_at_vertex(&self) -> T {
        self.c - self.b * self.b / (T::from(4.0).unwrap() * self.a)
    }
}

// ============================================================================
// Weighted Fit
// ============================================================================

/// Fit a parabola to weighted samples.
///
/// Samples with zero weight contribute nothing; at least three distinct
/// weighted abscissae are needed for the normal matrix to keep its pivots.
pub fn fit_weighted<T: Float>(xs: &[T], ys: &[T], ws: &[T]) -> Result<Parabola<T>, PendryError> {
    debug_assert_eq!(xs.len(), ys.len(), "fit_weighted: sample length mismatch");
    debug_assert_eq!(xs.len(), ws.len(), "fit_weighted: weight length mismatch");

    let mut s0 = T::zero();
    let mut s1 = T::zero();
    let mut s2 = T::zero();
    let mut s3 = T::zero();
    let mut s4 = T::zero();
    let mut m0 = T::zero();
    let mut m1 = T::zero();
    let mut m2 = T::zero();

    for i in 0..xs.len() {
        let w = ws[i];
        if w <= T::zero() {
            continue;
        }
        let x = xs[i];
        let y = ys[i];
        let wx = w * x;
        let wxx = wx * x;

        s0 = s0 + w;
        s1 = s1 + wx;
        s2 = s2 + wxx;
        s3 = s3 + wxx * x;
        s4 = s4 + wxx * x * x;
        m0 = m0 + w * y;
        m1 = m1 + wx * y;
        m2 = m2 + wxx * y;
    }

    // Normal equations for (a, b, c).
    let row0 = [s4, s3, s2];
    let row1 = [s3, s2, s1];
    let row2 = [s2, s1, s0];
    let [a, b, c] = ldlt3([row0, row1, row2], [m2, m1, m0])?;
    Ok(Parabola { a, b, c })
}

/// Weighted coefficient of determination of a fitted parabola.
///
/// `R^2 = 1 - SS_res / SS_tot` around the weighted mean; a degenerate
/// total sum of squares maps to 1 for an exact fit and 0 otherwise.
pub fn weighted_r_squared<T: Float>(parabola: &Parabola<T>, xs: &[T], ys: &[T], ws: &[T]) -> T {
    let mut w_sum = T::zero();
    let mut wy_sum = T::zero();
    for i in 0..xs.len() {
        if ws[i] > T::zero() {
            w_sum = w_sum + ws[i];
            wy_sum = wy_sum + ws[i] * ys[i];
        }
    }
    if w_sum <= T::zero() {
        return T::zero();
    }
    let mean = wy_sum / w_sum;

    let mut ss_tot = T::zero();
    let mut ss_res = T::zero();
    for i in 0..xs.len() {
        let w = ws[i];
        if w <= T::zero() {
            continue;
        }
        let d_tot = ys[i] - mean;
        let d_res = ys[i] - parabola.value(xs[i]);
        ss_tot = ss_tot + w * d_tot * d_tot;
        ss_res = ss_res + w * d_res * d_res;
    }

    let tiny = T::from(1e-12).unwrap();
    if ss_tot > tiny * (mean * mean + T::one()) {
        T::one() - ss_res / ss_tot
    } else if ss_res <= tiny {
        T::one()
    } else {
        T::zero()
    }
}

// ============================================================================
// Symmetric-Indefinite 3x3 Solve
// ============================================================================

/// Solve the symmetric system `M x = rhs` by LDL^T.
///
/// Fails with [`PendryError::SingularParabola`] when a pivot is singular or
/// non-positive.
fn ldlt3<T: Float>(m: [[T; 3]; 3], rhs: [T; 3]) -> Result<[T; 3], PendryError> {
    let scale = m[0][0].abs().max(m[1][1].abs()).max(m[2][2].abs());
    let tol = (scale.max(T::one())) * T::epsilon() * T::from(16.0).unwrap();

    let d1 = m[0][0];
    if d1 <= tol || !d1.is_finite() {
        return Err(PendryError::SingularParabola);
    }
    let l21 = m[1][0] / d1;
    let l31 = m[2][0] / d1;

    let d2 = m[1][1] - l21 * l21 * d1;
    if d2 <= tol || !d2.is_finite() {
        return Err(PendryError::SingularParabola);
    }
    let l32 = (m[2][1] - l31 * l21 * d1) / d2;

    let d3 = m[2][2] - l31 * l31 * d1 - l32 * l32 * d2;
    if d3 <= tol || !d3.is_finite() {
        return Err(PendryError::SingularParabola);
    }

    // Forward: L z = rhs.
    let z1 = rhs[0];
    let z2 = rhs[1] - l21 * z1;
    let z3 = rhs[2] - l31 * z1 - l32 * z2;

    // Diagonal and transpose sweeps.
    let w1 = z1 / d1;
    let w2 = z2 / d2;
    let w3 = z3 / d3;

    let x3 = w3;
    let x2 = w2 - l32 * x3;
    let x1 = w1 - l21 * x2 - l31 * x3;

    Ok([x1, x2, x3])
}
