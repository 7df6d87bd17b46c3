#![cfg(feature = "dev")]
//! Tests for the banded factorization and solve.
//!
//! These tests verify the solver primitive behind the spline collocation
//! fit: band assembly, partial pivoting, and singularity detection.
//!
//! ## Test Organization
//!
//! 1. **Solves** - Known systems with and without pivoting
//! 2. **Failure Modes** - Singular systems

use approx::assert_relative_eq;

use pendry::internals::math::banded::BandMatrix;
use pendry::internals::primitives::errors::PendryError;

// ============================================================================
// Solve Tests
// ============================================================================

/// Test a symmetric tridiagonal solve.
///
/// Verifies the band layout and both substitution sweeps.
#[test]
fn test_banded_tridiagonal_solve() {
    // [2 1 0; 1 2 1; 0 1 2] x = [3 4 3] has solution x = [1 1 1].
    let mut band = BandMatrix::<f64>::new(3, 1, 1);
    for i in 0..3 {
        band.set(i, i, 2.0);
    }
    band.set(0, 1, 1.0);
    band.set(1, 0, 1.0);
    band.set(1, 2, 1.0);
    band.set(2, 1, 1.0);

    let factored = band.factor().unwrap();
    let mut rhs = vec![3.0, 4.0, 3.0];
    factored.solve_into(&mut rhs);

    for &v in &rhs {
        assert_relative_eq!(v, 1.0, epsilon = 1e-12);
    }
}

/// Test a solve that requires a row interchange.
///
/// A zero on the leading diagonal forces the pivot search to pick the
/// subdiagonal entry.
#[test]
fn test_banded_solve_with_pivoting() {
    // [0 1; 1 0] x = [5, 7] has solution x = [7, 5].
    let mut band = BandMatrix::<f64>::new(2, 1, 1);
    band.set(0, 1, 1.0);
    band.set(1, 0, 1.0);

    let factored = band.factor().unwrap();
    let mut rhs = vec![5.0, 7.0];
    factored.solve_into(&mut rhs);

    assert_relative_eq!(rhs[0], 7.0, epsilon = 1e-12);
    assert_relative_eq!(rhs[1], 5.0, epsilon = 1e-12);
}

/// Test a wider band with fill-in.
///
/// Verifies a bandwidth-2 system against a dense reference solution.
#[test]
fn test_banded_wide_band_solve() {
    // Pentadiagonal 5x5 with rows [4 1 1 0 0], [1 4 1 1 0], ...
    let n = 5;
    let mut band = BandMatrix::<f64>::new(n, 2, 2);
    for i in 0..n {
        band.set(i, i, 4.0);
        for d in 1..=2usize {
            if i + d < n {
                band.set(i, i + d, 1.0);
                band.set(i + d, i, 1.0);
            }
        }
    }

    // Right-hand side chosen so x = [1, 2, 3, 4, 5].
    let x_true = [1.0, 2.0, 3.0, 4.0, 5.0];
    let mut rhs = vec![0.0; n];
    for i in 0..n {
        let mut acc = 4.0 * x_true[i];
        for d in 1..=2usize {
            if i + d < n {
                acc += x_true[i + d];
            }
            if i >= d {
                acc += x_true[i - d];
            }
        }
        rhs[i] = acc;
    }

    let factored = band.factor().unwrap();
    factored.solve_into(&mut rhs);

    for (&computed, &expected) in rhs.iter().zip(x_true.iter()) {
        assert_relative_eq!(computed, expected, epsilon = 1e-12);
    }
}

// ============================================================================
// Failure Mode Tests
// ============================================================================

/// Test that a singular system is detected.
///
/// Verifies the zero-pivot error and its column report.
#[test]
fn test_banded_singular_detection() {
    // Second column is all zeros.
    let mut band = BandMatrix::<f64>::new(3, 1, 1);
    band.set(0, 0, 1.0);
    band.set(2, 2, 1.0);

    let err = band.factor().unwrap_err();
    match &err {
        PendryError::SingularSpline { column } => assert_eq!(*column, 1),
        other => panic!("expected SingularSpline, got {other:?}"),
    }
    assert_eq!(err.code(), 230);
}
