#![cfg(feature = "dev")]
//! Tests for the beam preparation pipeline.
//!
//! These tests drive the executor's five stages directly: range limiting,
//! averaging, the smoothing hook, interpolation, and the Y transform,
//! together with the stage-skip semantics and the scheme error codes.
//!
//! ## Test Organization
//!
//! 1. **Interpolation** - Grid placement and sample reproduction
//! 2. **Range Limiting** - Clipping and non-fatal discards
//! 3. **Averaging** - Means, intersections, scheme errors
//! 4. **Stage Skipping** - Per-stage flags and their preconditions
//! 5. **Hooks** - Smoothing pass injection

use approx::assert_relative_eq;

use pendry::internals::engine::executor::{
    PendryExecutor, PrepareConfig, SkipStages,
};
use pendry::internals::engine::validator::AveragingScheme;
use pendry::internals::primitives::beamset::BeamSet;
use pendry::internals::primitives::errors::PendryError;
use pendry::internals::primitives::grid::EnergyGrid;

fn energies(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

fn bump(e: f64) -> f64 {
    1.0 + (-(e - 75.0) * (e - 75.0) / 50.0).exp()
}

// ============================================================================
// Interpolation Tests
// ============================================================================

/// Test interpolation onto a finer output grid.
///
/// Every input sample coincides with an even output-grid point, where the
/// spline must reproduce it.
#[test]
fn test_prepare_interpolates_onto_grid() {
    let e_in = energies(50.0, 1.0, 51);
    let intensity: Vec<f64> = e_in.iter().map(|&e| bump(e)).collect();
    let beams = BeamSet::full(&e_in, &intensity, 1).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let config = PrepareConfig::new(5.0);
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    assert_eq!(prepared.supports[0].first, 0);
    assert_eq!(prepared.supports[0].len, 101);

    let column = prepared.intensity_column(0);
    for (i, &sample) in intensity.iter().enumerate() {
        assert_relative_eq!(column[2 * i], sample, epsilon = 1e-9);
    }
    assert!(prepared.y_column(0).iter().all(|v| v.is_finite()));
}

/// Test per-beam supports narrower than the grid.
///
/// The output support must cover exactly the grid points inside the
/// beam's input range.
#[test]
fn test_prepare_partial_support() {
    let e_in = energies(50.0, 0.5, 101);
    let intensity: Vec<f64> = e_in.iter().map(|&e| bump(e)).collect();
    // Valid samples only on [60, 80]: indices 20..=60.
    let beams = BeamSet::new(&e_in, &intensity, &[20], &[41]).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let config = PrepareConfig::new(5.0);
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    assert_eq!(prepared.supports[0].first, 20);
    assert_eq!(prepared.supports[0].len, 41);
}

// ============================================================================
// Range Limiting Tests
// ============================================================================

/// Test that a beam outside the output window is dropped, not fatal.
///
/// The short beam gets an empty output support and advisory 211; the
/// surviving beam is untouched.
#[test]
fn test_prepare_range_limit_discard() {
    let e_in = energies(50.0, 0.5, 101);
    let mut intensity = vec![0.0f64; 2 * 101];
    for (i, &e) in e_in.iter().enumerate() {
        intensity[i] = bump(e);
        intensity[101 + i] = bump(e);
    }
    // Beam 1 lives entirely below the output window.
    let beams = BeamSet::new(&e_in, &intensity, &[0, 0], &[101, 10]).unwrap();

    let grid = EnergyGrid::new(70.0, 0.5, 41);
    let config = PrepareConfig::new(5.0);
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    assert!(prepared.advisories.iter().any(|a| a.code() == 211));
    assert!(prepared.supports[1].is_empty());
    assert_eq!(prepared.supports[0].len, 41);
}

// ============================================================================
// Averaging Tests
// ============================================================================

/// Test the unweighted mean over a two-beam group.
#[test]
fn test_prepare_averaging_means_members() {
    let e_in = energies(50.0, 0.5, 101);
    let mut intensity = vec![0.0f64; 2 * 101];
    for (i, &e) in e_in.iter().enumerate() {
        intensity[i] = bump(e);
        intensity[101 + i] = bump(e) + 0.2;
    }
    let beams = BeamSet::full(&e_in, &intensity, 2).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let scheme = AveragingScheme {
        groups: vec![1, 1],
        n_out: 1,
    };
    let config = PrepareConfig {
        scheme: Some(&scheme),
        ..PrepareConfig::new(5.0)
    };
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    assert_eq!(prepared.n_beams(), 1);
    let column = prepared.intensity_column(0);
    for (i, &e) in e_in.iter().enumerate() {
        assert_relative_eq!(column[i], bump(e) + 0.1, epsilon = 1e-9);
    }
}

/// Test that a group with a too-short support intersection is fatal.
#[test]
fn test_prepare_group_too_short() {
    let e_in = energies(50.0, 0.5, 101);
    let intensity = vec![1.0f64; 2 * 101];
    let beams = BeamSet::new(&e_in, &intensity, &[0, 70], &[30, 31]).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let scheme = AveragingScheme {
        groups: vec![1, 1],
        n_out: 1,
    };
    let config = PrepareConfig {
        scheme: Some(&scheme),
        ..PrepareConfig::new(5.0)
    };
    let err = PendryExecutor::prepare(&beams, &grid, &config).unwrap_err();
    assert_eq!(err.code(), 222);
}

/// Test scheme shape validation (code 220).
#[test]
fn test_prepare_scheme_invalid() {
    let e_in = energies(50.0, 0.5, 101);
    let intensity = vec![1.0f64; 2 * 101];
    let beams = BeamSet::full(&e_in, &intensity, 2).unwrap();
    let grid = EnergyGrid::new(50.0, 0.5, 101);

    // More output beams than input beams.
    let scheme = AveragingScheme {
        groups: vec![1, 2],
        n_out: 3,
    };
    let config = PrepareConfig {
        scheme: Some(&scheme),
        ..PrepareConfig::new(5.0)
    };
    assert_eq!(
        PendryExecutor::prepare(&beams, &grid, &config).unwrap_err().code(),
        220
    );

    // Output group 2 has no members.
    let scheme = AveragingScheme {
        groups: vec![1, 1],
        n_out: 2,
    };
    let config = PrepareConfig {
        scheme: Some(&scheme),
        ..PrepareConfig::new(5.0)
    };
    assert_eq!(
        PendryExecutor::prepare(&beams, &grid, &config).unwrap_err().code(),
        220
    );
}

/// Test the skipped-averaging beam-count check (code 223).
#[test]
fn test_prepare_scheme_mismatch_when_skipped() {
    let e_in = energies(50.0, 0.5, 101);
    let intensity = vec![1.0f64; 2 * 101];
    let beams = BeamSet::full(&e_in, &intensity, 2).unwrap();
    let grid = EnergyGrid::new(50.0, 0.5, 101);

    let scheme = AveragingScheme {
        groups: vec![1, 1],
        n_out: 1,
    };
    let config = PrepareConfig {
        scheme: Some(&scheme),
        skip: SkipStages {
            avg_reorder: true,
            ..SkipStages::default()
        },
        ..PrepareConfig::new(5.0)
    };
    let err = PendryExecutor::prepare(&beams, &grid, &config).unwrap_err();
    assert_eq!(err.code(), 223);
}

// ============================================================================
// Stage Skipping Tests
// ============================================================================

/// Test that skipping interpolation requires matching grids.
#[test]
fn test_skip_interpolation_requires_matching_grid() {
    let e_in = energies(50.0, 1.0, 51);
    let intensity: Vec<f64> = e_in.iter().map(|&e| bump(e)).collect();
    let beams = BeamSet::full(&e_in, &intensity, 1).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let config = PrepareConfig {
        skip: SkipStages {
            interpolation: true,
            ..SkipStages::default()
        },
        ..PrepareConfig::new(5.0)
    };
    let err = PendryExecutor::prepare(&beams, &grid, &config).unwrap_err();
    assert_eq!(err.code(), 201);
}

/// Test the skip-interpolation copy path with finite differences.
///
/// On a matching grid the intensities pass through unchanged and a linear
/// curve's finite-difference derivative is exact.
#[test]
fn test_skip_interpolation_copies_and_differences() {
    let e_in = energies(50.0, 0.5, 101);
    let intensity: Vec<f64> = e_in.iter().map(|&e| 0.4 * e + 2.0).collect();
    let beams = BeamSet::full(&e_in, &intensity, 1).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let config = PrepareConfig {
        skip: SkipStages {
            interpolation: true,
            ..SkipStages::default()
        },
        ..PrepareConfig::new(5.0)
    };
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    assert_eq!(prepared.intensity_column(0), &intensity[..]);
    for &d in prepared.derivative_column(0) {
        assert_relative_eq!(d, 0.4, epsilon = 1e-9);
    }
}

/// Test that skipping the Y stage carries the intensities through.
#[test]
fn test_skip_y_function() {
    let e_in = energies(50.0, 0.5, 101);
    let intensity: Vec<f64> = e_in.iter().map(|&e| bump(e)).collect();
    let beams = BeamSet::full(&e_in, &intensity, 1).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let config = PrepareConfig {
        skip: SkipStages {
            y_function: true,
            ..SkipStages::default()
        },
        ..PrepareConfig::new(5.0)
    };
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    assert_eq!(prepared.y, prepared.intensity);
}

// ============================================================================
// Hook Tests
// ============================================================================

/// Test smoothing pass injection.
///
/// A pass that doubles the intensities must double the interpolated
/// values at the sample points.
#[test]
fn test_smoothing_hook_applied() {
    fn doubling_pass(_x: &[f64], y: &mut [f64]) {
        for v in y.iter_mut() {
            *v *= 2.0;
        }
    }

    let e_in = energies(50.0, 0.5, 101);
    let intensity: Vec<f64> = e_in.iter().map(|&e| bump(e)).collect();
    let beams = BeamSet::full(&e_in, &intensity, 1).unwrap();

    let grid = EnergyGrid::new(50.0, 0.5, 101);
    let config = PrepareConfig {
        smooth_pass: Some(doubling_pass),
        ..PrepareConfig::new(5.0)
    };
    let prepared = PendryExecutor::prepare(&beams, &grid, &config).unwrap();

    let column = prepared.intensity_column(0);
    for (i, &e) in e_in.iter().enumerate() {
        assert_relative_eq!(column[i], 2.0 * bump(e), epsilon = 1e-9);
    }
}
