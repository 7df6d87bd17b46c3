//! Tests for the prelude module.
//!
//! These tests verify that the prelude exports all necessary types for
//! convenient usage of the R-factor API. The prelude should provide a
//! one-stop import for common functionality.
//!
//! ## Test Organization
//!
//! 1. **Import Verification** - All prelude exports are accessible
//! 2. **Builder Pattern** - Complete workflows work with prelude imports
//! 3. **Error Handling** - Error types are usable from the prelude

use pendry::prelude::*;

fn curve() -> (Vec<f64>, Vec<f64>) {
    let e: Vec<f64> = (0..101).map(|i| 50.0 + 0.5 * i as f64).collect();
    let intensity = e
        .iter()
        .map(|&v| 1.0 + (-(v - 75.0) * (v - 75.0) / 50.0).exp())
        .collect();
    (e, intensity)
}

// ============================================================================
// Import Verification Tests
// ============================================================================

/// Test that all prelude imports work correctly.
///
/// Verifies that Pendry (PendryBuilder), the adapter markers, and the
/// result types are usable.
#[test]
fn test_prelude_imports() {
    let (e, intensity) = curve();
    let experiment = BeamSet::full(&e, &intensity, 1).unwrap();
    let theory = BeamSet::full(&e, &intensity, 1).unwrap();

    let result = Pendry::new()
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap()
        .fit(&experiment, &theory);

    assert!(result.is_ok(), "Basic fit should work with prelude imports");
}

/// Test SkipStages is available.
#[test]
fn test_prelude_skip_stages() {
    let _ = Pendry::<f64>::new().skip_stages(SkipStages {
        smoothing: true,
        ..SkipStages::default()
    });
}

/// Test AveragingScheme is available.
#[test]
fn test_prelude_averaging_scheme() {
    let scheme = AveragingScheme::identity(3);
    assert_eq!(scheme.n_out, 3);
    let _ = Pendry::<f64>::new().average_experiment(scheme.groups, scheme.n_out);
}

/// Test adapter types are available.
#[test]
fn test_prelude_adapters() {
    let (e, intensity) = curve();
    let experiment = BeamSet::full(&e, &intensity, 1).unwrap();
    let theory = BeamSet::full(&e, &intensity, 1).unwrap();

    // FixedShift adapter
    let _ = Pendry::<f64>::new()
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap()
        .fit(&experiment, &theory);

    // GridSearch adapter
    let _ = Pendry::<f64>::new()
        .output_grid(50.0, 0.5, 101)
        .shift_range(-8, 8)
        .adapter(GridSearch)
        .build();
}

/// Test complete workflow with prelude.
///
/// Verifies that a full optimization works with only prelude imports.
#[test]
fn test_prelude_complete_workflow() {
    let (e, intensity) = curve();
    let experiment = BeamSet::full(&e, &intensity, 1).unwrap();
    let theory = BeamSet::full(&e, &intensity, 1).unwrap();

    let report: RfactorReport<f64> = Pendry::new()
        .v0i(5.0)
        .degree(3)
        .output_grid(50.0, 0.5, 101)
        .shift_range(-8, 8)
        .beam_groups(vec![1])
        .adapter(GridSearch)
        .build()
        .unwrap()
        .fit(&experiment, &theory)
        .expect("Complete workflow should succeed");

    assert_eq!(report.best_shift, 0);
    assert_eq!(report.n_beams(), 1);
    assert!(report.group_r.is_some());
}

// ============================================================================
// Error Handling Tests
// ============================================================================

/// Test error and advisory types are available.
///
/// Verifies that error handling works with prelude imports.
#[test]
fn test_prelude_error_handling() {
    let err: PendryError = Pendry::<f64>::new()
        .adapter(FixedShift)
        .build()
        .unwrap_err();
    assert_eq!(err.code(), 201);

    let advisory = Advisory::WeakMinimum;
    assert_eq!(advisory.code(), 856);
}
