//! Tests for the public builder API and end-to-end calculations.
//!
//! These tests exercise the crate exactly as a structure-search driver
//! would: build a model, feed two curve sets, and read the report.
//!
//! ## Test Organization
//!
//! 1. **End-to-End Scenarios** - Identity, offsets, shift recovery,
//!    disjoint beams, averaging
//! 2. **Builder Validation** - Error codes for bad configuration
//! 3. **Report** - Grouped aggregates and display formatting

use pendry::prelude::*;

fn energies() -> Vec<f64> {
    (0..101).map(|i| 50.0 + 0.5 * i as f64).collect()
}

/// Narrow Gaussian bump; negligible at the grid edges.
fn bump(e: f64) -> f64 {
    (-(e - 75.0) * (e - 75.0) / 25.0).exp()
}

// ============================================================================
// End-to-End Scenario Tests
// ============================================================================

/// Test that identical curves at zero shift score exactly zero.
#[test]
fn test_identical_beams_zero_shift() {
    let e = energies();
    let intensity: Vec<f64> = e.iter().map(|&v| bump(v)).collect();

    let experiment = BeamSet::full(&e, &intensity, 1).unwrap();
    let theory = BeamSet::full(&e, &intensity, 1).unwrap();

    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap();

    let report = model.fit(&experiment, &theory).unwrap();

    assert_eq!(report.r_factor, 0.0);
    assert_eq!(report.overlap_counts[0], 101);
    assert_eq!(report.n_evaluations, 1);
    assert!(report.advisories.is_empty());
}

/// Test that a constant intensity offset raises R monotonically.
#[test]
fn test_constant_offset_monotonic() {
    let e = energies();
    let base: Vec<f64> = e.iter().map(|&v| 1.0 + bump(v)).collect();
    let experiment = BeamSet::full(&e, &base, 1).unwrap();

    let mut previous = 0.0;
    for offset in [0.1, 0.2, 0.4] {
        let shifted: Vec<f64> = base.iter().map(|&v| v + offset).collect();
        let theory = BeamSet::full(&e, &shifted, 1).unwrap();

        let model = Pendry::new()
            .v0i(5.0)
            .output_grid(50.0, 0.5, 101)
            .adapter(FixedShift)
            .build()
            .unwrap();
        let report = model.fit(&experiment, &theory).unwrap();

        assert!(
            report.r_factor > previous,
            "offset {offset} should raise R above {previous}, got {}",
            report.r_factor
        );
        previous = report.r_factor;
    }
}

/// Test shift recovery.
///
/// The theoretical curve is the experimental one translated down by 2.0
/// energy units (4 grid steps); the optimizer must recover the shift with
/// a near-zero residual R.
#[test]
fn test_shift_recovery() {
    let e = energies();
    let exp_intensity: Vec<f64> = e.iter().map(|&v| 1.0 + bump(v)).collect();
    let theo_intensity: Vec<f64> = e.iter().map(|&v| 1.0 + bump(v + 2.0)).collect();

    let experiment = BeamSet::full(&e, &exp_intensity, 1).unwrap();
    let theory = BeamSet::full(&e, &theo_intensity, 1).unwrap();

    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 101)
        .shift_range(-10, 10)
        .guesses(-5, 0, 5)
        .adapter(GridSearch)
        .build()
        .unwrap();

    let report = model.fit(&experiment, &theory).unwrap();

    assert_eq!(report.best_shift, 4);
    assert!(
        report.r_factor <= 1e-6,
        "residual R should vanish at the recovered shift, got {}",
        report.r_factor
    );
}

/// Test that a disjoint beam pair is excluded from the aggregate.
#[test]
fn test_disjoint_beam_excluded() {
    let e: Vec<f64> = (0..200).map(|i| 50.0 + 0.5 * i as f64).collect();
    let curve: Vec<f64> = e.iter().map(|&v| 1.0 + (v / 9.0).sin().powi(2)).collect();
    let mut intensity = vec![0.0f64; 2 * 200];
    intensity[..200].copy_from_slice(&curve);
    intensity[200..].copy_from_slice(&curve);

    let experiment = BeamSet::new(&e, &intensity, &[0, 0], &[200, 20]).unwrap();
    let theory = BeamSet::new(&e, &intensity, &[0, 100], &[200, 20]).unwrap();

    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 200)
        .adapter(FixedShift)
        .build()
        .unwrap();

    let report = model.fit(&experiment, &theory).unwrap();

    assert!(report.has_advisory(212));
    assert!(report.r_beams[1].is_nan());
    assert_eq!(report.overlap_counts[1], 0);
    // The aggregate reduces to the overlapping beam, which is identical.
    assert_eq!(report.r_factor, 0.0);
}

/// Test noise reduction through symmetry averaging.
///
/// Averaging two equivalent noisy measurements must score markedly better
/// against the noise-free truth than either measurement alone.
#[test]
fn test_averaging_reduces_noise() {
    let e = energies();
    let truth: Vec<f64> = e.iter().map(|&v| 1.0 + bump(v)).collect();
    let noise1: Vec<f64> = e.iter().map(|&v| 0.1 * (2.3 * v).sin()).collect();
    let noise2: Vec<f64> = e
        .iter()
        .zip(noise1.iter())
        .map(|(&v, &n1)| -0.8 * n1 + 0.02 * (3.1 * v + 1.0).sin())
        .collect();

    let mut noisy_pair = vec![0.0f64; 2 * 101];
    for i in 0..101 {
        noisy_pair[i] = truth[i] + noise1[i];
        noisy_pair[101 + i] = truth[i] + noise2[i];
    }

    let theory_set = BeamSet::full(&e, &truth, 1).unwrap();

    // Averaged: both equivalents folded into one beam.
    let experiment = BeamSet::full(&e, &noisy_pair, 2).unwrap();
    let averaged_model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 101)
        .average_experiment(vec![1, 1], 1)
        .adapter(FixedShift)
        .build()
        .unwrap();
    let r_averaged = averaged_model
        .fit(&experiment, &theory_set)
        .unwrap()
        .r_factor;

    // Single noisy beam, no averaging.
    let single: Vec<f64> = noisy_pair[..101].to_vec();
    let experiment_single = BeamSet::full(&e, &single, 1).unwrap();
    let single_model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap();
    let r_single = single_model
        .fit(&experiment_single, &theory_set)
        .unwrap()
        .r_factor;

    assert!(r_single > 0.0);
    assert!(
        r_averaged <= 0.5 * r_single,
        "averaging should at least halve the noise R: {r_averaged} vs {r_single}"
    );
}

// ============================================================================
// Builder Validation Tests
// ============================================================================

/// Test duplicate-parameter detection.
#[test]
fn test_builder_duplicate_parameter() {
    let err = Pendry::<f64>::new()
        .v0i(5.0)
        .v0i(4.0)
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap_err();
    assert_eq!(err.code(), 101);
}

/// Test that the output grid is required.
#[test]
fn test_builder_requires_output_grid() {
    let err = Pendry::<f64>::new().adapter(FixedShift).build().unwrap_err();
    assert_eq!(err.code(), 201);
}

/// Test parameter bound errors and their codes.
#[test]
fn test_builder_parameter_codes() {
    let grid = |b: pendry::prelude::Pendry<f64>| b.output_grid(50.0, 0.5, 101);

    let err = grid(Pendry::new().v0i(-1.0)).adapter(FixedShift).build().unwrap_err();
    assert_eq!(err.code(), 204);

    let err = grid(Pendry::new().degree(5)).adapter(FixedShift).build().unwrap_err();
    assert_eq!(err.code(), 205);

    let err = grid(Pendry::new().tolerances(0.5, 0.9))
        .adapter(GridSearch)
        .build()
        .unwrap_err();
    assert_eq!(err.code(), 206);

    let err = grid(Pendry::new().fit_range(0)).adapter(GridSearch).build().unwrap_err();
    assert_eq!(err.code(), 207);

    let err = grid(Pendry::new().shift_range(0, 3)).adapter(GridSearch).build().unwrap_err();
    assert_eq!(err.code(), 851);

    let err = grid(Pendry::new().shift_range(-5, 5).guesses(-9, 0, 3))
        .adapter(GridSearch)
        .build()
        .unwrap_err();
    assert_eq!(err.code(), 853);
}

/// Test that mismatched beam counts between the curve sets are rejected.
#[test]
fn test_mismatched_beam_counts() {
    let e = energies();
    let one: Vec<f64> = e.iter().map(|&v| 1.0 + bump(v)).collect();
    let mut two = vec![0.0f64; 2 * 101];
    two[..101].copy_from_slice(&one);
    two[101..].copy_from_slice(&one);

    let experiment = BeamSet::full(&e, &two, 2).unwrap();
    let theory = BeamSet::full(&e, &one, 1).unwrap();

    let model = Pendry::new()
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap();
    let err = model.fit(&experiment, &theory).unwrap_err();
    assert_eq!(err.code(), 203);
}

// ============================================================================
// Report Tests
// ============================================================================

/// Test grouped aggregates by beam-type label.
#[test]
fn test_beam_group_aggregates() {
    let e = energies();
    let mut intensity = vec![0.0f64; 2 * 101];
    for (i, &v) in e.iter().enumerate() {
        intensity[i] = 1.0 + bump(v);
        intensity[101 + i] = 1.5 + bump(v - 1.0);
    }

    let experiment = BeamSet::full(&e, &intensity, 2).unwrap();
    let theory = BeamSet::full(&e, &intensity, 2).unwrap();

    let model = Pendry::new()
        .output_grid(50.0, 0.5, 101)
        .beam_groups(vec![1, 2])
        .adapter(FixedShift)
        .build()
        .unwrap();
    let report = model.fit(&experiment, &theory).unwrap();

    let groups = report.group_r.as_ref().expect("groups requested");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, 1);
    assert_eq!(groups[1].label, 2);
    // Identical curve sets: every group scores zero.
    assert_eq!(groups[0].r, 0.0);
    assert_eq!(groups[1].r, 0.0);
}

/// Test the report display formatting.
#[test]
fn test_report_display() {
    let e = energies();
    let intensity: Vec<f64> = e.iter().map(|&v| 1.0 + bump(v)).collect();
    let experiment = BeamSet::full(&e, &intensity, 1).unwrap();
    let theory = BeamSet::full(&e, &intensity, 1).unwrap();

    let model = Pendry::new()
        .output_grid(50.0, 0.5, 101)
        .adapter(FixedShift)
        .build()
        .unwrap();
    let report = model.fit(&experiment, &theory).unwrap();

    let text = format!("{report}");
    assert!(text.contains("Pendry R:"));
    assert!(text.contains("Best shift:"));
    assert!(text.contains("Per-Beam R:"));
}
