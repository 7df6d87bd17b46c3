#![cfg(feature = "dev")]
//! Tests for per-beam and beam-set R-factor accumulation.
//!
//! These tests verify the comparison core: the trapezoid rule, the
//! shifted-overlap arithmetic, the Pendry R bounds and symmetries, and the
//! overlap-weighted beam-set aggregate.
//!
//! ## Test Organization
//!
//! 1. **Trapezoid** - Uniform-step integration identities
//! 2. **Per-Beam R** - Identity, bounds, symmetry, overlap handling
//! 3. **Accumulation** - SIMD and scalar agreement
//! 4. **Beam-Set R** - Weighted aggregate and advisory policy

use approx::assert_relative_eq;

use pendry::internals::algorithms::rfactor::{
    accumulate_overlap_scalar, accumulate_overlap_simd_f32, accumulate_overlap_simd_f64,
    r_pendry_beam_y, r_pendry_beamset_y,
};
use pendry::internals::algorithms::yfunction::{pendry_y, pendry_y_into};
use pendry::internals::math::integrate::trapz_uniform;
use pendry::internals::primitives::support::Support;

/// Deterministic pseudo-random sequence in [-1, 1].
fn lcg_series(seed: u64, n: usize) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f64) / ((1u64 << 30) as f64) - 1.0
        })
        .collect()
}

// ============================================================================
// Trapezoid Tests
// ============================================================================

/// Test constant integration.
///
/// Integrating a constant c over N points with step d gives c*(N-1)*d
/// exactly.
#[test]
fn test_trapz_constant_exact() {
    let values = vec![2.5f64; 7];
    let result = trapz_uniform(&values, 0.5);
    assert_eq!(result, 2.5 * 6.0 * 0.5);
}

/// Test linear integration against the closed form.
#[test]
fn test_trapz_linear() {
    // f(x) = x on [0, 4] with step 1: the trapezoid rule is exact.
    let values: Vec<f64> = (0..5).map(|i| i as f64).collect();
    assert_relative_eq!(trapz_uniform(&values, 1.0), 8.0, epsilon = 1e-12);
}

// ============================================================================
// Y-Function Tests
// ============================================================================

/// Test the pointwise Y-function, including the degenerate zero case.
#[test]
fn test_pendry_y_pointwise() {
    // Y = I*I' / (I^2 + v0i^2 * I'^2)
    assert_relative_eq!(
        pendry_y(2.0, 1.0, 5.0),
        2.0 / (4.0 + 25.0),
        epsilon = 1e-14
    );
    // v0i = 0 with I = I' = 0 is defined as 0.
    assert_eq!(pendry_y(0.0f64, 0.0, 0.0), 0.0);
}

/// Test the slice-wise application matches the pointwise form.
#[test]
fn test_pendry_y_into_matches_pointwise() {
    let intensity = lcg_series(7, 32);
    let derivative = lcg_series(11, 32);
    let mut out = vec![0.0; 32];

    pendry_y_into(&intensity, &derivative, 5.0, &mut out);

    for i in 0..32 {
        assert_eq!(out[i], pendry_y(intensity[i], derivative[i], 5.0));
    }
}

// ============================================================================
// Per-Beam R Tests
// ============================================================================

/// Test that identical curves at zero shift score exactly zero.
#[test]
fn test_beam_r_identity_is_zero() {
    let y = lcg_series(3, 64);
    let support = Support::new(0, 64);

    let beam = r_pendry_beam_y(0.5, &y, support, &y, support, 0);

    assert_eq!(beam.r, 0.0);
    assert_eq!(beam.overlap, 64);
    assert!(beam.denominator > 0.0);
}

/// Test the Pendry bound R <= 2.
///
/// (Y1 - Y2)^2 <= 2 * (Y1^2 + Y2^2) pointwise, so the ratio of integrals
/// stays in [0, 2].
#[test]
fn test_beam_r_bounds() {
    for seed in [1u64, 5, 9, 21] {
        let y1 = lcg_series(seed, 48);
        let y2 = lcg_series(seed + 100, 48);
        let support = Support::new(0, 48);

        for shift in [-5isize, -1, 0, 2, 7] {
            let beam = r_pendry_beam_y(0.5, &y1, support, &y2, support, shift);
            assert!(beam.r >= 0.0, "R must be non-negative, got {}", beam.r);
            assert!(beam.r <= 2.0 + 1e-12, "R must stay below 2, got {}", beam.r);
        }
    }
}

/// Test the shift symmetry R(Y1, Y2, +s) = R(Y2, Y1, -s).
#[test]
fn test_beam_r_shift_symmetry() {
    let y1 = lcg_series(13, 50);
    let y2 = lcg_series(17, 50);
    let s1 = Support::new(3, 40);
    let s2 = Support::new(0, 45);

    for shift in [-4isize, -1, 0, 1, 6] {
        let forward = r_pendry_beam_y(0.5, &y1, s1, &y2, s2, shift);
        let backward = r_pendry_beam_y(0.5, &y2, s2, &y1, s1, -shift);

        assert_eq!(forward.r, backward.r);
        assert_eq!(forward.numerator, backward.numerator);
        assert_eq!(forward.denominator, backward.denominator);
        assert_eq!(forward.overlap, backward.overlap);
    }
}

/// Test disjoint supports.
///
/// Fewer than two shared samples yield NaN with zeroed sums.
#[test]
fn test_beam_r_no_overlap() {
    let y = vec![1.0f64; 200];

    let beam = r_pendry_beam_y(
        0.5,
        &y,
        Support::new(0, 20),
        &y,
        Support::new(100, 20),
        0,
    );

    assert!(beam.r.is_nan());
    assert_eq!(beam.numerator, 0.0);
    assert_eq!(beam.denominator, 0.0);
    assert_eq!(beam.overlap, 0);
}

/// Test that a single shared sample still counts as no overlap.
#[test]
fn test_beam_r_single_point_overlap() {
    let y = vec![1.0f64; 40];

    let beam = r_pendry_beam_y(
        0.5,
        &y,
        Support::new(0, 20),
        &y,
        Support::new(19, 21),
        0,
    );

    assert_eq!(beam.overlap, 0);
    assert!(beam.r.is_nan());
}

/// Test a shifted self-comparison recovers zero at the matching shift.
#[test]
fn test_beam_r_matches_at_translated_shift() {
    let base = lcg_series(29, 80);
    // The second curve is the first translated up by 6 grid steps.
    let mut shifted = vec![0.0f64; 80];
    for k in 0..74 {
        shifted[k + 6] = base[k];
    }

    let beam = r_pendry_beam_y(
        0.5,
        &base,
        Support::new(0, 74),
        &shifted,
        Support::new(6, 74),
        -6,
    );

    assert_eq!(beam.r, 0.0);
    assert_eq!(beam.overlap, 74);
}

// ============================================================================
// Accumulation Tests
// ============================================================================

/// Test that the SIMD accumulators agree with the scalar path (f64).
#[test]
fn test_accumulate_simd_f64_matches_scalar() {
    for n in [1usize, 2, 3, 15, 16, 17, 64] {
        let y1 = lcg_series(41, n);
        let y2 = lcg_series(43, n);

        let (d2_s, ss_s) = accumulate_overlap_scalar(&y1, &y2);
        let (d2_v, ss_v) = accumulate_overlap_simd_f64(&y1, &y2);

        assert_relative_eq!(d2_s, d2_v, max_relative = 1e-13);
        assert_relative_eq!(ss_s, ss_v, max_relative = 1e-13);
    }
}

/// Test that the SIMD accumulators agree with the scalar path (f32).
#[test]
fn test_accumulate_simd_f32_matches_scalar() {
    for n in [1usize, 7, 8, 9, 33] {
        let y1: Vec<f32> = lcg_series(47, n).iter().map(|&v| v as f32).collect();
        let y2: Vec<f32> = lcg_series(53, n).iter().map(|&v| v as f32).collect();

        let (d2_s, ss_s) = accumulate_overlap_scalar(&y1, &y2);
        let (d2_v, ss_v) = accumulate_overlap_simd_f32(&y1, &y2);

        assert_relative_eq!(d2_s, d2_v, max_relative = 1e-4);
        assert_relative_eq!(ss_s, ss_v, max_relative = 1e-4);
    }
}

// ============================================================================
// Beam-Set Tests
// ============================================================================

/// Test the overlap-weighted aggregate identity.
///
/// R_total must equal sum(N_b * R_b) / sum(N_b) over overlapping beams.
#[test]
fn test_beamset_weighted_aggregate() {
    let n_rows = 60;
    let y1 = lcg_series(61, n_rows * 3);
    let mut y2 = lcg_series(67, n_rows * 3);
    // Make beam 2 identical so its R is exactly zero.
    y2[2 * n_rows..3 * n_rows].copy_from_slice(&y1[2 * n_rows..3 * n_rows]);

    let supports1 = vec![
        Support::new(0, 60),
        Support::new(5, 40),
        Support::new(0, 50),
    ];
    let supports2 = vec![
        Support::new(0, 60),
        Support::new(0, 55),
        Support::new(0, 50),
    ];

    let set = r_pendry_beamset_y(0.5, n_rows, &y1, &supports1, &y2, &supports2, 0);

    let mut weighted = 0.0;
    let mut weight = 0.0;
    for beam in &set.beams {
        if beam.overlap >= 2 {
            weighted += beam.r * beam.overlap as f64;
            weight += beam.overlap as f64;
        }
    }
    assert_relative_eq!(set.total, weighted / weight, epsilon = 1e-12);
    assert_eq!(set.beams[2].r, 0.0);
}

/// Test that a beam without overlap is excluded, not poisoning.
#[test]
fn test_beamset_excludes_no_overlap_beam() {
    let n_rows = 200;
    let y = lcg_series(71, n_rows * 2);

    let supports1 = vec![Support::new(0, 200), Support::new(0, 20)];
    let supports2 = vec![Support::new(0, 200), Support::new(100, 20)];

    let set = r_pendry_beamset_y(0.5, n_rows, &y, &supports1, &y, &supports2, 0);

    // Beam 0 compares the same data with itself; beam 1 never overlaps.
    assert_eq!(set.total, 0.0);
    assert!(set.beams[1].r.is_nan());
    assert!(set.advisories.iter().any(|a| a.code() == 212));
}

/// Test that NaN on a genuine overlap poisons the aggregate.
#[test]
fn test_beamset_nan_poisons_aggregate() {
    let n_rows = 30;
    let mut y1 = lcg_series(73, n_rows * 2);
    let y2 = lcg_series(79, n_rows * 2);
    y1[5] = f64::NAN;

    let supports = vec![Support::new(0, 30), Support::new(0, 30)];

    let set = r_pendry_beamset_y(0.5, n_rows, &y1, &supports, &y2, &supports, 0);

    assert!(set.total.is_nan());
    assert!(set.advisories.iter().any(|a| a.code() == 811));
    // The untouched beam keeps its valid decomposition.
    assert!(set.beams[1].r.is_finite());
}
