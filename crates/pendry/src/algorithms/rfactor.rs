//! Pendry R-factor evaluation, per beam and per beam set.
//!
//! ## Purpose
//!
//! This module provides the core comparison logic: the per-beam Pendry
//! R-factor on the overlap of two Y-functions at an integer shift, and the
//! overlap-weighted aggregate over a whole beam set.
//!
//! ## Design notes
//!
//! * **Overlap first**: The shifted overlap is resolved by [`Support`]
//!   arithmetic; fewer than two shared samples yield a NaN per-beam R with
//!   zero numerator, denominator, and count.
//! * **Fused accumulation**: The squared-difference and squared-magnitude
//!   sums are gathered in a single pass through the [`OverlapSolver`]
//!   trait, with a generic scalar path and SIMD-optimized `f32`/`f64`
//!   specializations. Endpoint half-weights are applied afterwards.
//! * **Weighted aggregate**: `R_total = sum_b (num_b/den_b) * N_b / sum_b N_b`
//!   with the per-beam overlap count as weight. Beams without overlap are
//!   excluded; a NaN on a genuine overlap poisons the aggregate so the
//!   outer search can reject the candidate.
//!
//! ## Invariants
//!
//! * `R in [0, 2]` whenever the denominator is positive.
//! * `R(Y, Y, 0) = 0` exactly.
//! * `r_pendry_beam_y(Y1, Y2, .., +s) = r_pendry_beam_y(Y2, Y1, .., -s)`.
//!
//! ## Non-goals
//!
//! * This module does not prepare or interpolate curves.
//! * This module does not optimize the shift; that is the evaluation layer.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;
use wide::{f32x8, f64x2};

// Internal dependencies
use crate::math::integrate::trapz_from_sum;
use crate::primitives::errors::Advisory;
use crate::primitives::support::Support;

// ============================================================================
// Generic Accumulation
// ============================================================================

/// Scalar accumulation of the overlap sums (generic Float).
///
/// Returns `(sum of (y1 - y2)^2, sum of (y1^2 + y2^2))` over the aligned
/// slices.
#[inline]
pub fn accumulate_overlap_scalar<T: Float>(y1: &[T], y2: &[T]) -> (T, T) {
    let n = y1.len();
    let mut sum_d2 = T::zero();
    let mut sum_ss = T::zero();

    for i in 0..n {
        let a = y1[i];
        let b = y2[i];
        let d = a - b;
        sum_d2 = sum_d2 + d * d;
        sum_ss = sum_ss + a * a + b * b;
    }

    (sum_d2, sum_ss)
}

// ============================================================================
// Specialized Accumulation (SIMD)
// ============================================================================

/// SIMD-optimized accumulation of the overlap sums (f64).
#[inline]
pub fn accumulate_overlap_simd_f64(y1: &[f64], y2: &[f64]) -> (f64, f64) {
    let n = y1.len();
    debug_assert_eq!(n, y2.len());

    let mut i = 0;
    let mut s_d2 = f64x2::splat(0.0);
    let mut s_ss = f64x2::splat(0.0);

    unsafe {
        while i + 2 <= n {
            let a = f64x2::new([*y1.get_unchecked(i), *y1.get_unchecked(i + 1)]);
            let b = f64x2::new([*y2.get_unchecked(i), *y2.get_unchecked(i + 1)]);

            let d = a - b;

            s_d2 += d * d;
            s_ss += a * a + b * b;

            i += 2;
        }
    }

    let mut a_d2 = s_d2.reduce_add();
    let mut a_ss = s_ss.reduce_add();

    unsafe {
        while i < n {
            let a = *y1.get_unchecked(i);
            let b = *y2.get_unchecked(i);
            let d = a - b;

            a_d2 += d * d;
            a_ss += a * a + b * b;

            i += 1;
        }
    }

    (a_d2, a_ss)
}

/// SIMD-optimized accumulation of the overlap sums (f32).
#[inline]
pub fn accumulate_overlap_simd_f32(y1: &[f32], y2: &[f32]) -> (f32, f32) {
    let n = y1.len();
    debug_assert_eq!(n, y2.len());

    let mut i = 0;
    let mut s_d2 = f32x8::splat(0.0);
    let mut s_ss = f32x8::splat(0.0);

    unsafe {
        while i + 8 <= n {
            let a = f32x8::new([
                *y1.get_unchecked(i),
                *y1.get_unchecked(i + 1),
                *y1.get_unchecked(i + 2),
                *y1.get_unchecked(i + 3),
                *y1.get_unchecked(i + 4),
                *y1.get_unchecked(i + 5),
                *y1.get_unchecked(i + 6),
                *y1.get_unchecked(i + 7),
            ]);
            let b = f32x8::new([
                *y2.get_unchecked(i),
                *y2.get_unchecked(i + 1),
                *y2.get_unchecked(i + 2),
                *y2.get_unchecked(i + 3),
                *y2.get_unchecked(i + 4),
                *y2.get_unchecked(i + 5),
                *y2.get_unchecked(i + 6),
                *y2.get_unchecked(i + 7),
            ]);

            let d = a - b;

            s_d2 += d * d;
            s_ss += a * a + b * b;

            i += 8;
        }
    }

    let mut a_d2 = s_d2.reduce_add();
    let mut a_ss = s_ss.reduce_add();

    unsafe {
        while i < n {
            let a = *y1.get_unchecked(i);
            let b = *y2.get_unchecked(i);
            let d = a - b;

            a_d2 += d * d;
            a_ss += a * a + b * b;

            i += 1;
        }
    }

    (a_d2, a_ss)
}

// ============================================================================
// Solver Trait
// ============================================================================

/// Trait for type-specific overlap accumulation.
pub trait OverlapSolver: Float {
    /// Accumulate the squared-difference and squared-magnitude sums.
    #[inline]
    fn accumulate_overlap(y1: &[Self], y2: &[Self]) -> (Self, Self) {
        accumulate_overlap_scalar(y1, y2)
    }
}

impl OverlapSolver for f64 {
    #[inline]
    fn accumulate_overlap(y1: &[f64], y2: &[f64]) -> (f64, f64) {
        accumulate_overlap_simd_f64(y1, y2)
    }
}

impl OverlapSolver for f32 {
    #[inline]
    fn accumulate_overlap(y1: &[f32], y2: &[f32]) -> (f32, f32) {
        accumulate_overlap_simd_f32(y1, y2)
    }
}

// ============================================================================
// Per-Beam R
// ============================================================================

/// Per-beam R-factor decomposition at one shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamR<T> {
    /// Pendry R of this beam (NaN without overlap).
    pub r: T,

    /// Trapezoid integral of the squared Y difference.
    pub numerator: T,

    /// Trapezoid integral of the squared Y magnitudes.
    pub denominator: T,

    /// Number of overlapping grid points.
    pub overlap: usize,
}

impl<T: Float> BeamR<T> {
    /// Decomposition of a beam pair without overlap.
    #[inline]
    pub fn no_overlap() -> Self {
        Self {
            r: T::nan(),
            numerator: T::zero(),
            denominator: T::zero(),
            overlap: 0,
        }
    }

    /// Whether the beam contributed a genuine overlap.
    #[inline]
    pub fn has_overlap(&self) -> bool {
        self.overlap >= 2
    }
}

/// Per-beam Pendry R at an integer shift.
///
/// `y1` and `y2` are full-length output-grid vectors; validity is carried
/// by the supports. `y2` is translated by `shift` grid steps before the
/// overlap is formed, so sample `k` of `y1` lines up against sample
/// `k - shift` of `y2`.
pub fn r_pendry_beam_y<T: OverlapSolver>(
    e_step: T,
    y1: &[T],
    support1: Support,
    y2: &[T],
    support2: Support,
    shift: isize,
) -> BeamR<T> {
    let Some((lo, hi)) = support1.overlap_shifted(&support2, shift) else {
        return BeamR::no_overlap();
    };
    let n = hi - lo + 1;
    let lo2 = (lo as isize - shift) as usize;

    let seg1 = &y1[lo..=hi];
    let seg2 = &y2[lo2..lo2 + n];

    let (sum_d2, sum_ss) = T::accumulate_overlap(seg1, seg2);

    let d_first = seg1[0] - seg2[0];
    let d_last = seg1[n - 1] - seg2[n - 1];
    let ss_first = seg1[0] * seg1[0] + seg2[0] * seg2[0];
    let ss_last = seg1[n - 1] * seg1[n - 1] + seg2[n - 1] * seg2[n - 1];

    let numerator = trapz_from_sum(sum_d2, d_first * d_first, d_last * d_last, e_step);
    let denominator = trapz_from_sum(sum_ss, ss_first, ss_last, e_step);

    BeamR {
        r: numerator / denominator,
        numerator,
        denominator,
        overlap: n,
    }
}

// ============================================================================
// Beam-Set R
// ============================================================================

/// Beam-set R-factor at one shift: per-beam decomposition plus the
/// overlap-weighted aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSetR<T> {
    /// Overlap-weighted aggregate R (NaN when poisoned or empty).
    pub total: T,

    /// Per-beam decompositions.
    pub beams: Vec<BeamR<T>>,

    /// Per-beam conditions recorded during evaluation.
    pub advisories: Vec<Advisory>,
}

/// Beam-set Pendry R at a common integer shift.
///
/// Both matrices are column-major with `n_rows` grid points per beam.
/// Beams without overlap are excluded from the aggregate and recorded; a
/// NaN on a genuine overlap makes the aggregate NaN.
#[allow(clippy::too_many_arguments)]
pub fn r_pendry_beamset_y<T: OverlapSolver>(
    e_step: T,
    n_rows: usize,
    y1: &[T],
    supports1: &[Support],
    y2: &[T],
    supports2: &[Support],
    shift: isize,
) -> BeamSetR<T> {
    debug_assert_eq!(supports1.len(), supports2.len());

    let n_beams = supports1.len();
    let mut beams = Vec::with_capacity(n_beams);
    for b in 0..n_beams {
        let col1 = &y1[b * n_rows..(b + 1) * n_rows];
        let col2 = &y2[b * n_rows..(b + 1) * n_rows];
        beams.push(r_pendry_beam_y(
            e_step,
            col1,
            supports1[b],
            col2,
            supports2[b],
            shift,
        ));
    }
    aggregate_beamset(beams)
}

/// Overlap-weighted aggregation of per-beam decompositions.
///
/// Shared by the sequential beam-set loop and parallel passes that compute
/// the per-beam vector on their own.
pub fn aggregate_beamset<T: OverlapSolver>(beams: Vec<BeamR<T>>) -> BeamSetR<T> {
    let mut advisories = Vec::new();
    let mut weighted = T::zero();
    let mut weight = T::zero();
    let mut poisoned = false;

    for (b, beam) in beams.iter().enumerate() {
        if beam.has_overlap() {
            if beam.r.is_finite() {
                let w = T::from(beam.overlap).unwrap();
                weighted = weighted + beam.r * w;
                weight = weight + w;
            } else {
                poisoned = true;
                advisories.push(Advisory::BeamNaN { beam: b });
            }
        } else {
            advisories.push(Advisory::NoOverlap { beam: b });
        }
    }

    let total = if poisoned || weight <= T::zero() {
        T::nan()
    } else {
        weighted / weight
    };

    BeamSetR {
        total,
        beams,
        advisories,
    }
}
