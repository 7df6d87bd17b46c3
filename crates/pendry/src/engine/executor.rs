//! Execution engine for the beam preparation pipeline.
//!
//! ## Purpose
//!
//! This module orchestrates the five preparation stages that turn raw
//! per-beam I(E) curves into Y-functions on the uniform output grid:
//! range limiting, averaging across symmetry-equivalent beams, the
//! smoothing hook, B-spline interpolation with first derivatives, and the
//! Pendry Y transform. It also provides the default beam-set R pass used
//! by the adapters.
//!
//! ## Design notes
//!
//! * Each stage is individually skippable through [`SkipStages`].
//! * The smoothing stage is a hook: the core ships no smoother, but the
//!   stage and its skip flag are preserved so orchestration layers can
//!   inject one.
//! * The interpolation stage processes all beams through a single
//!   whole-batch pass function, so extension crates can swap in a
//!   parallel implementation; output beams occupy disjoint columns.
//! * Per-beam preparation problems are recorded as advisories and the
//!   pipeline continues; scheme and solver failures abort.
//!
//! ## Invariants
//!
//! * Every surviving output beam has at least `2 * degree + 1` samples.
//! * Output supports never extend past the input energy range of their
//!   beam (no extrapolation).
//! * The input view is borrowed immutably; all outputs are freshly owned.
//!
//! ## Non-goals
//!
//! * This module does not validate builder-level configuration; adapters
//!   do that before calling in.
//! * This module does not search the shift grid (evaluation layer).

// Feature-gated imports
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
use crate::algorithms::rfactor::{r_pendry_beamset_y, BeamSetR, OverlapSolver};
use crate::algorithms::yfunction::pendry_y_into;
use crate::engine::validator::{AveragingScheme, Validator};
use crate::math::spline::{min_samples, NaturalSpline};
use crate::primitives::beamset::{BeamSet, PreparedBeams};
use crate::primitives::buffer::PrepareBuffer;
use crate::primitives::errors::{Advisory, PendryError};
use crate::primitives::grid::{covered_window, EnergyGrid};
use crate::primitives::support::Support;

// ============================================================================
// Stage Flags
// ============================================================================

/// Per-stage skip flags for the preparation pipeline.
///
/// All stages execute by default. Skipping interpolation requires the
/// input grid to coincide with the output grid; skipping the Y stage
/// carries the interpolated intensities into the Y matrix unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipStages {
    /// Skip clipping of beam supports to the output-grid window.
    pub range_limit: bool,

    /// Skip averaging/reordering/discarding across equivalent beams.
    pub avg_reorder: bool,

    /// Skip the smoothing hook.
    pub smoothing: bool,

    /// Skip spline interpolation onto the output grid.
    pub interpolation: bool,

    /// Skip the Pendry Y transform.
    pub y_function: bool,
}

// ============================================================================
// Hook Types
// ============================================================================

/// Signature for a custom smoothing pass.
///
/// Called once per surviving output beam with the beam's support energies
/// and its intensities, which are smoothed in place.
#[doc(hidden)]
pub type SmoothPassFn<T> = fn(
    &[T],     // support energies
    &mut [T], // intensities, smoothed in place
);

/// One beam's interpolation work item.
#[derive(Debug, Clone, Copy)]
pub struct InterpTask<'a, T> {
    /// Input energies on the clipped support.
    pub x: &'a [T],

    /// Averaged intensities on the clipped support.
    pub y: &'a [T],

    /// Destination range on the output grid (empty for skipped beams).
    pub out: Support,
}

/// Signature for a whole-batch interpolation pass.
///
/// Fits and evaluates every task, writing values and first derivatives
/// into the column-major output matrices. Tasks with an empty destination
/// are skipped.
#[doc(hidden)]
pub type InterpPassFn<T> = fn(
    &[InterpTask<'_, T>], // one task per output beam
    &EnergyGrid<T>,       // output grid
    &mut [T],             // interpolated intensities, column-major
    &mut [T],             // first derivatives, column-major
) -> Result<(), PendryError>;

/// Signature for a beam-set R pass at one shift.
#[doc(hidden)]
pub type BeamSetPassFn<T> = fn(
    &PreparedBeams<T>, // experiment
    &PreparedBeams<T>, // theory
    isize,             // shift in output-grid steps
) -> BeamSetR<T>;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for one preparation run.
#[derive(Debug, Clone)]
pub struct PrepareConfig<'a, T> {
    /// Spline degree (only 3 is accepted).
    pub degree: usize,

    /// Imaginary inner potential for the Y transform.
    pub v0i: T,

    /// Per-stage skip flags.
    pub skip: SkipStages,

    /// Averaging scheme; `None` maps every beam onto itself.
    pub scheme: Option<&'a AveragingScheme>,

    /// Custom smoothing pass (stage 3 hook).
    pub smooth_pass: Option<SmoothPassFn<T>>,

    /// Custom interpolation pass (stage 4 hook).
    pub interp_pass: Option<InterpPassFn<T>>,
}

impl<T: Float> PrepareConfig<'_, T> {
    /// Default configuration with the given imaginary inner potential.
    pub fn new(v0i: T) -> Self {
        Self {
            degree: crate::math::spline::DEGREE,
            v0i,
            skip: SkipStages::default(),
            scheme: None,
            smooth_pass: None,
            interp_pass: None,
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Orchestrates beam preparation and beam-set R evaluation.
pub struct PendryExecutor;

impl PendryExecutor {
    /// Run the preparation pipeline on a beam set.
    pub fn prepare<T: Float>(
        beams: &BeamSet<'_, T>,
        grid: &EnergyGrid<T>,
        config: &PrepareConfig<'_, T>,
    ) -> Result<PreparedBeams<T>, PendryError> {
        let energies = beams.energies();
        Validator::validate_energies(energies)?;
        Validator::validate_output_grid(grid)?;
        Validator::validate_coverage(energies, grid)?;
        Validator::validate_v0i(config.v0i)?;
        Validator::validate_degree(config.degree)?;

        let n_beams = beams.n_beams();
        let n_in = energies.len();
        let min_len = min_samples(config.degree);
        let mut advisories: Vec<Advisory> = Vec::new();

        // Resolve the working scheme. A skipped averaging stage requires a
        // one-to-one beam mapping.
        let identity;
        let scheme: &AveragingScheme = if config.skip.avg_reorder {
            if let Some(s) = config.scheme {
                Validator::validate_scheme_skipped(n_beams, s.n_out)?;
            }
            identity = AveragingScheme::identity(n_beams);
            &identity
        } else {
            match config.scheme {
                Some(s) => {
                    Validator::validate_scheme(s, n_beams)?;
                    s
                }
                None => {
                    identity = AveragingScheme::identity(n_beams);
                    &identity
                }
            }
        };
        let n_out = scheme.n_out;
        let mut groups = scheme.groups.clone();

        // Stage 1: range limit. Clip beam supports to the input window
        // covered by the output grid; beams that fall below the spline
        // order are discarded with an advisory.
        let window = if config.skip.range_limit {
            (0, n_in - 1)
        } else {
            covered_window(energies, grid).ok_or_else(|| {
                PendryError::BadGrid("output grid does not intersect the input energies".into())
            })?
        };
        let mut clipped: Vec<Support> = (0..n_beams)
            .map(|b| beams.support(b).clip(window.0, window.1))
            .collect();
        if !config.skip.range_limit {
            for (b, support) in clipped.iter().enumerate() {
                if groups[b] != 0 && support.len < min_len {
                    groups[b] = 0;
                    advisories.push(Advisory::BeamTooShort { beam: b });
                }
            }
        }

        // Stage 2: average/reorder/discard. Output intensities are the
        // unweighted mean of each group's members on the intersection of
        // their supports.
        let mut work = vec![T::zero(); n_in * n_out];
        let mut work_supports: Vec<Support> = Vec::with_capacity(n_out);
        if config.skip.avg_reorder {
            for b in 0..n_beams {
                let support = if groups[b] == 0 {
                    Support::new(clipped[b].first, 0)
                } else {
                    clipped[b]
                };
                let col = &mut work[b * n_in..(b + 1) * n_in];
                let src = beams.column(b);
                col[support.first..support.end()]
                    .copy_from_slice(&src[support.first..support.end()]);
                work_supports.push(support);
            }
        } else {
            for g in 1..=n_out {
                let members: Vec<usize> = (0..n_beams).filter(|&b| groups[b] == g).collect();
                if members.is_empty() {
                    // A group the caller's scheme left empty is rejected; a
                    // group emptied by range-limit discards survives as an
                    // empty output beam (the advisory is already recorded).
                    if scheme.members(g).next().is_none() {
                        return Err(PendryError::SchemeInvalid {
                            group: Some(g),
                            n_beams,
                            n_out,
                        });
                    }
                    work_supports.push(Support::new(0, 0));
                    continue;
                }
                let mut intersection = clipped[members[0]];
                for &m in &members[1..] {
                    intersection = intersection.intersect(&clipped[m]);
                }
                if intersection.len < min_len {
                    return Err(PendryError::GroupTooShort {
                        group: g,
                        got: intersection.len,
                        min: min_len,
                    });
                }

                let scale = T::one() / T::from(members.len()).unwrap();
                let col = &mut work[(g - 1) * n_in..g * n_in];
                for &m in &members {
                    let src = beams.column(m);
                    for k in intersection.first..intersection.end() {
                        col[k] = col[k] + src[k];
                    }
                }
                for value in col[intersection.first..intersection.end()].iter_mut() {
                    *value = *value * scale;
                }
                work_supports.push(intersection);
            }
        }
        drop(clipped);

        // Stage 3: smoothing hook. A no-op unless a pass was injected.
        if !config.skip.smoothing {
            if let Some(pass) = config.smooth_pass {
                for g in 0..n_out {
                    let support = work_supports[g];
                    if support.is_empty() {
                        continue;
                    }
                    let col = &mut work[g * n_in + support.first..g * n_in + support.end()];
                    pass(&energies[support.first..support.end()], col);
                }
            }
        }

        // Stage 4: interpolation onto the output grid.
        let mut prepared = PreparedBeams::zeroed(*grid, n_out);
        prepared.advisories = advisories;

        if !config.skip.interpolation {
            let mut tasks: Vec<InterpTask<'_, T>> = Vec::with_capacity(n_out);
            for g in 0..n_out {
                let support = work_supports[g];
                if support.len < min_len {
                    tasks.push(InterpTask {
                        x: &energies[0..0],
                        y: &work[0..0],
                        out: Support::new(0, 0),
                    });
                    continue;
                }
                let e_lo = energies[support.first];
                let e_hi = energies[support.end() - 1];
                let mut out = grid.contained_support(e_lo, e_hi);
                if out.len < 2 {
                    out = Support::new(out.first, 0);
                }
                tasks.push(InterpTask {
                    x: &energies[support.first..support.end()],
                    y: &work[g * n_in + support.first..g * n_in + support.end()],
                    out,
                });
            }

            let pass = config.interp_pass.unwrap_or(interp_pass_sequential::<T>);
            pass(&tasks, grid, &mut prepared.intensity, &mut prepared.derivative)?;
            for (g, task) in tasks.iter().enumerate() {
                prepared.supports[g] = task.out;
            }
        } else {
            // Without interpolation the curves must already live on the
            // output grid; derivatives come from finite differences.
            if !grid.matches(energies) {
                return Err(PendryError::BadGrid(
                    "skipping interpolation requires the input grid to equal the output grid"
                        .into(),
                ));
            }
            let n_rows = grid.len;
            for g in 0..n_out {
                let support = work_supports[g];
                prepared.supports[g] = support;
                if support.is_empty() {
                    continue;
                }
                let src = &work[g * n_in + support.first..g * n_in + support.end()];
                prepared.intensity[g * n_rows + support.first..g * n_rows + support.end()]
                    .copy_from_slice(src);
                finite_differences(
                    src,
                    grid.step,
                    &mut prepared.derivative
                        [g * n_rows + support.first..g * n_rows + support.end()],
                );
            }
        }

        // Stage 5: Pendry Y.
        let n_rows = grid.len;
        if !config.skip.y_function {
            let PreparedBeams {
                supports,
                intensity,
                derivative,
                y,
                ..
            } = &mut prepared;
            for (g, support) in supports.iter().enumerate() {
                if support.is_empty() {
                    continue;
                }
                let range = g * n_rows + support.first..g * n_rows + support.end();
                pendry_y_into(
                    &intensity[range.clone()],
                    &derivative[range.clone()],
                    config.v0i,
                    &mut y[range],
                );
            }
        } else {
            prepared.y.copy_from_slice(&prepared.intensity);
        }

        Ok(prepared)
    }

    /// Beam-set R of two prepared sets at an integer shift (the default
    /// [`BeamSetPassFn`]).
    pub fn beamset_r<T: OverlapSolver>(
        experiment: &PreparedBeams<T>,
        theory: &PreparedBeams<T>,
        shift: isize,
    ) -> BeamSetR<T> {
        debug_assert_eq!(experiment.grid.len, theory.grid.len);
        r_pendry_beamset_y(
            experiment.grid.step,
            experiment.grid.len,
            &experiment.y,
            &experiment.supports,
            &theory.y,
            &theory.supports,
            shift,
        )
    }
}

// ============================================================================
// Default Interpolation Pass
// ============================================================================

/// Sequential whole-batch interpolation pass.
///
/// Fits a natural spline per task and evaluates it with its first
/// derivative on the task's slice of the output grid.
pub fn interp_pass_sequential<T: Float>(
    tasks: &[InterpTask<'_, T>],
    grid: &EnergyGrid<T>,
    out_intensity: &mut [T],
    out_derivative: &mut [T],
) -> Result<(), PendryError> {
    let n_rows = grid.len;
    let mut buffer = PrepareBuffer::default();

    for (b, task) in tasks.iter().enumerate() {
        if task.out.is_empty() {
            continue;
        }
        let spline = NaturalSpline::fit(task.x, task.y)?;
        grid.energies_into(task.out, buffer.targets.as_vec_mut());

        let values = &mut out_intensity[b * n_rows + task.out.first..b * n_rows + task.out.end()];
        let derivs = &mut out_derivative[b * n_rows + task.out.first..b * n_rows + task.out.end()];
        spline.evaluate_into(&buffer.targets, values, derivs)?;
    }
    Ok(())
}

// ============================================================================
// Finite Differences
// ============================================================================

/// Second-order finite differences on a uniform grid, used when
/// interpolation is skipped.
fn finite_differences<T: Float>(values: &[T], step: T, out: &mut [T]) {
    let n = values.len();
    debug_assert_eq!(n, out.len());
    if n < 2 {
        return;
    }
    let two = T::from(2.0).unwrap();
    if n == 2 {
        let slope = (values[1] - values[0]) / step;
        out[0] = slope;
        out[1] = slope;
        return;
    }
    let h2 = two * step;
    let three = T::from(3.0).unwrap();
    let four = T::from(4.0).unwrap();
    out[0] = (-three * values[0] + four * values[1] - values[2]) / h2;
    for k in 1..n - 1 {
        out[k] = (values[k + 1] - values[k - 1]) / h2;
    }
    out[n - 1] = (three * values[n - 1] - four * values[n - 2] + values[n - 3]) / h2;
}
