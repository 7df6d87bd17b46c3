//! Parallel execution engine for R-factor operations.
//!
//! ## Purpose
//!
//! This module provides the parallel passes that are injected into the
//! `pendry` crate's execution engine. They distribute the per-beam work of
//! the preparation pipeline and the R-factor loop across CPU cores.
//!
//! ## Design notes
//!
//! * **Implementation**: Drop-in replacements for the sequential passes,
//!   injected through the core's `#[doc(hidden)]` hook points.
//! * **Parallelism**: Uses `rayon` for data-parallel execution across beams.
//! * **Disjoint output**: Beams occupy disjoint columns of the output
//!   matrices, so workers never contend.
//! * **Buffer Reuse**: Per-worker scratch buffers minimize allocations.
//!
//! ## Invariants
//!
//! * Results are identical to the sequential passes; the accumulation
//!   order within each beam is unchanged.
//! * A failing beam aborts the whole pass with its error.
//!
//! ## Non-goals
//!
//! * This module does not parallelize the V0r refinement loop; its
//!   evaluation order is inherently sequential.
//! * This module does not validate input data (handled by the core).

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
#[cfg(feature = "cpu")]
use num_traits::Float;

// Export dependencies from pendry crate
#[cfg(feature = "cpu")]
use pendry::internals::algorithms::rfactor::{
    aggregate_beamset, r_pendry_beam_y, BeamR, BeamSetR, OverlapSolver,
};
#[cfg(feature = "cpu")]
use pendry::internals::engine::executor::InterpTask;
#[cfg(feature = "cpu")]
use pendry::internals::math::spline::NaturalSpline;
#[cfg(feature = "cpu")]
use pendry::internals::primitives::beamset::PreparedBeams;
#[cfg(feature = "cpu")]
use pendry::internals::primitives::buffer::PrepareBuffer;
#[cfg(feature = "cpu")]
use pendry::internals::primitives::errors::PendryError;
#[cfg(feature = "cpu")]
use pendry::internals::primitives::grid::EnergyGrid;

// ============================================================================
// Parallel Interpolation Pass
// ============================================================================

/// Fit and evaluate all beam splines in parallel.
///
/// Matches the core's interpolation hook signature; each worker carries
/// its own target buffer and writes one beam's column.
#[cfg(feature = "cpu")]
pub fn interp_pass_parallel<T>(
    tasks: &[InterpTask<'_, T>],
    grid: &EnergyGrid<T>,
    out_intensity: &mut [T],
    out_derivative: &mut [T],
) -> Result<(), PendryError>
where
    T: Float + Send + Sync,
{
    let n_rows = grid.len;

    out_intensity
        .par_chunks_mut(n_rows)
        .zip(out_derivative.par_chunks_mut(n_rows))
        .zip(tasks.par_iter())
        .map_init(
            PrepareBuffer::<T>::default,
            |buffer, ((col_intensity, col_derivative), task)| {
                if task.out.is_empty() {
                    return Ok(());
                }
                let spline = NaturalSpline::fit(task.x, task.y)?;
                grid.energies_into(task.out, buffer.targets.as_vec_mut());

                let values = &mut col_intensity[task.out.first..task.out.end()];
                let derivs = &mut col_derivative[task.out.first..task.out.end()];
                spline.evaluate_into(&buffer.targets, values, derivs)
            },
        )
        .collect::<Result<(), PendryError>>()
}

// ============================================================================
// Parallel Beam-Set R Pass
// ============================================================================

/// Evaluate the per-beam R loop in parallel and aggregate sequentially.
///
/// Matches the core's beam-set hook signature.
#[cfg(feature = "cpu")]
pub fn beamset_pass_parallel<T>(
    experiment: &PreparedBeams<T>,
    theory: &PreparedBeams<T>,
    shift: isize,
) -> BeamSetR<T>
where
    T: OverlapSolver + Send + Sync,
{
    let e_step = experiment.grid.step;
    let beams: Vec<BeamR<T>> = (0..experiment.n_beams())
        .into_par_iter()
        .map(|b| {
            r_pendry_beam_y(
                e_step,
                experiment.y_column(b),
                experiment.supports[b],
                theory.y_column(b),
                theory.supports[b],
                shift,
            )
        })
        .collect();

    aggregate_beamset(beams)
}
