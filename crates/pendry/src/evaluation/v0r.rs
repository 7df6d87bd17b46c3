//! V0r optimization over an integer shift grid.
//!
//! ## Purpose
//!
//! This module searches the integer grid of inner-potential shifts for the
//! minimum of the aggregate Pendry R-factor. The search is a "smart"
//! parabola refinement with a brute-force fallback: three initial guesses
//! seed a least-squares parabola, the predicted minimum is refined inside
//! a sliding window, and any sign of a poor or escaping fit degrades to
//! evaluating every remaining grid point.
//!
//! ## Design notes
//!
//! * **Explicit state machine**: The search runs as a finite-state loop
//!   (`Init -> Init2 -> Init3 -> Refine <-> ... -> BruteFallback`), so the
//!   evaluated set, the window weight vector, and the running best are
//!   plain local state rather than call-stack artifacts.
//! * **Cached evaluations**: Each grid point is evaluated at most once; the
//!   full per-beam decomposition is kept so the best shift's beam vector is
//!   returned without recomputation.
//! * **Soft degradation**: Fallbacks and weak minima are advisories on a
//!   valid result; only a singular parabola system is fatal.
//! * **First-seen ties**: The running best is updated on strict `<`, so
//!   among equal R values the earliest evaluation wins.
//!
//! ## Invariants
//!
//! * `n_steps >= 6`; all guesses lie inside the range and are distinct.
//! * Window weights are 1 exactly on evaluated, finite points inside the
//!   current window and 0 elsewhere.
//! * The returned best R is no larger than the R at any input guess.
//!
//! ## Non-goals
//!
//! * This module does not know how R is computed; the caller supplies an
//!   evaluation closure.
//! * This module does not parallelize evaluations; the refinement order is
//!   inherently sequential.

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
use crate::algorithms::rfactor::{BeamR, BeamSetR, OverlapSolver};
use crate::math::parabola::{fit_weighted, weighted_r_squared};
use crate::primitives::buffer::FitBuffer;
use crate::primitives::errors::{Advisory, PendryError};

/// Minimum number of grid points the optimizer accepts.
pub const MIN_STEPS: usize = 6;

/// Curvature floor below which a parabola fit cannot pin a minimum.
const CURVATURE_FLOOR: f64 = 0.005;

// ============================================================================
// Settings and Outcome
// ============================================================================

/// Search configuration for the V0r optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct V0rSettings<T> {
    /// Smallest shift on the grid (in output-grid steps).
    pub s_min: isize,

    /// Largest shift on the grid.
    pub s_max: isize,

    /// Three initial guesses, each inside `[s_min, s_max]`.
    pub guesses: [isize; 3],

    /// R^2 above which the parabola fit ends the search.
    pub tol_good: T,

    /// R^2 above which the window shrinks instead of falling back.
    pub tol_acceptable: T,

    /// Initial half-width of the parabola fitting window.
    pub fit_range: usize,
}

/// Result of a V0r search.
#[derive(Debug, Clone)]
pub struct V0rOutcome<T> {
    /// Grid index of the best evaluated shift.
    pub best_index: usize,

    /// Best evaluated shift in output-grid steps.
    pub best_shift: isize,

    /// Parabola-interpolated shift when refinement converged, otherwise
    /// the best grid shift.
    pub best_shift_real: T,

    /// Aggregate R at the best evaluated shift.
    pub best_r: T,

    /// Parabola-interpolated minimum R, when refinement converged.
    pub r_parabola: Option<T>,

    /// Per-beam decomposition at the best evaluated shift.
    pub beams: Vec<BeamR<T>>,

    /// Conditions recorded during the search and at the best shift.
    pub advisories: Vec<Advisory>,

    /// Number of beam-set evaluations performed.
    pub n_evaluations: usize,
}

// ============================================================================
// State Machine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Init2,
    Init3,
    Refine,
    BruteFallback,
}

/// Evaluate grid point `i` once, updating the cache and the running best.
fn evaluate_at<T, F>(
    i: usize,
    s_min: isize,
    evals: &mut [Option<BeamSetR<T>>],
    best: &mut Option<(usize, T)>,
    n_eval: &mut usize,
    eval: &mut F,
) where
    T: OverlapSolver,
    F: FnMut(isize) -> BeamSetR<T>,
{
    if evals[i].is_some() {
        return;
    }
    let set = eval(s_min + i as isize);
    *n_eval += 1;
    let r = set.total;
    if r.is_finite() {
        let improves = match best {
            None => true,
            Some((_, incumbent)) => r < *incumbent,
        };
        if improves {
            *best = Some((i, r));
        }
    }
    evals[i] = Some(set);
}

/// Signed grid index of a real vertex position, saturating far outside
/// the grid when the vertex escapes the integer range.
fn grid_index_of<T: Float>(vertex: T, s_min: isize) -> isize {
    match vertex.round().to_isize() {
        Some(v) => v.saturating_sub(s_min),
        None => isize::MAX / 2,
    }
}

/// Unevaluated window index nearest to the predicted minimum, probing
/// below before above at equal distance.
fn next_missing<T>(
    w_lo: usize,
    w_hi: usize,
    c_idx: isize,
    evals: &[Option<BeamSetR<T>>],
) -> Option<usize> {
    let span = (w_hi - w_lo) as isize;
    for off in 0..=span {
        for j in [c_idx - off, c_idx + off] {
            if j < w_lo as isize || j > w_hi as isize {
                continue;
            }
            let j = j as usize;
            if evals[j].is_none() {
                return Some(j);
            }
        }
    }
    None
}

/// Optimize the aggregate R over the integer shift grid.
///
/// `eval` computes the beam-set R at a shift; it is called at most once
/// per grid point.
pub fn optimize<T, F>(settings: &V0rSettings<T>, mut eval: F) -> Result<V0rOutcome<T>, PendryError>
where
    T: OverlapSolver,
    F: FnMut(isize) -> BeamSetR<T>,
{
    let V0rSettings {
        s_min,
        s_max,
        guesses,
        tol_good,
        tol_acceptable,
        fit_range: initial_fit_range,
    } = *settings;

    if s_max < s_min || ((s_max - s_min + 1) as usize) < MIN_STEPS {
        return Err(PendryError::RangeTooSmall {
            got: (s_max - s_min + 1).max(0) as usize,
            min: MIN_STEPS,
        });
    }
    let n_steps = (s_max - s_min + 1) as usize;
    for (k, &g) in guesses.iter().enumerate() {
        if g < s_min || g > s_max || guesses[..k].contains(&g) {
            return Err(PendryError::GuessOutOfRange {
                guess: g as i64,
                lo: s_min as i64,
                hi: s_max as i64,
            });
        }
    }
    if initial_fit_range == 0 {
        return Err(PendryError::InvalidFitRange(0));
    }

    let guess_idx: [usize; 3] = [
        (guesses[0] - s_min) as usize,
        (guesses[1] - s_min) as usize,
        (guesses[2] - s_min) as usize,
    ];
    let min_fit_range = initial_fit_range.saturating_sub(6).max(5);
    let curvature_floor = T::from(CURVATURE_FLOOR).unwrap();

    let mut evals: Vec<Option<BeamSetR<T>>> = vec![None; n_steps];
    let mut weights: Vec<T> = vec![T::zero(); n_steps];
    let mut best: Option<(usize, T)> = None;
    let mut n_eval = 0usize;
    let mut advisories: Vec<Advisory> = Vec::new();

    let mut fit_range = initial_fit_range;
    let mut c_idx: isize = 0;
    let mut interpolated: Option<(T, T)> = None;
    let mut state = State::Init;

    // Scratch for the window fits.
    let mut fit_buffer = FitBuffer::default();

    loop {
        match state {
            State::Init => {
                evaluate_at(guess_idx[0], s_min, &mut evals, &mut best, &mut n_eval, &mut eval);
                state = State::Init2;
            }

            State::Init2 => {
                evaluate_at(guess_idx[1], s_min, &mut evals, &mut best, &mut n_eval, &mut eval);
                state = State::Init3;
            }

            State::Init3 => {
                evaluate_at(guess_idx[2], s_min, &mut evals, &mut best, &mut n_eval, &mut eval);

                weights.fill(T::zero());
                gather_window(0, n_steps - 1, s_min, &evals, &mut weights, &mut fit_buffer);
                if fit_buffer.len() < 3 {
                    // NaN guesses cannot seed a parabola; scan instead.
                    state = State::BruteFallback;
                    continue;
                }
                let parabola = fit_weighted(&fit_buffer.xs, &fit_buffer.ys, &fit_buffer.ws)?;
                let vertex = parabola.vertex();
                if !vertex.is_finite() {
                    advisories.push(Advisory::OutOfRange);
                    state = State::BruteFallback;
                    continue;
                }
                c_idx = grid_index_of(vertex, s_min);
                state = State::Refine;
            }

            State::Refine => {
                let fr = fit_range as isize;
                if c_idx - fr < 0 || c_idx + fr > n_steps as isize - 1 {
                    advisories.push(Advisory::OutOfRange);
                    state = State::BruteFallback;
                    continue;
                }
                let w_lo = (c_idx - fr) as usize;
                let w_hi = (c_idx + fr) as usize;

                weights.fill(T::zero());
                let n_window =
                    gather_window(w_lo, w_hi, s_min, &evals, &mut weights, &mut fit_buffer);

                if n_window < 4 {
                    match next_missing(w_lo, w_hi, c_idx, &evals) {
                        Some(j) => {
                            evaluate_at(j, s_min, &mut evals, &mut best, &mut n_eval, &mut eval);
                            continue;
                        }
                        None => {
                            advisories.push(Advisory::AllEvaluated);
                            break;
                        }
                    }
                }

                let parabola = fit_weighted(&fit_buffer.xs, &fit_buffer.ys, &fit_buffer.ws)?;
                let vertex = parabola.vertex();
                if !vertex.is_finite() || parabola.curvature() <= curvature_floor {
                    state = State::BruteFallback;
                    continue;
                }
                let new_c = grid_index_of(vertex, s_min);
                if new_c <= c_idx - fr || new_c >= c_idx + fr {
                    state = State::BruteFallback;
                    continue;
                }

                let r_squared = weighted_r_squared(
                    &parabola,
                    &fit_buffer.xs,
                    &fit_buffer.ys,
                    &fit_buffer.ws,
                );
                if r_squared > tol_good {
                    interpolated = Some((vertex, parabola.value_at_vertex()));
                    break;
                }

                c_idx = new_c;
                if n_window < 2 * fit_range + 1 {
                    match next_missing(w_lo, w_hi, c_idx, &evals) {
                        Some(j) => {
                            evaluate_at(j, s_min, &mut evals, &mut best, &mut n_eval, &mut eval);
                            continue;
                        }
                        None => {
                            advisories.push(Advisory::AllEvaluated);
                            break;
                        }
                    }
                } else if r_squared > tol_acceptable {
                    fit_range -= 1;
                    if fit_range < min_fit_range {
                        advisories.push(Advisory::WeakMinimum);
                        break;
                    }
                } else {
                    advisories.push(Advisory::ParabolaPoor);
                    state = State::BruteFallback;
                }
            }

            State::BruteFallback => {
                if evals.iter().all(|e| e.is_some()) {
                    advisories.push(Advisory::AllEvaluated);
                }
                for i in 0..n_steps {
                    evaluate_at(i, s_min, &mut evals, &mut best, &mut n_eval, &mut eval);
                }
                break;
            }
        }
    }

    // Assemble the outcome from the running best; if every evaluation was
    // NaN the first guess stands in with a NaN aggregate.
    let (best_index, best_r) = best.unwrap_or((guess_idx[0], T::nan()));
    let best_shift = s_min + best_index as isize;
    let (best_shift_real, r_parabola) = match interpolated {
        Some((vertex, value)) => (vertex, Some(value)),
        None => (T::from(best_shift).unwrap(), None),
    };

    let (beams, best_advisories) = match &evals[best_index] {
        Some(set) => (set.beams.clone(), set.advisories.clone()),
        None => (Vec::new(), Vec::new()),
    };
    let mut all_advisories = best_advisories;
    all_advisories.extend(advisories);

    Ok(V0rOutcome {
        best_index,
        best_shift,
        best_shift_real,
        best_r,
        r_parabola,
        beams,
        advisories: all_advisories,
        n_evaluations: n_eval,
    })
}

/// Mark window weights and gather the finite evaluated points for fitting.
///
/// Returns the number of gathered points.
fn gather_window<T: OverlapSolver>(
    w_lo: usize,
    w_hi: usize,
    s_min: isize,
    evals: &[Option<BeamSetR<T>>],
    weights: &mut [T],
    buffer: &mut FitBuffer<T>,
) -> usize {
    buffer.clear();
    for (i, slot) in evals.iter().enumerate().take(w_hi + 1).skip(w_lo) {
        let Some(set) = slot else { continue };
        if !set.total.is_finite() {
            continue;
        }
        weights[i] = T::one();
        buffer.xs.push(T::from(s_min + i as isize).unwrap());
        buffer.ys.push(set.total);
        buffer.ws.push(weights[i]);
    }
    buffer.len()
}
