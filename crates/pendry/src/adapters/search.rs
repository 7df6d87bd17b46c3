//! Grid-search adapter: V0r optimization over the shift grid.
//!
//! ## Purpose
//!
//! This module provides the execution adapter that prepares two beam sets
//! and searches the integer shift grid for the minimum aggregate R via the
//! parabola refinement of the evaluation layer.
//!
//! ## Design notes
//!
//! * **Processing**: Validates, prepares both curve sets, then hands an
//!   evaluation closure to the V0r optimizer.
//! * **Cached shifts**: The optimizer evaluates each grid shift at most
//!   once; the per-beam decomposition of the best shift comes from its
//!   cache.
//! * **Builder Pattern**: Fluent API with sensible defaults; search
//!   parameters are validated in `build()`.
//!
//! ## Invariants
//!
//! * The shift range carries at least 6 grid points.
//! * Guesses are inside the range and pairwise distinct (derived from the
//!   range quartiles when not supplied).
//!
//! ## Non-goals
//!
//! * This adapter does not evaluate at a single fixed shift (use the
//!   fixed-shift adapter).
//! * This adapter does not parallelize the search; refinement order is
//!   sequential by contract.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::rfactor::OverlapSolver;
use crate::engine::executor::{
    BeamSetPassFn, InterpPassFn, PendryExecutor, PrepareConfig, SkipStages, SmoothPassFn,
};
use crate::engine::output::RfactorReport;
use crate::engine::validator::{AveragingScheme, Validator};
use crate::evaluation::grouping::group_aggregates;
use crate::evaluation::v0r::{optimize, V0rSettings};
use crate::math::spline::DEGREE;
use crate::primitives::backend::Backend;
use crate::primitives::beamset::BeamSet;
use crate::primitives::errors::PendryError;
use crate::primitives::grid::EnergyGrid;

// ============================================================================
// Grid-Search Builder
// ============================================================================

/// Builder for the V0r grid-search processor.
#[derive(Debug, Clone)]
pub struct GridSearchBuilder<T: Float> {
    /// Imaginary inner potential.
    pub v0i: T,

    /// Spline degree.
    pub degree: usize,

    /// Uniform output grid (required).
    pub grid: Option<EnergyGrid<T>>,

    /// Per-stage skip flags.
    pub skip: SkipStages,

    /// Averaging scheme for the experimental set.
    pub scheme_experiment: Option<AveragingScheme>,

    /// Averaging scheme for the theoretical set.
    pub scheme_theory: Option<AveragingScheme>,

    /// Beam-type labels for grouped aggregates.
    pub beam_groups: Option<Vec<i32>>,

    /// Smallest shift on the search grid.
    pub s_min: isize,

    /// Largest shift on the search grid.
    pub s_max: isize,

    /// Initial guesses; derived from the range quartiles when `None`.
    pub guesses: Option<[isize; 3]>,

    /// R^2 above which the parabola fit ends the search.
    pub tol_good: T,

    /// R^2 above which the window shrinks instead of falling back.
    pub tol_acceptable: T,

    /// Initial half-width of the parabola fitting window.
    pub fit_range: usize,

    /// Deferred error from adapter conversion.
    pub deferred_error: Option<PendryError>,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom smoothing pass.
    #[doc(hidden)]
    pub custom_smooth_pass: Option<SmoothPassFn<T>>,

    /// Custom interpolation pass.
    #[doc(hidden)]
    pub custom_interp_pass: Option<InterpPassFn<T>>,

    /// Custom beam-set R pass.
    #[doc(hidden)]
    pub custom_beamset_pass: Option<BeamSetPassFn<T>>,

    /// Execution backend hint.
    #[doc(hidden)]
    pub backend: Option<Backend>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for GridSearchBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> GridSearchBuilder<T> {
    /// Create a new grid-search builder with default parameters.
    fn new() -> Self {
        Self {
            v0i: T::from(5.0).unwrap(),
            degree: DEGREE,
            grid: None,
            skip: SkipStages::default(),
            scheme_experiment: None,
            scheme_theory: None,
            beam_groups: None,
            s_min: -10,
            s_max: 10,
            guesses: None,
            tol_good: T::from(0.98).unwrap(),
            tol_acceptable: T::from(0.9).unwrap(),
            fit_range: 10,
            deferred_error: None,
            custom_smooth_pass: None,
            custom_interp_pass: None,
            custom_beamset_pass: None,
            backend: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the imaginary inner potential.
    pub fn v0i(mut self, v0i: T) -> Self {
        self.v0i = v0i;
        self
    }

    /// Set the spline degree.
    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Set the uniform output grid.
    pub fn output_grid(mut self, start: T, step: T, len: usize) -> Self {
        self.grid = Some(EnergyGrid::new(start, step, len));
        self
    }

    /// Set the per-stage skip flags.
    pub fn skip_stages(mut self, skip: SkipStages) -> Self {
        self.skip = skip;
        self
    }

    /// Average the experimental beams by the given scheme.
    pub fn average_experiment(mut self, groups: Vec<usize>, n_out: usize) -> Self {
        self.scheme_experiment = Some(AveragingScheme { groups, n_out });
        self
    }

    /// Average the theoretical beams by the given scheme.
    pub fn average_theory(mut self, groups: Vec<usize>, n_out: usize) -> Self {
        self.scheme_theory = Some(AveragingScheme { groups, n_out });
        self
    }

    /// Label output beams for grouped aggregates.
    pub fn beam_groups(mut self, labels: Vec<i32>) -> Self {
        self.beam_groups = Some(labels);
        self
    }

    // ========================================================================
    // Search Setters
    // ========================================================================

    /// Set the inclusive shift range, in output-grid steps.
    pub fn shift_range(mut self, s_min: isize, s_max: isize) -> Self {
        self.s_min = s_min;
        self.s_max = s_max;
        self
    }

    /// Set the three initial guesses.
    pub fn guesses(mut self, g1: isize, g2: isize, g3: isize) -> Self {
        self.guesses = Some([g1, g2, g3]);
        self
    }

    /// Set the parabola fit-quality tolerances.
    pub fn tolerances(mut self, tol_good: T, tol_acceptable: T) -> Self {
        self.tol_good = tol_good;
        self.tol_acceptable = tol_acceptable;
        self
    }

    /// Set the initial half-width of the parabola fitting window.
    pub fn fit_range(mut self, fit_range: usize) -> Self {
        self.fit_range = fit_range;
        self
    }

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++

    /// Set the execution backend hint.
    #[doc(hidden)]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set parallel execution hint.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Set a custom smoothing pass.
    #[doc(hidden)]
    pub fn custom_smooth_pass(mut self, pass: SmoothPassFn<T>) -> Self {
        self.custom_smooth_pass = Some(pass);
        self
    }

    /// Set a custom interpolation pass.
    #[doc(hidden)]
    pub fn custom_interp_pass(mut self, pass: InterpPassFn<T>) -> Self {
        self.custom_interp_pass = Some(pass);
        self
    }

    /// Set a custom beam-set R pass.
    #[doc(hidden)]
    pub fn custom_beamset_pass(mut self, pass: BeamSetPassFn<T>) -> Self {
        self.custom_beamset_pass = Some(pass);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the grid-search processor.
    pub fn build(self) -> Result<GridSearchRfactor<T>, PendryError> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }
        Validator::validate_no_duplicates(self.duplicate_param)?;
        Validator::validate_v0i(self.v0i)?;
        Validator::validate_degree(self.degree)?;
        Validator::validate_tolerances(self.tol_good, self.tol_acceptable)?;
        Validator::validate_fit_range(self.fit_range)?;
        Validator::validate_shift_range(self.s_min, self.s_max)?;

        let guesses = match self.guesses {
            Some(g) => g,
            None => derive_guesses(self.s_min, self.s_max),
        };
        Validator::validate_guesses(self.s_min, self.s_max, guesses)?;

        let grid = self
            .grid
            .ok_or_else(|| PendryError::BadGrid("output grid is required".into()))?;
        Validator::validate_output_grid(&grid)?;

        Ok(GridSearchRfactor {
            config: self,
            grid,
            guesses,
        })
    }
}

/// Quartile guesses for an unseeded search.
fn derive_guesses(s_min: isize, s_max: isize) -> [isize; 3] {
    let n_steps = s_max - s_min + 1;
    let quarter = (n_steps / 4).max(1);
    [s_min + quarter, s_min + n_steps / 2, s_max - quarter]
}

// ============================================================================
// Grid-Search Processor
// ============================================================================

/// V0r grid-search processor.
#[derive(Debug)]
pub struct GridSearchRfactor<T: Float> {
    config: GridSearchBuilder<T>,
    grid: EnergyGrid<T>,
    guesses: [isize; 3],
}

impl<T: OverlapSolver> GridSearchRfactor<T> {
    /// Optimize the shift of `theory` against `experiment`.
    pub fn fit(
        &self,
        experiment: &BeamSet<'_, T>,
        theory: &BeamSet<'_, T>,
    ) -> Result<RfactorReport<T>, PendryError> {
        let exp_config = PrepareConfig {
            degree: self.config.degree,
            v0i: self.config.v0i,
            skip: self.config.skip,
            scheme: self.config.scheme_experiment.as_ref(),
            smooth_pass: self.config.custom_smooth_pass,
            interp_pass: self.config.custom_interp_pass,
        };
        let theo_config = PrepareConfig {
            degree: self.config.degree,
            v0i: self.config.v0i,
            skip: self.config.skip,
            scheme: self.config.scheme_theory.as_ref(),
            smooth_pass: self.config.custom_smooth_pass,
            interp_pass: self.config.custom_interp_pass,
        };

        let prepared_exp = PendryExecutor::prepare(experiment, &self.grid, &exp_config)?;
        let prepared_theo = PendryExecutor::prepare(theory, &self.grid, &theo_config)?;
        if prepared_exp.n_beams() != prepared_theo.n_beams() {
            return Err(PendryError::MismatchedInputs {
                expected: prepared_exp.n_beams(),
                got: prepared_theo.n_beams(),
            });
        }
        if let Some(labels) = &self.config.beam_groups {
            if labels.len() != prepared_exp.n_beams() {
                return Err(PendryError::MismatchedInputs {
                    expected: prepared_exp.n_beams(),
                    got: labels.len(),
                });
            }
        }

        let pass = self
            .config
            .custom_beamset_pass
            .unwrap_or(PendryExecutor::beamset_r::<T>);
        let settings = V0rSettings {
            s_min: self.config.s_min,
            s_max: self.config.s_max,
            guesses: self.guesses,
            tol_good: self.config.tol_good,
            tol_acceptable: self.config.tol_acceptable,
            fit_range: self.config.fit_range,
        };
        let outcome = optimize(&settings, |shift| {
            pass(&prepared_exp, &prepared_theo, shift)
        })?;

        let group_r = self
            .config
            .beam_groups
            .as_ref()
            .map(|labels| group_aggregates(labels, &outcome.beams));

        let mut advisories = prepared_exp.advisories.clone();
        advisories.extend(prepared_theo.advisories.iter().copied());
        advisories.extend(outcome.advisories.iter().copied());

        Ok(RfactorReport {
            r_factor: outcome.best_r,
            best_shift: outcome.best_shift,
            best_shift_real: outcome.best_shift_real,
            shift_energy: outcome.best_shift_real * self.grid.step,
            r_parabola: outcome.r_parabola,
            r_beams: outcome.beams.iter().map(|b| b.r).collect(),
            overlap_counts: outcome.beams.iter().map(|b| b.overlap).collect(),
            group_r,
            n_evaluations: outcome.n_evaluations,
            advisories,
        })
    }
}
