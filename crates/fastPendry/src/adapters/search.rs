//! Grid-search adapter with parallel execution support.
//!
//! ## Purpose
//!
//! This module wraps the core V0r grid-search adapter and injects the
//! rayon passes for per-beam interpolation and R evaluation. The
//! refinement loop itself stays sequential; each evaluation's inner beam
//! loop runs across cores.
//!
//! ## Design notes
//!
//! * **Delegation**: Configuration and validation stay in the core
//!   builder; this wrapper only decides which passes to inject.
//! * **Parallel-First**: Parallel execution is the default; `.parallel(false)`
//!   or `Backend::Sequential` restores the sequential passes.
//!
//! ## Non-goals
//!
//! * This adapter does not evaluate shift candidates concurrently; the
//!   refinement chooses each candidate from the previous results.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::engine::executor::{beamset_pass_parallel, interp_pass_parallel};

// External dependencies
use num_traits::Float;

// Export dependencies from pendry crate
use pendry::internals::adapters::search::GridSearchBuilder;
use pendry::internals::algorithms::rfactor::OverlapSolver;
use pendry::internals::engine::executor::SkipStages;
use pendry::internals::engine::output::RfactorReport;
use pendry::internals::primitives::backend::Backend;
use pendry::internals::primitives::beamset::BeamSet;
use pendry::internals::primitives::errors::PendryError;

// ============================================================================
// Extended Grid-Search Builder
// ============================================================================

/// Builder for the V0r grid-search processor with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelGridSearchBuilder<T: Float> {
    /// Base builder from the pendry crate.
    pub base: GridSearchBuilder<T>,
}

impl<T: Float> Default for ParallelGridSearchBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ParallelGridSearchBuilder<T> {
    /// Create a new builder defaulting to parallel execution.
    fn new() -> Self {
        let base = GridSearchBuilder::default().parallel(true);
        Self { base }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base = self.base.parallel(parallel);
        self
    }

    /// Set the execution backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.base = self.base.backend(backend);
        self
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the imaginary inner potential.
    pub fn v0i(mut self, v0i: T) -> Self {
        self.base = self.base.v0i(v0i);
        self
    }

    /// Set the spline degree.
    pub fn degree(mut self, degree: usize) -> Self {
        self.base = self.base.degree(degree);
        self
    }

    /// Set the uniform output grid.
    pub fn output_grid(mut self, start: T, step: T, len: usize) -> Self {
        self.base = self.base.output_grid(start, step, len);
        self
    }

    /// Set the per-stage skip flags.
    pub fn skip_stages(mut self, skip: SkipStages) -> Self {
        self.base = self.base.skip_stages(skip);
        self
    }

    /// Average the experimental beams by the given scheme.
    pub fn average_experiment(mut self, groups: Vec<usize>, n_out: usize) -> Self {
        self.base = self.base.average_experiment(groups, n_out);
        self
    }

    /// Average the theoretical beams by the given scheme.
    pub fn average_theory(mut self, groups: Vec<usize>, n_out: usize) -> Self {
        self.base = self.base.average_theory(groups, n_out);
        self
    }

    /// Label output beams for grouped aggregates.
    pub fn beam_groups(mut self, labels: Vec<i32>) -> Self {
        self.base = self.base.beam_groups(labels);
        self
    }

    // ========================================================================
    // Search Setters
    // ========================================================================

    /// Set the inclusive shift range, in output-grid steps.
    pub fn shift_range(mut self, s_min: isize, s_max: isize) -> Self {
        self.base = self.base.shift_range(s_min, s_max);
        self
    }

    /// Set the three initial guesses.
    pub fn guesses(mut self, g1: isize, g2: isize, g3: isize) -> Self {
        self.base = self.base.guesses(g1, g2, g3);
        self
    }

    /// Set the parabola fit-quality tolerances.
    pub fn tolerances(mut self, tol_good: T, tol_acceptable: T) -> Self {
        self.base = self.base.tolerances(tol_good, tol_acceptable);
        self
    }

    /// Set the initial half-width of the parabola fitting window.
    pub fn fit_range(mut self, fit_range: usize) -> Self {
        self.base = self.base.fit_range(fit_range);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the grid-search processor.
    pub fn build(self) -> Result<ParallelGridSearchRfactor<T>, PendryError> {
        // Validate by building the base processor; this reuses the
        // validation logic centralized in the pendry crate.
        let _ = self.base.clone().build()?;
        Ok(ParallelGridSearchRfactor { config: self })
    }
}

// ============================================================================
// Extended Grid-Search Processor
// ============================================================================

/// V0r grid-search processor with parallel support.
pub struct ParallelGridSearchRfactor<T: Float> {
    config: ParallelGridSearchBuilder<T>,
}

impl<T: OverlapSolver + Send + Sync> ParallelGridSearchRfactor<T> {
    /// Optimize the shift of `theory` against `experiment`.
    pub fn fit(
        &self,
        experiment: &BeamSet<'_, T>,
        theory: &BeamSet<'_, T>,
    ) -> Result<RfactorReport<T>, PendryError> {
        let mut builder = self.config.base.clone();

        match builder.backend.unwrap_or(Backend::CPU) {
            Backend::CPU => {
                #[cfg(feature = "cpu")]
                {
                    if builder.parallel.unwrap_or(true) {
                        builder = builder
                            .custom_interp_pass(interp_pass_parallel)
                            .custom_beamset_pass(beamset_pass_parallel);
                    } else {
                        builder.custom_interp_pass = None;
                        builder.custom_beamset_pass = None;
                    }
                }
                #[cfg(not(feature = "cpu"))]
                {
                    // Fall back to the sequential passes.
                    builder.custom_interp_pass = None;
                    builder.custom_beamset_pass = None;
                }
            }
            Backend::Sequential => {
                builder.custom_interp_pass = None;
                builder.custom_beamset_pass = None;
            }
        }

        builder.build()?.fit(experiment, theory)
    }
}
