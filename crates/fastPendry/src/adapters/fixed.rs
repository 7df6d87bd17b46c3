//! Fixed-shift adapter with parallel execution support.
//!
//! ## Purpose
//!
//! This module wraps the core fixed-shift adapter and injects the rayon
//! passes for per-beam interpolation and R evaluation.
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
//! * This adapter does not change any numerical behavior; parallel and
//!   sequential results are identical.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::engine::executor::{beamset_pass_parallel, interp_pass_parallel};

// External dependencies
use num_traits::Float;

// Export dependencies from pendry crate
use pendry::internals::adapters::fixed::FixedShiftBuilder;
use pendry::internals::algorithms::rfactor::OverlapSolver;
use pendry::internals::engine::executor::SkipStages;
use pendry::internals::engine::output::RfactorReport;
use pendry::internals::primitives::backend::Backend;
use pendry::internals::primitives::beamset::BeamSet;
use pendry::internals::primitives::errors::PendryError;

// ============================================================================
// Extended Fixed-Shift Builder
// ============================================================================

/// Builder for the fixed-shift processor with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelFixedShiftBuilder<T: Float> {
    /// Base builder from the pendry crate.
    pub base: FixedShiftBuilder<T>,
}

impl<T: Float> Default for ParallelFixedShiftBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ParallelFixedShiftBuilder<T> {
    /// Create a new builder defaulting to parallel execution.
    fn new() -> Self {
        let base = FixedShiftBuilder::default().parallel(true);
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

    /// Set the shift applied to the theoretical set.
    pub fn shift(mut self, shift: isize) -> Self {
        self.base = self.base.shift(shift);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the fixed-shift processor.
    pub fn build(self) -> Result<ParallelFixedShiftRfactor<T>, PendryError> {
        // Validate by building the base processor; this reuses the
        // validation logic centralized in the pendry crate.
        let _ = self.base.clone().build()?;
        Ok(ParallelFixedShiftRfactor { config: self })
    }
}

// ============================================================================
// Extended Fixed-Shift Processor
// ============================================================================

/// Fixed-shift processor with parallel support.
pub struct ParallelFixedShiftRfactor<T: Float> {
    config: ParallelFixedShiftBuilder<T>,
}

impl<T: OverlapSolver + Send + Sync> ParallelFixedShiftRfactor<T> {
    /// Compare two curve sets at the configured shift.
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
