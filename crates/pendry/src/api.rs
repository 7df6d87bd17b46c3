//! High-level API for R-factor calculations.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements
//! a fluent builder pattern for configuring the preparation pipeline and
//! choosing an execution adapter (FixedShift or GridSearch).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Uses marker types to transition to specialized adapter builders.
//! * **Validated**: Core parameters are validated during adapter construction.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! * **Execution Adapters**: FixedShift (one evaluation) and GridSearch
//!   (V0r optimization).
//! * **Configuration Flow**: Builder pattern ending in `.adapter(...)`.
//! * **Validation**: Parameters are validated when `.build()` is called on
//!   the adapter builder.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`PendryBuilder`] via `Pendry::new()`.
//! 2. Chain configuration methods (`.v0i()`, `.output_grid()`, etc.).
//! 3. Select an adapter via `.adapter(GridSearch)` to get an execution builder.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::adapters::fixed::FixedShiftBuilder;
use crate::adapters::search::GridSearchBuilder;
use crate::engine::executor::{BeamSetPassFn, InterpPassFn, SmoothPassFn};
use crate::primitives::grid::EnergyGrid;

// Publicly re-exported types
pub use crate::adapters::fixed::FixedShiftRfactor;
pub use crate::adapters::search::GridSearchRfactor;
pub use crate::engine::executor::SkipStages;
pub use crate::engine::output::RfactorReport;
pub use crate::engine::validator::AveragingScheme;
pub use crate::evaluation::grouping::GroupR;
pub use crate::primitives::backend::Backend;
pub use crate::primitives::beamset::{BeamSet, PreparedBeams};
pub use crate::primitives::errors::{Advisory, PendryError};

/// Marker types for selecting execution adapters.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{FixedShift, GridSearch};
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring R-factor parameters and execution modes.
#[derive(Debug, Clone)]
pub struct PendryBuilder<T> {
    /// Imaginary inner potential.
    pub v0i: Option<T>,

    /// Spline degree.
    pub degree: Option<usize>,

    /// Uniform output grid.
    pub grid: Option<EnergyGrid<T>>,

    /// Per-stage skip flags.
    pub skip: Option<SkipStages>,

    /// Averaging scheme for the experimental set.
    pub scheme_experiment: Option<AveragingScheme>,

    /// Averaging scheme for the theoretical set.
    pub scheme_theory: Option<AveragingScheme>,

    /// Beam-type labels for grouped aggregates.
    pub beam_groups: Option<Vec<i32>>,

    /// Shift for the fixed-shift adapter (FixedShift only).
    pub shift: Option<isize>,

    /// Inclusive shift range (GridSearch only).
    pub shift_range: Option<(isize, isize)>,

    /// Initial guesses (GridSearch only).
    pub guesses: Option<[isize; 3]>,

    /// Parabola fit-quality tolerances (GridSearch only).
    pub tolerances: Option<(T, T)>,

    /// Initial parabola window half-width (GridSearch only).
    pub fit_range: Option<usize>,

    // ======================================
    // DEV
    // ======================================
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
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for PendryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> PendryBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            v0i: None,
            degree: None,
            grid: None,
            skip: None,
            scheme_experiment: None,
            scheme_theory: None,
            beam_groups: None,
            shift: None,
            shift_range: None,
            guesses: None,
            tolerances: None,
            fit_range: None,
            custom_smooth_pass: None,
            custom_interp_pass: None,
            custom_beamset_pass: None,
            backend: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Select an execution adapter to transition to an execution builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: PendryAdapter<T>,
    {
        A::convert(self)
    }

    /// Set the imaginary inner potential (energy units).
    pub fn v0i(mut self, v0i: T) -> Self {
        if self.v0i.is_some() {
            self.duplicate_param = Some("v0i");
        }
        self.v0i = Some(v0i);
        self
    }

    /// Set the spline degree.
    pub fn degree(mut self, degree: usize) -> Self {
        if self.degree.is_some() {
            self.duplicate_param = Some("degree");
        }
        self.degree = Some(degree);
        self
    }

    /// Set the uniform output grid by first energy, step, and point count.
    pub fn output_grid(mut self, start: T, step: T, len: usize) -> Self {
        if self.grid.is_some() {
            self.duplicate_param = Some("output_grid");
        }
        self.grid = Some(EnergyGrid::new(start, step, len));
        self
    }

    /// Set the per-stage skip flags.
    pub fn skip_stages(mut self, skip: SkipStages) -> Self {
        if self.skip.is_some() {
            self.duplicate_param = Some("skip_stages");
        }
        self.skip = Some(skip);
        self
    }

    /// Average the experimental beams by the given scheme.
    ///
    /// `groups[b] = 0` discards beam `b`; equal nonzero values average into
    /// the 1-based output beam they name.
    pub fn average_experiment(mut self, groups: Vec<usize>, n_out: usize) -> Self {
        if self.scheme_experiment.is_some() {
            self.duplicate_param = Some("average_experiment");
        }
        self.scheme_experiment = Some(AveragingScheme { groups, n_out });
        self
    }

    /// Average the theoretical beams by the given scheme.
    pub fn average_theory(mut self, groups: Vec<usize>, n_out: usize) -> Self {
        if self.scheme_theory.is_some() {
            self.duplicate_param = Some("average_theory");
        }
        self.scheme_theory = Some(AveragingScheme { groups, n_out });
        self
    }

    /// Label output beams (e.g., integer vs. fractional order) for grouped
    /// aggregates.
    pub fn beam_groups(mut self, labels: Vec<i32>) -> Self {
        if self.beam_groups.is_some() {
            self.duplicate_param = Some("beam_groups");
        }
        self.beam_groups = Some(labels);
        self
    }

    /// Set the shift applied to the theoretical set (FixedShift only).
    pub fn shift(mut self, shift: isize) -> Self {
        if self.shift.is_some() {
            self.duplicate_param = Some("shift");
        }
        self.shift = Some(shift);
        self
    }

    /// Set the inclusive shift range in grid steps (GridSearch only).
    pub fn shift_range(mut self, s_min: isize, s_max: isize) -> Self {
        if self.shift_range.is_some() {
            self.duplicate_param = Some("shift_range");
        }
        self.shift_range = Some((s_min, s_max));
        self
    }

    /// Set the three initial guesses (GridSearch only).
    pub fn guesses(mut self, g1: isize, g2: isize, g3: isize) -> Self {
        if self.guesses.is_some() {
            self.duplicate_param = Some("guesses");
        }
        self.guesses = Some([g1, g2, g3]);
        self
    }

    /// Set the parabola fit-quality tolerances (GridSearch only).
    pub fn tolerances(mut self, tol_good: T, tol_acceptable: T) -> Self {
        if self.tolerances.is_some() {
            self.duplicate_param = Some("tolerances");
        }
        self.tolerances = Some((tol_good, tol_acceptable));
        self
    }

    /// Set the initial parabola window half-width (GridSearch only).
    pub fn fit_range(mut self, fit_range: usize) -> Self {
        if self.fit_range.is_some() {
            self.duplicate_param = Some("fit_range");
        }
        self.fit_range = Some(fit_range);
        self
    }

    // ==========================
    // Development Options
    // ==========================

    /// Set a custom smoothing pass (only for dev).
    #[doc(hidden)]
    pub fn custom_smooth_pass(mut self, pass: SmoothPassFn<T>) -> Self {
        self.custom_smooth_pass = Some(pass);
        self
    }

    /// Set a custom interpolation pass (only for dev).
    #[doc(hidden)]
    pub fn custom_interp_pass(mut self, pass: InterpPassFn<T>) -> Self {
        self.custom_interp_pass = Some(pass);
        self
    }

    /// Set a custom beam-set R pass (only for dev).
    #[doc(hidden)]
    pub fn custom_beamset_pass(mut self, pass: BeamSetPassFn<T>) -> Self {
        self.custom_beamset_pass = Some(pass);
        self
    }

    /// Set the execution backend hint (only for dev).
    #[doc(hidden)]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set parallel execution hint (only for dev).
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }
}

// ============================================================================
// Adapter Trait and Markers
// ============================================================================

/// Trait for transitioning from a generic builder to an execution builder.
pub trait PendryAdapter<T: Float> {
    /// The output execution builder.
    type Output;

    /// Convert the generic builder into the execution builder.
    fn convert(builder: PendryBuilder<T>) -> Self::Output;
}

/// Marker for single-shift evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FixedShift;

impl<T: Float> PendryAdapter<T> for FixedShift {
    type Output = FixedShiftBuilder<T>;

    fn convert(builder: PendryBuilder<T>) -> Self::Output {
        let mut out = FixedShiftBuilder::default();
        if let Some(v0i) = builder.v0i {
            out.v0i = v0i;
        }
        if let Some(degree) = builder.degree {
            out.degree = degree;
        }
        out.grid = builder.grid;
        if let Some(skip) = builder.skip {
            out.skip = skip;
        }
        out.scheme_experiment = builder.scheme_experiment;
        out.scheme_theory = builder.scheme_theory;
        out.beam_groups = builder.beam_groups;
        if let Some(shift) = builder.shift {
            out.shift = shift;
        }
        out.custom_smooth_pass = builder.custom_smooth_pass;
        out.custom_interp_pass = builder.custom_interp_pass;
        out.custom_beamset_pass = builder.custom_beamset_pass;
        out.backend = builder.backend;
        out.parallel = builder.parallel;
        out.duplicate_param = builder.duplicate_param;
        out
    }
}

/// Marker for V0r grid-search optimization.
#[derive(Debug, Clone, Copy)]
pub struct GridSearch;

impl<T: Float> PendryAdapter<T> for GridSearch {
    type Output = GridSearchBuilder<T>;

    fn convert(builder: PendryBuilder<T>) -> Self::Output {
        let mut out = GridSearchBuilder::default();
        if let Some(v0i) = builder.v0i {
            out.v0i = v0i;
        }
        if let Some(degree) = builder.degree {
            out.degree = degree;
        }
        out.grid = builder.grid;
        if let Some(skip) = builder.skip {
            out.skip = skip;
        }
        out.scheme_experiment = builder.scheme_experiment;
        out.scheme_theory = builder.scheme_theory;
        out.beam_groups = builder.beam_groups;
        if let Some((s_min, s_max)) = builder.shift_range {
            out.s_min = s_min;
            out.s_max = s_max;
        }
        out.guesses = builder.guesses;
        if let Some((tol_good, tol_acceptable)) = builder.tolerances {
            out.tol_good = tol_good;
            out.tol_acceptable = tol_acceptable;
        }
        if let Some(fit_range) = builder.fit_range {
            out.fit_range = fit_range;
        }
        out.custom_smooth_pass = builder.custom_smooth_pass;
        out.custom_interp_pass = builder.custom_interp_pass;
        out.custom_beamset_pass = builder.custom_beamset_pass;
        out.backend = builder.backend;
        out.parallel = builder.parallel;
        out.duplicate_param = builder.duplicate_param;
        out
    }
}
