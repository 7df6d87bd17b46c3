//! High-level API for R-factor calculations with parallel execution.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point for R-factor
//! calculations with multi-threaded execution. It extends the `pendry`
//! API with adapters that utilize all available CPU cores.
//!
//! ## Design notes
//!
//! * **Fluent Integration**: Re-uses the base `pendry` builder pattern.
//! * **Parallel-First**: Defaults to parallel execution where beneficial.
//! * **Transparent**: Marker types (FixedShift, GridSearch) select the
//!   parallel builders.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`PendryBuilder`] via `Pendry::new()`.
//! 2. Chain configuration methods (`.v0i()`, `.output_grid()`, etc.).
//! 3. Select an adapter via `.adapter(GridSearch)` to get a parallel
//!    execution builder.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::adapters::fixed::ParallelFixedShiftBuilder;
#[cfg(feature = "cpu")]
use crate::adapters::search::ParallelGridSearchBuilder;

// External dependencies
use num_traits::Float;

// Import base marker types for delegation
use pendry::internals::api::FixedShift as BaseFixedShift;
use pendry::internals::api::GridSearch as BaseGridSearch;

// Publicly re-exported types
pub use pendry::internals::api::{PendryAdapter, PendryBuilder};
pub use pendry::internals::engine::executor::SkipStages;
pub use pendry::internals::engine::output::RfactorReport;
pub use pendry::internals::engine::validator::AveragingScheme;
pub use pendry::internals::evaluation::grouping::GroupR;
pub use pendry::internals::primitives::backend::Backend;
pub use pendry::internals::primitives::beamset::{BeamSet, PreparedBeams};
pub use pendry::internals::primitives::errors::{Advisory, PendryError};

// ============================================================================
// Adapter Module
// ============================================================================

/// Adapter selection namespace.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{FixedShift, GridSearch};
}

// ============================================================================
// Adapter Marker Types
// ============================================================================

/// Marker for parallel single-shift evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FixedShift;

#[cfg(feature = "cpu")]
impl<T: Float> PendryAdapter<T> for FixedShift {
    type Output = ParallelFixedShiftBuilder<T>;

    fn convert(builder: PendryBuilder<T>) -> Self::Output {
        // Determine parallel mode: user choice OR default to true.
        let parallel = builder.parallel.unwrap_or(true);

        // Delegate to the base implementation, then wrap.
        let base = <BaseFixedShift as PendryAdapter<T>>::convert(builder).parallel(parallel);
        ParallelFixedShiftBuilder { base }
    }
}

/// Marker for parallel V0r grid-search optimization.
#[derive(Debug, Clone, Copy)]
pub struct GridSearch;

#[cfg(feature = "cpu")]
impl<T: Float> PendryAdapter<T> for GridSearch {
    type Output = ParallelGridSearchBuilder<T>;

    fn convert(builder: PendryBuilder<T>) -> Self::Output {
        // Determine parallel mode: user choice OR default to true.
        let parallel = builder.parallel.unwrap_or(true);

        // Delegate to the base implementation, then wrap.
        let base = <BaseGridSearch as PendryAdapter<T>>::convert(builder).parallel(parallel);
        ParallelGridSearchBuilder { base }
    }
}
