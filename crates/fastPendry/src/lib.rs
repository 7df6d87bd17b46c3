//! # fastPendry — parallel Pendry R-factor for LEED I(V) analysis
//!
//! Multi-threaded execution layer over the [`pendry`] kernel: beam
//! preparation (range limiting, symmetry averaging, B-spline
//! interpolation, Y-functions), per-beam and beam-set R evaluation, and
//! inner-potential (V0r) optimization, with the per-beam work distributed
//! across CPU cores via `rayon` and native `ndarray` input support.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastPendry::prelude::*;
//! use ndarray::Array1;
//!
//! // One beam sampled on a uniform grid from 50 to 100 energy units.
//! let energies = Array1::from_iter((0..101).map(|i| 50.0 + 0.5 * i as f64));
//! let intensity = energies.mapv(|e| (-(e - 75.0) * (e - 75.0) / 50.0).exp());
//!
//! let experiment = beam_set_full(&energies, &intensity, 1)?;
//! let theory = beam_set_full(&energies, &intensity, 1)?;
//!
//! // Build the model with parallel execution (default).
//! let model = Pendry::new()
//!     .v0i(5.0)
//!     .output_grid(50.0, 0.5, 101)
//!     .adapter(FixedShift)
//!     .build()?;
//!
//! let report = model.fit(&experiment, &theory)?;
//! assert!(report.r_factor < 1e-12);
//! # Result::<(), PendryError>::Ok(())
//! ```
//!
//! ### V0r optimization
//!
//! ```rust
//! use fastPendry::prelude::*;
//! # let energies: Vec<f64> = (0..101).map(|i| 50.0 + 0.5 * i as f64).collect();
//! # let intensity: Vec<f64> = energies.iter().map(|&e| (-(e - 75.0) * (e - 75.0) / 50.0).exp()).collect();
//! # let experiment = beam_set_full(&energies, &intensity, 1)?;
//! # let theory = beam_set_full(&energies, &intensity, 1)?;
//!
//! let model = Pendry::new()
//!     .output_grid(50.0, 0.5, 101)
//!     .shift_range(-8, 8)
//!     .adapter(GridSearch)
//!     .build()?;
//!
//! let report = model.fit(&experiment, &theory)?;
//! assert_eq!(report.best_shift, 0);
//! # Result::<(), PendryError>::Ok(())
//! ```
//!
//! ### ndarray Integration
//!
//! Intensity matrices are column-major (one column per beam); pass a
//! Fortran-ordered `Array2`, a flat slice, or a `Vec` interchangeably
//! through [`beam_set`] / [`beam_set_full`].
//!
//! ## References
//!
//! - Pendry, J. B. (1980). "Reliability factors for LEED calculations",
//!   J. Phys. C: Solid State Phys. 13, 937.
//!
//! ## License
//!
//! See the repository for license information and contribution guidelines.

#![allow(non_snake_case)]

// Layer 5: Engine - parallel execution passes.
mod engine;

// Layer 6: Adapters - parallel execution mode adapters.
mod adapters;

// High-level fluent API for R-factor calculations.
mod api;

// Input data handling.
mod input;

// Standard fastPendry prelude.
pub mod prelude {
    pub use crate::api::{
        Adapter::{FixedShift, GridSearch},
        Advisory, AveragingScheme, Backend, BeamSet, GroupR, PendryBuilder as Pendry, PendryError,
        PreparedBeams, RfactorReport, SkipStages,
    };
    pub use crate::input::{beam_set, beam_set_full};
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing
// purposes. It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
    pub mod input {
        pub use crate::input::*;
    }
}
