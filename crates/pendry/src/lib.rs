//! # Pendry — R-factor kernel for LEED I(V) analysis
//!
//! A fast, numerically careful implementation of the Pendry R-factor for
//! low-energy electron diffraction: beam preparation (range limiting,
//! symmetry averaging, B-spline interpolation, Y-functions), per-beam and
//! beam-set R evaluation, and inner-potential (V0r) optimization over an
//! integer shift grid.
//!
//! ## What is the Pendry R-factor?
//!
//! LEED structure determination compares measured intensity-vs-energy
//! curves against curves computed for candidate surface structures. The
//! Pendry R-factor scores that agreement through the logarithmic
//! derivative transform `Y = I*I' / (I^2 + V0i^2 * I'^2)`, which makes the
//! comparison insensitive to absolute intensity scale. The score is 0 for
//! identical curves and bounded by 2 for anticorrelated ones; a structure
//! search evaluates it thousands of times, so throughput and robustness
//! dominate the design.
//!
//! ## Quick Start
//!
//! ### R-factor at a fixed shift
//!
//! ```rust
//! use pendry::prelude::*;
//!
//! // One beam sampled on a uniform grid from 50 to 100 energy units.
//! let energies: Vec<f64> = (0..101).map(|i| 50.0 + 0.5 * i as f64).collect();
//! let bump = |e: f64| (-(e - 75.0) * (e - 75.0) / 50.0).exp();
//! let intensity: Vec<f64> = energies.iter().map(|&e| bump(e)).collect();
//!
//! let experiment = BeamSet::full(&energies, &intensity, 1)?;
//! let theory = BeamSet::full(&energies, &intensity, 1)?;
//!
//! let model = Pendry::new()
//!     .v0i(5.0)                      // imaginary inner potential
//!     .output_grid(50.0, 0.5, 101)   // uniform comparison grid
//!     .adapter(FixedShift)
//!     .build()?;
//!
//! let report = model.fit(&experiment, &theory)?;
//! assert!(report.r_factor < 1e-12); // identical curves score zero
//! # Result::<(), PendryError>::Ok(())
//! ```
//!
//! ### V0r optimization over a shift grid
//!
//! ```rust
//! use pendry::prelude::*;
//!
//! let energies: Vec<f64> = (0..101).map(|i| 50.0 + 0.5 * i as f64).collect();
//! let bump = |e: f64| (-(e - 75.0) * (e - 75.0) / 50.0).exp();
//! let intensity: Vec<f64> = energies.iter().map(|&e| bump(e)).collect();
//!
//! let experiment = BeamSet::full(&energies, &intensity, 1)?;
//! let theory = BeamSet::full(&energies, &intensity, 1)?;
//!
//! let model = Pendry::new()
//!     .output_grid(50.0, 0.5, 101)
//!     .shift_range(-8, 8)            // search window in grid steps
//!     .adapter(GridSearch)
//!     .build()?;
//!
//! let report = model.fit(&experiment, &theory)?;
//! assert_eq!(report.best_shift, 0);
//! println!("{report}");
//! # Result::<(), PendryError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! `fit` returns `Result<RfactorReport<T>, PendryError>`. Fatal conditions
//! (bad grids, malformed averaging schemes, singular solver systems) are
//! errors; recoverable conditions (a dropped beam, an optimizer fallback)
//! are [`Advisory`] entries on a still-valid report, each carrying its
//! integer code from the canonical taxonomy.
//!
//! ```rust
//! use pendry::prelude::*;
//! # let energies: Vec<f64> = (0..101).map(|i| 50.0 + 0.5 * i as f64).collect();
//! # let intensity: Vec<f64> = energies.iter().map(|&e| 1.0 + (e / 7.0).sin()).collect();
//! # let experiment = BeamSet::full(&energies, &intensity, 1)?;
//! # let theory = BeamSet::full(&energies, &intensity, 1)?;
//!
//! let model = Pendry::new()
//!     .output_grid(50.0, 0.5, 101)
//!     .adapter(FixedShift)
//!     .build()?;
//!
//! match model.fit(&experiment, &theory) {
//!     Ok(report) => {
//!         for advisory in &report.advisories {
//!             eprintln!("[{}] {}", advisory.code(), advisory);
//!         }
//!         println!("R = {}", report.r_factor);
//!     }
//!     Err(e) => eprintln!("calculation failed ({}): {}", e.code(), e),
//! }
//! # Result::<(), PendryError>::Ok(())
//! ```
//!
//! ## Minimal Usage (no_std / Embedded)
//!
//! The crate supports `no_std` environments (an allocator is required).
//! Disable default features to remove the standard library dependency:
//!
//! ```toml
//! [dependencies]
//! pendry = { version = "0.3", default-features = false }
//! ```
//!
//! ## References
//!
//! - Pendry, J. B. (1980). "Reliability factors for LEED calculations",
//!   J. Phys. C: Solid State Phys. 13, 937.
//! - Van Hove, M. A., Weinberg, W. H., Chan, C.-M. (1986). "Low-Energy
//!   Electron Diffraction", Springer.
//!
//! ## License
//!
//! See the repository for license information and contribution guidelines.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Math - pure mathematical functions.
mod math;

// Layer 3: Algorithms - Y-function and R-factor accumulation.
mod algorithms;

// Layer 4: Evaluation - V0r optimization and grouping.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
mod engine;

// Layer 6: Adapters - execution mode adapters.
mod adapters;

// High-level fluent API for R-factor calculations.
mod api;

// Standard pendry prelude.
pub mod prelude {
    pub use crate::api::{
        Adapter::{FixedShift, GridSearch},
        Advisory, AveragingScheme, BeamSet, GroupR, PendryBuilder as Pendry, PendryError,
        PreparedBeams, RfactorReport, SkipStages,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing
// purposes. It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
