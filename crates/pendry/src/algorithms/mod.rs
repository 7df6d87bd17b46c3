//! Layer 3: Algorithms
//!
//! This layer implements the core comparison logic: the Pendry Y-function
//! transform and the per-beam and beam-set R-factor accumulation. It
//! contains the "business logic" of the R-factor but is orchestrated by
//! the engine layer.

// Pendry Y-function evaluation.
pub mod yfunction;

// Per-beam and beam-set R-factor accumulation.
pub mod rfactor;
