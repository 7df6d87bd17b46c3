//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer selects and summarizes on top of the raw R-factor:
//! - V0r optimization over the integer shift grid
//! - Beam-type grouping of per-beam results
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// V0r optimization over the shift grid.
pub mod v0r;

/// Beam-type grouping of per-beam R-factors.
pub mod grouping;
