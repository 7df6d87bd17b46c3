//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical building blocks with no
//! pipeline-specific logic:
//! - Banded linear system factorization (the spline's solver primitive)
//! - Natural B-spline interpolation with derivatives
//! - Weighted parabola least squares
//! - Uniform-grid trapezoidal integration
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
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Banded factorization and solve.
pub mod banded;

/// Natural B-spline fit and evaluation.
pub mod spline;

/// Weighted parabola least squares.
pub mod parabola;

/// Trapezoidal integration on uniform grids.
pub mod integrate;
