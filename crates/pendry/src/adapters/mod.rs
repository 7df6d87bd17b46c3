//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer provides user-facing APIs that adapt the engine layer for
//! the two execution modes:
//!
//! - **FixedShift**: one R-factor evaluation at a caller-chosen shift
//! - **GridSearch**: V0r optimization over the integer shift grid
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// R-factor at a single shift.
pub mod fixed;

/// V0r grid search.
pub mod search;
